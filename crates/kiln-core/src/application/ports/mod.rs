//! Application ports (traits) for external dependencies.
//!
//! Ports define interfaces the application needs from the outside world.
//! Adapters in `kiln-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateRenderer`: Template rendering
//!   - `PackageInstaller`: Dependency installation
//!   - `PluginCatalog`: Plugin lookup by id
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `Plugin` in `application::services::plugin`, implemented by plugin authors

pub mod output;

pub use output::{Filesystem, PackageInstaller, PluginCatalog, TemplateRenderer};
