//! Application layer for kiln.
//!
//! This layer contains:
//! - **Services**: the generator engine, the plugin API and the project creator
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer sequences the domain layer; merge, ordering and
//! naming rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    CreateOptions, CreateReport, FileStep, FnPlugin, FnStep, GenerateOptions, Generator, Plugin,
    PluginApi, PluginDescriptor, PluginError, ProjectCreator, RenderSource, StepContext,
    write_file_tree,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, PackageInstaller, PluginCatalog, TemplateRenderer};

pub use error::ApplicationError;
