//! kiln core - generator engine behind the `kiln` project scaffolder.
//!
//! Follows a ports and adapters layout:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             kiln-cli (CLI)              │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │   (Generator, PluginApi, Creator)       │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Filesystem, Renderer, Installer, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      kiln-adapters (Infrastructure)     │
//! │ (LocalFilesystem, Handlebars, plugins)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │  (Manifest, FileTree, ConfigTransform)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kiln_core::prelude::*;
//! use serde_json::json;
//!
//! # async fn run(fs: Arc<dyn Filesystem>, renderer: Arc<dyn TemplateRenderer>) -> KilnResult<()> {
//! let service = PluginDescriptor::new(
//!     "@kiln/cli-service",
//!     Arc::new(FnPlugin::new(|api, _options, _root| {
//!         api.extend_manifest(json!({ "scripts": { "serve": "kiln serve" } }))?;
//!         Ok(())
//!     })),
//! );
//!
//! let manifest = Manifest::from_value(json!({ "name": "my-app", "version": "0.1.0" }))?;
//! let mut generator = Generator::new("./my-app", vec![service], manifest, fs, renderer)?;
//! generator.generate(GenerateOptions::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        CreateOptions, CreateReport, FileStep, FnPlugin, FnStep, GenerateOptions, Generator,
        Plugin, PluginApi, PluginDescriptor, PluginError, ProjectCreator, RenderSource,
        StepContext, write_file_tree,
        ports::{Filesystem, PackageInstaller, PluginCatalog, TemplateRenderer},
    };
    pub use crate::domain::{
        FileContent, FileTree, Manifest, PluginId, PluginSummary, Preset, PresetPlugin,
        SERVICE_PLUGIN_ID,
    };
    pub use crate::error::{KilnError, KilnResult};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
