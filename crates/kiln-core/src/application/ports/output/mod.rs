//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the generator needs from external systems.
//! The `kiln-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::{application::services::plugin::PluginDescriptor, error::KilnResult};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `kiln_adapters::filesystem::LocalFilesystem` (production)
/// - `kiln_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Synchronous: generation touches disk in two places only (reading
/// template directories and the final flush), both strictly sequential.
/// The only deletion is clearing a replaced project directory right before
/// that flush.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KilnResult<()>;

    /// Write bytes to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &[u8]) -> KilnResult<()>;

    fn read_file(&self, path: &Path) -> KilnResult<Vec<u8>>;

    /// Every file below `dir`, recursively, dotfiles included.
    ///
    /// Returned paths are relative to `dir`, sorted.
    fn list_files(&self, dir: &Path) -> KilnResult<Vec<PathBuf>>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Delete a directory and everything below it.
    fn remove_dir_all(&self, path: &Path) -> KilnResult<()>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `kiln_adapters::renderer::HandlebarsRenderer`
pub trait TemplateRenderer: Send + Sync {
    /// Render one template text.
    ///
    /// `path` names the template in errors only.
    fn render(&self, template: &str, data: &Value, path: &Path) -> KilnResult<String>;
}

/// Port for the package manager.
///
/// Implemented by:
/// - `kiln_adapters::installer::NpmInstaller`
#[async_trait]
pub trait PackageInstaller: Send + Sync {
    /// Install the dependencies declared by `dir/package.json`.
    async fn install(&self, dir: &Path) -> KilnResult<()>;
}

/// Port for looking plugins up by id.
///
/// Implemented by:
/// - `kiln_adapters::plugins::PluginRegistry` (statically registered builtins)
pub trait PluginCatalog: Send + Sync {
    /// Find a plugin by full id or alias. The descriptor comes back with
    /// empty options.
    fn lookup(&self, id: &str) -> Option<PluginDescriptor>;

    /// Full ids of every known plugin, in registration order.
    fn ids(&self) -> Vec<String>;
}
