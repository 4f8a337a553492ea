//! Infrastructure adapters for Kiln.
//!
//! This crate implements the ports defined in `kiln-core::application::ports`
//! and ships the builtin plugins and presets. All process and disk I/O lives
//! here.

pub mod filesystem;
pub mod installer;
pub mod plugins;
pub mod preset_loader;
pub mod renderer;

pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use installer::NpmInstaller;
pub use plugins::{PluginRegistry, RegisteredPlugin};
pub use preset_loader::{DEFAULT_PRESET, PresetLoader, builtin_presets};
pub use renderer::HandlebarsRenderer;
