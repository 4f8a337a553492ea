pub mod common;
pub mod file_tree;
pub mod manifest;
pub mod plugin;
pub mod preset;

pub use crate::domain::DomainError;
pub use file_tree::{FileContent, FileTree};
pub use manifest::Manifest;
pub use plugin::{PluginId, PluginSummary};
pub use preset::{Preset, PresetPlugin};
