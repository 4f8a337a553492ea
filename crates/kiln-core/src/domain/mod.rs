//! Core domain layer for kiln.
//!
//! Pure data and rules: the manifest and its merge policy, the file tree,
//! plugin naming conventions, presets and config extraction. No I/O and no
//! async; rendering, filesystem access and plugin execution are driven from
//! the application layer through ports.

pub mod config_transform;
pub mod entities;
pub mod error;
pub mod readme;

mod validation;

pub use config_transform::{ConfigFile, ConfigFormat, ConfigTransform, default_config_transforms};
pub use entities::{
    common::RelativePath,
    file_tree::{FileContent, FileTree, escape_template_path},
    manifest::{Manifest, merge_deps},
    plugin::{PluginId, PluginSummary, SERVICE_PLUGIN_ID},
    preset::{Preset, PresetPlugin},
};
pub use error::{DomainError, ErrorCategory};
pub use readme::generate_readme;
pub use validation::DomainValidator;
