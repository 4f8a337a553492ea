//! Application services - orchestrate use cases.
//!
//! The generator engine and the plugin protocol it drives, plus the
//! project creator that feeds it from a preset.

pub mod creator;
pub mod generator;
pub mod plugin;
pub mod plugin_api;
pub mod steps;

pub use creator::{CreateOptions, CreateReport, ProjectCreator};
pub use generator::{GenerateOptions, Generator, write_file_tree};
pub use plugin::{FnPlugin, Plugin, PluginDescriptor, PluginError};
pub use plugin_api::PluginApi;
pub use steps::{FileStep, FnStep, RenderSource, RenderStep, StepContext};
