//! Implementation of the `kiln list` command.

use kiln_adapters::{PluginRegistry, PresetLoader};
use kiln_core::domain::{Preset, entities::plugin::to_short_plugin_id};
use serde_json::{Value, json};

use crate::{
    cli::{ListArgs, ListFormat, ListTarget},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: &AppConfig, output: OutputManager) -> CliResult<()> {
    let registry = PluginRegistry::with_builtins();
    let presets = match &config.presets.local_path {
        Some(dir) => PresetLoader::with_dir(dir),
        None => PresetLoader::new(),
    }
    .load_all();

    let show_plugins = args.what != Some(ListTarget::Presets);
    let show_presets = args.what != Some(ListTarget::Plugins);

    if args.format == ListFormat::Json || output.is_json() {
        let mut doc = serde_json::Map::new();
        if show_plugins {
            doc.insert("plugins".into(), plugins_json(&registry));
        }
        if show_presets {
            doc.insert("presets".into(), presets_json(&presets));
        }
        output.json(&Value::Object(doc))?;
        return Ok(());
    }

    if args.format == ListFormat::List {
        if show_plugins {
            for entry in registry.list() {
                output.print(&entry.descriptor.id)?;
            }
        }
        if show_presets {
            for preset in &presets {
                output.print(&preset.name)?;
            }
        }
        return Ok(());
    }

    if show_plugins {
        output.header("Plugins:")?;
        for entry in registry.list() {
            output.print(&format!(
                "  {:<10} {:<28} {}",
                entry.descriptor.short_id(),
                entry.descriptor.id,
                entry.description
            ))?;
        }
    }
    if show_plugins && show_presets {
        output.print("")?;
    }
    if show_presets {
        output.header("Presets:")?;
        for preset in &presets {
            output.print(&format!(
                "  {:<10} {:<28} {}",
                preset.name,
                plugin_list(preset),
                preset.description.as_deref().unwrap_or("")
            ))?;
        }
    }

    Ok(())
}

/// `@kiln/cli-service, babel, eslint` style summary of a preset's plugins.
fn plugin_list(preset: &Preset) -> String {
    preset
        .plugins
        .iter()
        .map(|p| to_short_plugin_id(&p.id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn plugins_json(registry: &PluginRegistry) -> Value {
    registry
        .list()
        .iter()
        .map(|entry| {
            json!({
                "id": entry.descriptor.id,
                "short": entry.descriptor.short_id(),
                "description": entry.description,
            })
        })
        .collect()
}

fn presets_json(presets: &[Preset]) -> Value {
    presets
        .iter()
        .map(|preset| {
            json!({
                "name": preset.name,
                "description": preset.description,
                "useConfigFiles": preset.use_config_files,
                "plugins": preset.plugins.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            })
        })
        .collect()
}
