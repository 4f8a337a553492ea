use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    entities::plugin::{PluginId, SERVICE_PLUGIN_ID, matches_plugin_id},
    error::DomainError,
};

/// A finished selection of plugins and their options.
///
/// This is what interactive prompting would produce; kiln reads it from a
/// file or the builtin preset table instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Display name. Filled from the file stem when omitted.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Plugins, in application order.
    #[serde(default)]
    pub plugins: Vec<PresetPlugin>,

    /// Move babel/eslint/... config out of package.json into dedicated files.
    #[serde(default)]
    pub use_config_files: bool,
}

/// One `[[plugins]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetPlugin {
    pub id: String,

    /// Version range recorded in devDependencies. `latest` when omitted.
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default = "empty_options")]
    pub options: Value,
}

fn empty_options() -> Value {
    Value::Object(Map::new())
}

impl PresetPlugin {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            options: empty_options(),
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn version_or_latest(&self) -> &str {
        self.version.as_deref().unwrap_or("latest")
    }
}

impl Preset {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            plugins: Vec::new(),
            use_config_files: false,
        }
    }

    pub fn with_plugin(mut self, plugin: PresetPlugin) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn use_config_files(mut self, enabled: bool) -> Self {
        self.use_config_files = enabled;
        self
    }

    /// Ids must be valid, unique, and options must be objects.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for plugin in &self.plugins {
            PluginId::new(plugin.id.as_str())?;
            if !seen.insert(plugin.id.as_str()) {
                return Err(DomainError::DuplicatePlugin {
                    id: plugin.id.clone(),
                });
            }
            if !plugin.options.is_object() {
                return Err(DomainError::InvalidPreset(format!(
                    "options for '{}' must be a table/object",
                    plugin.id
                )));
            }
        }
        Ok(())
    }

    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| matches_plugin_id(id, &p.id))
    }

    /// Record the project name in the service plugin's options, adding the
    /// service plugin at the front if the preset does not list it.
    pub fn inject_project_name(&mut self, project_name: &str) {
        let position = self.plugins.iter().position(|p| p.id == SERVICE_PLUGIN_ID);
        let service = match position {
            Some(i) => &mut self.plugins[i],
            None => {
                self.plugins.insert(0, PresetPlugin::new(SERVICE_PLUGIN_ID));
                &mut self.plugins[0]
            }
        };
        if let Value::Object(options) = &mut service.options {
            options.insert("projectName".into(), Value::String(project_name.to_owned()));
        }
    }

    /// Service plugin first, everything else in declared order.
    pub fn ordered_plugins(&self) -> Vec<&PresetPlugin> {
        let (service, rest): (Vec<_>, Vec<_>) = self
            .plugins
            .iter()
            .partition(|p| p.id == SERVICE_PLUGIN_ID);
        service.into_iter().chain(rest).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_camel_case_json() {
        let preset: Preset = serde_json::from_value(json!({
            "name": "p",
            "useConfigFiles": true,
            "plugins": [{"id": "@kiln/cli-plugin-babel", "version": "^1.0.0"}]
        }))
        .unwrap();
        assert!(preset.use_config_files);
        assert_eq!(preset.plugins[0].version_or_latest(), "^1.0.0");
        assert_eq!(preset.plugins[0].options, json!({}));
    }

    #[test]
    fn duplicate_plugins_rejected() {
        let preset = Preset::new("p")
            .with_plugin(PresetPlugin::new("a"))
            .with_plugin(PresetPlugin::new("a"));
        assert!(matches!(
            preset.validate(),
            Err(DomainError::DuplicatePlugin { .. })
        ));
    }

    #[test]
    fn non_object_options_rejected() {
        let preset =
            Preset::new("p").with_plugin(PresetPlugin::new("a").with_options(json!([1])));
        assert!(matches!(preset.validate(), Err(DomainError::InvalidPreset(_))));
    }

    #[test]
    fn project_name_goes_into_service_options() {
        let mut preset = Preset::new("p").with_plugin(PresetPlugin::new("@kiln/cli-plugin-babel"));
        preset.inject_project_name("my-app");
        assert_eq!(preset.plugins[0].id, SERVICE_PLUGIN_ID);
        assert_eq!(preset.plugins[0].options, json!({"projectName": "my-app"}));
    }

    #[test]
    fn service_plugin_is_ordered_first() {
        let preset = Preset::new("p")
            .with_plugin(PresetPlugin::new("@kiln/cli-plugin-babel"))
            .with_plugin(PresetPlugin::new(SERVICE_PLUGIN_ID))
            .with_plugin(PresetPlugin::new("@kiln/cli-plugin-eslint"));
        let ids: Vec<_> = preset.ordered_plugins().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![SERVICE_PLUGIN_ID, "@kiln/cli-plugin-babel", "@kiln/cli-plugin-eslint"]
        );
    }
}
