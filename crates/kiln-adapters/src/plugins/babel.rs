//! `@kiln/cli-plugin-babel`: manifest-only plugin.

use async_trait::async_trait;
use kiln_core::application::{Plugin, PluginApi, PluginError};
use serde_json::{Value, json};

pub(super) const ID: &str = "@kiln/cli-plugin-babel";

pub struct BabelPlugin;

#[async_trait]
impl Plugin for BabelPlugin {
    async fn apply(
        &self,
        api: &mut PluginApi<'_>,
        _options: &Value,
        _root_options: &Value,
    ) -> Result<(), PluginError> {
        api.extend_manifest(json!({
            "babel": {
                "presets": ["@kiln/cli-plugin-babel/preset"]
            },
            "dependencies": {
                "core-js": "^3.8.3"
            },
            "devDependencies": {
                "@babel/core": "^7.12.16"
            }
        }))?;
        Ok(())
    }
}
