//! `@kiln/cli-service`: the project skeleton every preset starts from.

use async_trait::async_trait;
use kiln_core::{
    application::{Plugin, PluginApi, PluginError},
    domain::SERVICE_PLUGIN_ID,
};
use serde_json::{Value, json};

pub(super) const ID: &str = SERVICE_PLUGIN_ID;

pub struct ServicePlugin;

#[async_trait]
impl Plugin for ServicePlugin {
    async fn apply(
        &self,
        api: &mut PluginApi<'_>,
        _options: &Value,
        _root_options: &Value,
    ) -> Result<(), PluginError> {
        let has_babel = api.has_plugin("babel");
        api.render("template", json!({ "hasBabel": has_babel }))?;

        api.extend_manifest(json!({
            "scripts": {
                "serve": "kiln-service serve",
                "build": "kiln-service build"
            },
            "dependencies": {
                "@kiln/runtime": "^1.0.0",
                "core-js": "^3.8.3"
            },
            "devDependencies": {
                "@kiln/cli-service": "~1.0.0"
            },
            "kiln": {
                "transpileDependencies": true
            },
            "browserslist": ["> 1%", "last 2 versions", "not dead"]
        }))?;

        Ok(())
    }
}
