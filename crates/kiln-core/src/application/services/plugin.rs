//! The plugin contract and the descriptor the generator runs plugins from.

use std::{fmt, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{
    application::services::plugin_api::PluginApi,
    domain::entities::plugin::{PluginSummary, plugin_link, to_short_plugin_id},
};

/// Error type plugins and steps report. Anything `Error + Send + Sync` fits.
pub type PluginError = Box<dyn std::error::Error + Send + Sync>;

/// A unit that contributes manifest fragments and files to a project.
///
/// `apply` runs once, strictly after the previous plugin's `apply` has
/// finished. File work should be queued through the API rather than done
/// directly, so that nothing touches disk before every plugin succeeded.
#[async_trait]
pub trait Plugin: Send + Sync {
    async fn apply(
        &self,
        api: &mut PluginApi<'_>,
        options: &Value,
        root_options: &Value,
    ) -> Result<(), PluginError>;
}

/// Adapter turning a synchronous closure into a [`Plugin`].
pub struct FnPlugin<F> {
    f: F,
}

impl<F> FnPlugin<F>
where
    F: Fn(&mut PluginApi<'_>, &Value, &Value) -> Result<(), PluginError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> Plugin for FnPlugin<F>
where
    F: Fn(&mut PluginApi<'_>, &Value, &Value) -> Result<(), PluginError> + Send + Sync,
{
    async fn apply(
        &self,
        api: &mut PluginApi<'_>,
        options: &Value,
        root_options: &Value,
    ) -> Result<(), PluginError> {
        (self.f)(api, options, root_options)
    }
}

/// One entry of the plugin list handed to the generator.
#[derive(Clone)]
pub struct PluginDescriptor {
    pub id: String,
    pub plugin: Arc<dyn Plugin>,
    pub options: Value,
    /// Root that relative `render` directories resolve against.
    pub base_dir: Option<PathBuf>,
    pub homepage: Option<String>,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>, plugin: Arc<dyn Plugin>) -> Self {
        Self {
            id: id.into(),
            plugin,
            options: Value::Object(Map::new()),
            base_dir: None,
            homepage: None,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_homepage(mut self, homepage: impl Into<String>) -> Self {
        self.homepage = Some(homepage.into());
        self
    }

    pub fn short_id(&self) -> &str {
        to_short_plugin_id(&self.id)
    }

    pub fn link(&self) -> String {
        plugin_link(&self.id, self.homepage.as_deref())
    }

    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            name: self.short_id().to_owned(),
            link: self.link(),
        }
    }
}

impl fmt::Debug for PluginDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDescriptor")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("base_dir", &self.base_dir)
            .field("homepage", &self.homepage)
            .finish_non_exhaustive()
    }
}
