//! The facade one plugin sees while it is being applied.

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{
    application::services::{
        plugin::{PluginDescriptor, PluginError},
        steps::{FileStep, FnStep, QueuedStep, RenderSource, RenderStep},
    },
    domain::{
        entities::{
            file_tree::FileTree,
            manifest::Manifest,
            plugin::{PluginSummary, matches_plugin_id},
        },
        error::DomainError,
    },
};

/// Per-plugin view of a running generation.
///
/// Manifest changes apply immediately. File work is queued and runs after
/// every plugin has been applied, in the order it was queued.
pub struct PluginApi<'a> {
    descriptor: &'a PluginDescriptor,
    plugins: &'a [PluginDescriptor],
    root_plugin_id: &'a str,
    root_options: &'a Value,
    manifest: &'a mut Manifest,
    steps: &'a mut Vec<QueuedStep>,
}

impl<'a> PluginApi<'a> {
    pub(crate) fn new(
        descriptor: &'a PluginDescriptor,
        plugins: &'a [PluginDescriptor],
        root_plugin_id: &'a str,
        root_options: &'a Value,
        manifest: &'a mut Manifest,
        steps: &'a mut Vec<QueuedStep>,
    ) -> Self {
        Self {
            descriptor,
            plugins,
            root_plugin_id,
            root_options,
            manifest,
            steps,
        }
    }

    /// Full id of the plugin this API is bound to.
    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn options(&self) -> &Value {
        &self.descriptor.options
    }

    pub fn root_options(&self) -> &Value {
        self.root_options
    }

    /// The complete plugin list of this generation, including plugins not
    /// applied yet.
    pub fn plugins(&self) -> &[PluginDescriptor] {
        self.plugins
    }

    /// The manifest as merged so far.
    pub fn manifest(&self) -> &Manifest {
        self.manifest
    }

    /// Is a plugin with this id (or alias) part of the generation?
    pub fn has_plugin(&self, id: &str) -> bool {
        self.plugins.iter().any(|p| matches_plugin_id(id, &p.id))
    }

    /// Deep-merge `fields` into the manifest right away.
    pub fn extend_manifest(&mut self, fields: Value) -> Result<(), DomainError> {
        debug!(plugin = %self.descriptor.id, "extending manifest");
        self.manifest.extend_with_value(&fields)
    }

    /// Queue rendering of `source` into the file tree.
    ///
    /// `extra_data` must be an object or null; its keys override the
    /// default data context.
    pub fn render(
        &mut self,
        source: impl Into<RenderSource>,
        extra_data: Value,
    ) -> Result<(), DomainError> {
        let extra = match extra_data {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            _ => {
                return Err(DomainError::InvalidManifest(format!(
                    "render data for '{}' must be an object",
                    self.descriptor.id
                )));
            }
        };

        let step = RenderStep::new(
            source.into(),
            self.descriptor.base_dir.clone(),
            self.template_data(extra),
        );
        self.inject_step(step);
        Ok(())
    }

    /// Queue a synchronous pass over the finished file tree.
    pub fn post_process_files<F>(&mut self, f: F)
    where
        F: Fn(&mut FileTree) -> Result<(), PluginError> + Send + Sync + 'static,
    {
        self.inject_step(FnStep::new(f));
    }

    /// Queue any step.
    pub fn inject_step(&mut self, step: impl FileStep + 'static) {
        self.steps.push(QueuedStep {
            plugin: self.descriptor.id.clone(),
            step: Box::new(step),
        });
    }

    /// Summaries of every plugin except the root one.
    pub fn plugin_summaries(&self) -> Vec<PluginSummary> {
        self.plugins
            .iter()
            .filter(|p| p.id != self.root_plugin_id)
            .map(PluginDescriptor::summary)
            .collect()
    }

    /// `{ options, rootOptions, plugins }` with `extra` merged over the top.
    fn template_data(&self, extra: Map<String, Value>) -> Value {
        let mut data = json!({
            "options": self.descriptor.options,
            "rootOptions": self.root_options,
            "plugins": self.plugin_summaries(),
        });
        if let Value::Object(map) = &mut data {
            map.extend(extra);
        }
        data
    }
}
