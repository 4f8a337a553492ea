//! Generator - the engine that turns a plugin list into a project directory.
//!
//! Stages, each finished before the next begins:
//! 1. Apply every plugin in list order
//! 2. Drain the deferred file steps in the order they were queued
//! 3. Extract allow-listed configs out of the manifest (optional)
//! 4. Sort the manifest (optional) and serialize it as `package.json`
//! 5. Flush the file tree to disk
//!
//! Nothing is written before stage 5, and stage 5 does not roll back.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
        services::{
            plugin::PluginDescriptor,
            plugin_api::PluginApi,
            steps::{QueuedStep, StepContext, step_error},
        },
    },
    domain::{
        DomainValidator as validator,
        config_transform::{ConfigTransform, default_config_transforms},
        entities::{file_tree::FileTree, manifest::Manifest, plugin::SERVICE_PLUGIN_ID},
    },
    error::KilnResult,
};

const MANIFEST_FILE: &str = "package.json";

/// Knobs for one `generate` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Move allow-listed configs from the manifest into their own files.
    pub extract_config_files: bool,
    /// During extraction, prefer a candidate filename already in the tree.
    pub check_existing: bool,
    pub sort_manifest: bool,
    /// Deadline for everything before the flush.
    pub timeout: Option<Duration>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            extract_config_files: false,
            check_existing: false,
            sort_manifest: true,
            timeout: None,
        }
    }
}

impl GenerateOptions {
    pub fn extract_config_files(mut self, enabled: bool) -> Self {
        self.extract_config_files = enabled;
        self
    }

    pub fn check_existing(mut self, enabled: bool) -> Self {
        self.check_existing = enabled;
        self
    }

    pub fn sort_manifest(mut self, enabled: bool) -> Self {
        self.sort_manifest = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Owns the manifest, the file tree and the plugin list of one project.
pub struct Generator {
    context: PathBuf,
    plugins: Vec<PluginDescriptor>,
    manifest: Manifest,
    files: FileTree,
    root_plugin_id: String,
    config_transforms: Vec<(&'static str, ConfigTransform)>,
    filesystem: Arc<dyn Filesystem>,
    renderer: Arc<dyn TemplateRenderer>,
}

impl Generator {
    /// Create a generator writing into `context`.
    ///
    /// Plugin ids must be unique and the base manifest must carry a name.
    pub fn new(
        context: impl Into<PathBuf>,
        plugins: Vec<PluginDescriptor>,
        base_manifest: Manifest,
        filesystem: Arc<dyn Filesystem>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> KilnResult<Self> {
        validator::validate_plugin_ids(plugins.iter().map(|p| p.id.as_str()))?;
        validator::validate_base_manifest(&base_manifest)?;

        Ok(Self {
            context: context.into(),
            plugins,
            manifest: base_manifest,
            files: FileTree::new(),
            root_plugin_id: SERVICE_PLUGIN_ID.to_owned(),
            config_transforms: default_config_transforms(),
            filesystem,
            renderer,
        })
    }

    /// Use another plugin's options as the root options.
    pub fn with_root_plugin(mut self, id: impl Into<String>) -> Self {
        self.root_plugin_id = id.into();
        self
    }

    /// Replace the config extraction allow-list.
    pub fn with_config_transforms(
        mut self,
        transforms: Vec<(&'static str, ConfigTransform)>,
    ) -> Self {
        self.config_transforms = transforms;
        self
    }

    pub fn context(&self) -> &Path {
        &self.context
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn files(&self) -> &FileTree {
        &self.files
    }

    /// The root plugin's options, or `{ projectName }` inferred from the
    /// manifest when no root plugin is present.
    pub fn root_options(&self) -> Value {
        match self.plugins.iter().find(|p| p.id == self.root_plugin_id) {
            Some(root) => root.options.clone(),
            None => json!({ "projectName": self.manifest.name() }),
        }
    }

    /// Run every stage and write the project.
    #[instrument(
        skip_all,
        fields(context = %self.context.display(), plugins = self.plugins.len())
    )]
    pub async fn generate(&mut self, options: GenerateOptions) -> KilnResult<()> {
        self.prepare(&options).await?;
        self.write()?;
        info!("generation complete");
        Ok(())
    }

    /// Flush the prepared tree to disk.
    pub fn write(&self) -> KilnResult<()> {
        info!(files = self.files.len(), "writing project");
        write_file_tree(self.filesystem.as_ref(), &self.context, &self.files)
    }

    /// Everything `generate` does except the flush.
    ///
    /// Leaves the final manifest and file tree in place for inspection.
    pub async fn prepare(&mut self, options: &GenerateOptions) -> KilnResult<()> {
        match options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.build(options))
                .await
                .map_err(|_| ApplicationError::TimedOut(limit))?,
            None => self.build(options).await,
        }
    }

    async fn build(&mut self, options: &GenerateOptions) -> KilnResult<()> {
        let steps = self.apply_plugins().await?;
        self.drain_steps(steps).await?;

        if options.extract_config_files {
            self.extract_config_files(options.check_existing)?;
        }
        if options.sort_manifest {
            self.manifest.sort();
        }

        self.files
            .insert(MANIFEST_FILE, self.manifest.to_json_string()?)?;
        Ok(())
    }

    async fn apply_plugins(&mut self) -> KilnResult<Vec<QueuedStep>> {
        let root_options = self.root_options();
        let mut steps = Vec::new();

        for descriptor in &self.plugins {
            debug!(plugin = %descriptor.id, "applying plugin");
            let mut api = PluginApi::new(
                descriptor,
                &self.plugins,
                &self.root_plugin_id,
                &root_options,
                &mut self.manifest,
                &mut steps,
            );
            descriptor
                .plugin
                .apply(&mut api, &descriptor.options, &root_options)
                .await
                .map_err(|e| ApplicationError::PluginSetupFailed {
                    plugin: descriptor.id.clone(),
                    reason: e.to_string(),
                })?;
        }

        info!(steps = steps.len(), "all plugins applied");
        Ok(steps)
    }

    async fn drain_steps(&mut self, steps: Vec<QueuedStep>) -> KilnResult<()> {
        let ctx = StepContext {
            fs: self.filesystem.as_ref(),
            renderer: self.renderer.as_ref(),
        };

        for queued in steps {
            debug!(plugin = %queued.plugin, "running deferred step");
            queued
                .step
                .run(&mut self.files, &ctx)
                .await
                .map_err(|e| step_error(&queued.plugin, e))?;
        }
        Ok(())
    }

    fn extract_config_files(&mut self, check_existing: bool) -> KilnResult<()> {
        for (key, transform) in &self.config_transforms {
            let Some(value) = self.manifest.get(key).filter(|v| !v.is_null()).cloned() else {
                continue;
            };

            let existing = check_existing.then_some(&self.files);
            let file = transform.transform(key, &value, existing)?;
            debug!(key = %key, file = %file.filename, "config extracted");

            self.manifest.remove(key);
            self.files.insert(&file.filename, file.content)?;
        }
        Ok(())
    }
}

/// Write every tree entry under `root`, creating parent directories.
///
/// Stops at the first failure; files already written stay on disk.
pub fn write_file_tree(fs: &dyn Filesystem, root: &Path, tree: &FileTree) -> KilnResult<()> {
    for (path, content) in tree.iter() {
        let target = path.to_path_under(root);
        if let Some(parent) = target.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.write_file(&target, content.as_bytes())?;
        debug!(file = %path.as_str(), "written");
    }
    Ok(())
}
