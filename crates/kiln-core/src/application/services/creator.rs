//! Project Creator - the `create` use case.
//!
//! 1. Build the base manifest from the preset
//! 2. Resolve the preset's plugins through the catalog
//! 3. Generate the project
//! 4. Install dependencies (optional)
//! 5. Write a README when no plugin produced one

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use serde_json::{Map, Value, json};
use tracing::{info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, PackageInstaller, PluginCatalog, TemplateRenderer},
        services::{
            generator::{GenerateOptions, Generator},
            plugin::PluginDescriptor,
        },
    },
    domain::{
        DomainValidator as validator,
        entities::{manifest::Manifest, preset::Preset},
        readme::generate_readme,
    },
    error::{KilnError, KilnResult},
};

const README_FILE: &str = "README.md";
const INITIAL_VERSION: &str = "0.1.0";

/// How a project should be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub sort_manifest: bool,
    pub timeout: Option<Duration>,
    pub skip_install: bool,
    /// Build everything in memory and write nothing.
    pub dry_run: bool,
    /// Delete an existing `project_dir` once generation has succeeded in
    /// memory, just before the flush.
    pub replace_existing: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            sort_manifest: true,
            timeout: None,
            skip_install: false,
            dry_run: false,
            replace_existing: false,
        }
    }
}

/// What a `create` run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateReport {
    pub project_dir: PathBuf,
    /// Output paths, sorted.
    pub files: Vec<String>,
    pub plugins: Vec<String>,
    pub manifest: Manifest,
    pub installed: bool,
    pub dry_run: bool,
}

/// Creates projects from presets.
pub struct ProjectCreator {
    catalog: Arc<dyn PluginCatalog>,
    filesystem: Arc<dyn Filesystem>,
    renderer: Arc<dyn TemplateRenderer>,
    installer: Option<Arc<dyn PackageInstaller>>,
}

impl ProjectCreator {
    pub fn new(
        catalog: Arc<dyn PluginCatalog>,
        filesystem: Arc<dyn Filesystem>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        Self {
            catalog,
            filesystem,
            renderer,
            installer: None,
        }
    }

    pub fn with_installer(mut self, installer: Arc<dyn PackageInstaller>) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Create project `name` in `project_dir` from `preset`.
    #[instrument(
        skip_all,
        fields(project = %name, dir = %project_dir.display(), preset = %preset.name)
    )]
    pub async fn create(
        &self,
        name: &str,
        project_dir: &Path,
        mut preset: Preset,
        options: &CreateOptions,
    ) -> KilnResult<CreateReport> {
        validator::validate_project_name(name)?;
        validator::validate_preset(&preset)?;

        preset.inject_project_name(name);
        let plugins = self.resolve_plugins(&preset)?;
        let manifest = base_manifest(name, &preset, &plugins)?;
        let plugin_ids: Vec<String> = plugins.iter().map(|p| p.id.clone()).collect();
        info!(plugins = ?plugin_ids, "creating project");

        let mut generator = Generator::new(
            project_dir,
            plugins,
            manifest,
            Arc::clone(&self.filesystem),
            Arc::clone(&self.renderer),
        )?;
        let generate_options = GenerateOptions::default()
            .extract_config_files(preset.use_config_files)
            .sort_manifest(options.sort_manifest)
            .timeout(options.timeout);

        if options.dry_run {
            generator.prepare(&generate_options).await?;
            let with_readme = !generator.files().contains(README_FILE);
            return Ok(report(project_dir, &generator, plugin_ids, with_readme, false, true));
        }

        generator.prepare(&generate_options).await?;
        if options.replace_existing && self.filesystem.exists(project_dir) {
            warn!(dir = %project_dir.display(), "replacing existing directory");
            self.filesystem.remove_dir_all(project_dir)?;
        }
        generator.write()?;
        let with_readme = !generator.files().contains(README_FILE);
        let installed = self.install(project_dir, options).await?;
        if with_readme {
            self.write_readme(project_dir, generator.manifest())?;
        }

        info!(files = generator.files().len(), installed, "project created");
        Ok(report(project_dir, &generator, plugin_ids, with_readme, installed, false))
    }

    fn resolve_plugins(&self, preset: &Preset) -> KilnResult<Vec<PluginDescriptor>> {
        preset
            .ordered_plugins()
            .into_iter()
            .map(|entry| {
                self.catalog
                    .lookup(&entry.id)
                    .map(|descriptor| descriptor.with_options(entry.options.clone()))
                    .ok_or_else(|| {
                        KilnError::from(ApplicationError::UnknownPlugin {
                            id: entry.id.clone(),
                        })
                    })
            })
            .collect()
    }

    async fn install(&self, project_dir: &Path, options: &CreateOptions) -> KilnResult<bool> {
        if options.skip_install {
            info!("dependency installation skipped");
            return Ok(false);
        }
        match &self.installer {
            Some(installer) => {
                installer.install(project_dir).await?;
                Ok(true)
            }
            None => {
                warn!("no package installer configured, skipping install");
                Ok(false)
            }
        }
    }

    fn write_readme(&self, project_dir: &Path, manifest: &Manifest) -> KilnResult<()> {
        let readme = generate_readme(manifest);
        self.filesystem
            .write_file(&project_dir.join(README_FILE), readme.as_bytes())
    }
}

/// `{ name, version, private, devDependencies }` for the resolved plugins.
fn base_manifest(
    name: &str,
    preset: &Preset,
    plugins: &[PluginDescriptor],
) -> KilnResult<Manifest> {
    let mut dev_dependencies = Map::new();
    for (entry, descriptor) in preset.ordered_plugins().into_iter().zip(plugins) {
        dev_dependencies.insert(
            descriptor.id.clone(),
            Value::String(entry.version_or_latest().to_owned()),
        );
    }

    Ok(Manifest::from_value(json!({
        "name": name,
        "version": INITIAL_VERSION,
        "private": true,
        "devDependencies": dev_dependencies,
    }))?)
}

fn report(
    project_dir: &Path,
    generator: &Generator,
    plugins: Vec<String>,
    with_readme: bool,
    installed: bool,
    dry_run: bool,
) -> CreateReport {
    let mut files: Vec<String> = generator.files().paths().map(str::to_owned).collect();
    if with_readme {
        files.push(README_FILE.to_owned());
        files.sort();
    }
    CreateReport {
        project_dir: project_dir.to_path_buf(),
        files,
        plugins,
        manifest: generator.manifest().clone(),
        installed,
        dry_run,
    }
}
