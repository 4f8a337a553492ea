//! Implementation of the `kiln create` command.
//!
//! Responsibility: turn CLI arguments and config into a preset plus
//! `CreateOptions`, wire the adapters into a `ProjectCreator`, and display
//! the report. No generation logic lives here.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use indicatif::ProgressBar;
use kiln_adapters::{
    HandlebarsRenderer, LocalFilesystem, NpmInstaller, PluginRegistry, PresetLoader,
};
use kiln_core::{
    application::{CreateOptions, CreateReport, ProjectCreator, ports::PackageInstaller},
    domain::{Preset, PresetPlugin},
    error::KilnResult,
};
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::{
    cli::CreateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute `kiln create`.
///
/// 1. Resolve the project name and directory
/// 2. Refuse an existing directory unless `--force`; the creator then
///    replaces it only after the project was built in memory
/// 3. Load the preset and apply `--plugin` / `--config-files`
/// 4. Run the creator; the installer reports progress with a spinner
/// 5. Print the report and next steps
#[instrument(skip_all, fields(project = %args.name))]
pub async fn execute(
    args: CreateArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let (project_name, project_dir) = resolve_project_path(&args.name)?;

    if project_dir.exists() && !args.dry_run {
        if !args.force {
            return Err(CliError::ProjectExists { path: project_dir });
        }
        output.warning(&format!(
            "{} will be replaced once the project is generated",
            project_dir.display()
        ))?;
    }

    let preset = build_preset(&args, &config)?;
    debug!(preset = %preset.name, plugins = preset.plugins.len(), "preset resolved");

    let options = create_options(&args, &config)?;
    let installer = SpinnerInstaller {
        inner: NpmInstaller::with_command(config.install.command.clone()),
        spinner: output.spinner(),
    };
    let creator = ProjectCreator::new(
        Arc::new(PluginRegistry::with_builtins()),
        Arc::new(LocalFilesystem::new()),
        Arc::new(HandlebarsRenderer::new()),
    )
    .with_installer(Arc::new(installer));

    let report = creator
        .create(&project_name, &project_dir, preset, &options)
        .await?;

    info!(files = report.files.len(), "create finished");
    print_report(&report, &project_name, &output)
}

/// Shows a spinner while the wrapped installer runs.
struct SpinnerInstaller<I> {
    inner: I,
    spinner: ProgressBar,
}

#[async_trait]
impl<I: PackageInstaller> PackageInstaller for SpinnerInstaller<I> {
    async fn install(&self, dir: &Path) -> KilnResult<()> {
        self.spinner.set_message("Installing dependencies...");
        self.spinner.enable_steady_tick(Duration::from_millis(80));
        let result = self.inner.install(dir).await;
        self.spinner.finish_and_clear();
        result
    }
}

/// Split `name` into the package name and the directory to create.
pub fn resolve_project_path(name: &str) -> CliResult<(String, PathBuf)> {
    let path = Path::new(name);

    let project_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidProjectName {
            name: name.into(),
            reason: "cannot extract a project name from this path".into(),
        })?
        .to_string();

    Ok((project_name, path.to_path_buf()))
}

fn build_preset(args: &CreateArgs, config: &AppConfig) -> CliResult<Preset> {
    let loader = match &config.presets.local_path {
        Some(dir) => PresetLoader::with_dir(dir),
        None => PresetLoader::new(),
    };
    let name = args.preset.as_deref().unwrap_or(&config.defaults.preset);
    let mut preset = loader.find(name)?;

    for id in &args.plugins {
        if !preset.has_plugin(id) {
            preset.plugins.push(PresetPlugin::new(id.as_str()));
        }
    }
    if args.config_files {
        preset.use_config_files = true;
    }
    Ok(preset)
}

fn create_options(args: &CreateArgs, config: &AppConfig) -> CliResult<CreateOptions> {
    let timeout_secs = args.timeout.or(config.generation.timeout_secs);
    if timeout_secs == Some(0) {
        return Err(CliError::InvalidInput {
            message: "timeout must be at least one second".into(),
            source: None,
        });
    }

    Ok(CreateOptions {
        sort_manifest: config.generation.sort_manifest,
        timeout: timeout_secs.map(Duration::from_secs),
        skip_install: args.skip_install || config.install.skip,
        dry_run: args.dry_run,
        replace_existing: args.force,
    })
}

fn print_report(
    report: &CreateReport,
    project_name: &str,
    output: &OutputManager,
) -> CliResult<()> {
    if output.is_json() {
        output.json(&json!({
            "name": project_name,
            "path": report.project_dir,
            "dryRun": report.dry_run,
            "installed": report.installed,
            "plugins": report.plugins,
            "files": report.files,
        }))?;
        return Ok(());
    }

    if report.dry_run {
        output.info(&format!(
            "Dry run: would create '{project_name}' at {} with {} files",
            report.project_dir.display(),
            report.files.len(),
        ))?;
        for file in &report.files {
            output.print(&format!("  {file}"))?;
        }
        return Ok(());
    }

    output.success(&format!("Project '{project_name}' created"))?;
    if output.is_quiet() {
        return Ok(());
    }

    output.print("")?;
    output.print("Next steps:")?;
    output.print(&format!("  cd {}", report.project_dir.display()))?;
    if !report.installed {
        output.print("  npm install")?;
    }
    output.print("  npm run serve")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(name: &str) -> CreateArgs {
        CreateArgs {
            name: name.into(),
            preset: None,
            plugins: Vec::new(),
            config_files: false,
            skip_install: false,
            force: false,
            dry_run: false,
            timeout: None,
        }
    }

    #[test]
    fn simple_name_resolves_to_relative_dir() {
        let (name, dir) = resolve_project_path("my-app").unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("my-app"));
    }

    #[test]
    fn nested_path_takes_the_leaf_as_name() {
        let sep = std::path::MAIN_SEPARATOR;
        let (name, dir) = resolve_project_path(&format!("..{sep}work{sep}my-app")).unwrap();
        assert_eq!(name, "my-app");
        assert_eq!(dir, PathBuf::from("..").join("work").join("my-app"));
    }

    #[test]
    fn dot_has_no_project_name() {
        assert!(matches!(
            resolve_project_path(".."),
            Err(CliError::InvalidProjectName { .. })
        ));
    }

    #[test]
    fn extra_plugins_are_appended_once() {
        let mut create = args("x");
        create.plugins = vec!["router".into(), "babel".into(), "router".into()];
        create.config_files = true;

        let preset = build_preset(&create, &AppConfig::default()).unwrap();
        let ids: Vec<&str> = preset.plugins.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "@kiln/cli-service",
                "@kiln/cli-plugin-babel",
                "@kiln/cli-plugin-eslint",
                "router",
            ]
        );
        assert!(preset.use_config_files);
    }

    #[test]
    fn preset_defaults_to_config_value() {
        let mut config = AppConfig::default();
        config.defaults.preset = "minimal".into();
        assert_eq!(build_preset(&args("x"), &config).unwrap().name, "minimal");
    }

    #[test]
    fn flags_and_config_combine_into_options() {
        let mut config = AppConfig::default();
        config.install.skip = true;
        config.generation.timeout_secs = Some(30);
        config.generation.sort_manifest = false;

        let mut create = args("x");
        create.timeout = Some(5);
        create.force = true;
        let options = create_options(&create, &config).unwrap();
        assert!(options.replace_existing);
        assert!(options.skip_install);
        assert!(!options.sort_manifest);
        assert_eq!(options.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut create = args("x");
        create.timeout = Some(0);
        assert!(matches!(
            create_options(&create, &AppConfig::default()),
            Err(CliError::InvalidInput { .. })
        ));
    }
}
