//! Integration tests for project creation from presets.

mod common;

use std::sync::Arc;

use common::{CountingInstaller, TestCatalog, TestFs, TestRenderer, plugin};
use kiln_core::{application::ApplicationError, prelude::*};
use serde_json::{Value, json};

fn catalog() -> TestCatalog {
    TestCatalog(vec![
        plugin(SERVICE_PLUGIN_ID, |api, options, _| {
            let name = options["projectName"].as_str().unwrap_or_default().to_owned();
            api.extend_manifest(json!({
                "scripts": {"build": "kiln build", "serve": "kiln serve"},
                "kiln": {"outputDir": "dist"}
            }))?;
            api.render(
                RenderSource::inline([("src/main.js", format!("// {name}\n"))]),
                Value::Null,
            )?;
            Ok(())
        }),
        plugin("@kiln/cli-plugin-babel", |api, _, _| {
            api.extend_manifest(json!({"babel": {"presets": ["@kiln/babel-preset-app"]}}))?;
            Ok(())
        }),
    ])
}

fn creator(fs: Arc<TestFs>) -> (ProjectCreator, Arc<CountingInstaller>) {
    let installer = Arc::new(CountingInstaller::default());
    let creator = ProjectCreator::new(Arc::new(catalog()), fs, Arc::new(TestRenderer))
        .with_installer(installer.clone());
    (creator, installer)
}

fn preset() -> Preset {
    Preset::new("test").with_plugin(PresetPlugin::new("babel"))
}

#[tokio::test]
async fn test_create_writes_project_and_readme() {
    let fs = TestFs::new();
    let (creator, installer) = creator(fs.clone());

    let report = creator
        .create("my-app", "/out".as_ref(), preset(), &CreateOptions::default())
        .await
        .unwrap();

    assert_eq!(report.plugins, vec![SERVICE_PLUGIN_ID, "@kiln/cli-plugin-babel"]);
    assert_eq!(installer.count(), 1);
    assert!(report.installed);

    assert_eq!(fs.text("/out/src/main.js").as_deref(), Some("// my-app\n"));
    let readme = fs.text("/out/README.md").unwrap();
    assert!(readme.starts_with("# my-app\n"));
    assert!(readme.contains("npm run serve"));
    assert!(report.files.contains(&"README.md".to_owned()));

    let manifest: Value = serde_json::from_str(&fs.text("/out/package.json").unwrap()).unwrap();
    assert_eq!(manifest["version"], "0.1.0");
    assert_eq!(manifest["private"], true);
    assert_eq!(
        manifest["devDependencies"],
        json!({"@kiln/cli-plugin-babel": "latest", "@kiln/cli-service": "latest"})
    );
}

#[tokio::test]
async fn test_create_honours_use_config_files() {
    let fs = TestFs::new();
    let (creator, _) = creator(fs.clone());

    creator
        .create(
            "my-app",
            "/out".as_ref(),
            preset().use_config_files(true),
            &CreateOptions::default(),
        )
        .await
        .unwrap();

    assert!(fs.text("/out/babel.config.js").is_some());
    let kiln_config = fs.text("/out/kiln.config.js").unwrap();
    assert!(kiln_config.starts_with("const { defineConfig } = require('@kiln/cli-service')"));
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let fs = TestFs::new();
    let (creator, installer) = creator(fs.clone());

    let options = CreateOptions {
        dry_run: true,
        ..CreateOptions::default()
    };
    let report = creator
        .create("my-app", "/out".as_ref(), preset(), &options)
        .await
        .unwrap();

    assert!(report.dry_run);
    assert!(report.files.contains(&"package.json".to_owned()));
    assert!(report.files.contains(&"src/main.js".to_owned()));
    assert!(fs.files_under("/out").is_empty());
    assert_eq!(installer.count(), 0);
}

#[tokio::test]
async fn test_skip_install() {
    let fs = TestFs::new();
    let (creator, installer) = creator(fs.clone());

    let options = CreateOptions {
        skip_install: true,
        ..CreateOptions::default()
    };
    let report = creator
        .create("my-app", "/out".as_ref(), preset(), &options)
        .await
        .unwrap();

    assert!(!report.installed);
    assert_eq!(installer.count(), 0);
}

#[tokio::test]
async fn test_unknown_plugin_fails_before_writing() {
    let fs = TestFs::new();
    let (creator, _) = creator(fs.clone());

    let err = creator
        .create(
            "my-app",
            "/out".as_ref(),
            preset().with_plugin(PresetPlugin::new("pwa")),
            &CreateOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        KilnError::Application(ApplicationError::UnknownPlugin { ref id }) if id == "pwa"
    ));
    assert!(fs.files_under("/out").is_empty());
}

#[tokio::test]
async fn test_invalid_project_name_rejected() {
    let fs = TestFs::new();
    let (creator, _) = creator(fs);

    let result = creator
        .create("My App", "/out".as_ref(), preset(), &CreateOptions::default())
        .await;

    assert!(matches!(result, Err(KilnError::Domain(_))));
}

fn replacing() -> CreateOptions {
    CreateOptions {
        replace_existing: true,
        skip_install: true,
        ..CreateOptions::default()
    }
}

#[tokio::test]
async fn test_replace_existing_keeps_directory_when_generation_fails() {
    let fs = TestFs::new();
    fs.seed("/out/precious.txt", "keep me");
    fs.create_dir_all("/out".as_ref()).unwrap();

    let failing = TestCatalog(vec![
        plugin(SERVICE_PLUGIN_ID, |_, _, _| Ok(())),
        plugin("@kiln/cli-plugin-broken", |_, _, _| Err("setup exploded".into())),
    ]);
    let creator = ProjectCreator::new(Arc::new(failing), fs.clone(), Arc::new(TestRenderer));

    for preset in [
        preset().with_plugin(PresetPlugin::new("pwa")),
        Preset::new("broken").with_plugin(PresetPlugin::new("broken")),
    ] {
        assert!(
            creator
                .create("my-app", "/out".as_ref(), preset, &replacing())
                .await
                .is_err()
        );
        assert_eq!(fs.text("/out/precious.txt").as_deref(), Some("keep me"));
    }
}

#[tokio::test]
async fn test_replace_existing_clears_directory_before_flush() {
    let fs = TestFs::new();
    fs.seed("/out/stale.txt", "old");
    fs.create_dir_all("/out".as_ref()).unwrap();
    fs.seed("/outside/other.txt", "untouched");
    let (creator, _) = creator(fs.clone());

    creator
        .create("my-app", "/out".as_ref(), preset(), &replacing())
        .await
        .unwrap();

    assert!(fs.text("/out/stale.txt").is_none());
    assert!(fs.text("/out/package.json").is_some());
    assert_eq!(fs.text("/outside/other.txt").as_deref(), Some("untouched"));
}
