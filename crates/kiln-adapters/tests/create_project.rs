//! End-to-end project creation with the builtin plugins and the handlebars
//! renderer, on the real filesystem and on the in-memory one.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use kiln_adapters::{
    HandlebarsRenderer, LocalFilesystem, MemoryFilesystem, PluginRegistry, PresetLoader,
};
use kiln_core::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

fn creator() -> ProjectCreator {
    ProjectCreator::new(
        Arc::new(PluginRegistry::with_builtins()),
        Arc::new(LocalFilesystem::new()),
        Arc::new(HandlebarsRenderer::new()),
    )
}

fn skip_install() -> CreateOptions {
    CreateOptions {
        skip_install: true,
        ..CreateOptions::default()
    }
}

fn package_json(dir: &Path) -> Value {
    let raw = fs::read_to_string(dir.join("package.json")).unwrap();
    assert!(raw.ends_with('\n'));
    serde_json::from_str(&raw).unwrap()
}

fn default_preset_with_router() -> Preset {
    PresetLoader::new()
        .find("default")
        .unwrap()
        .with_plugin(PresetPlugin::new("router").with_options(json!({ "historyMode": true })))
}

#[tokio::test]
async fn default_preset_produces_a_complete_project() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("hello-kiln");

    let report = creator()
        .create("hello-kiln", &dir, default_preset_with_router(), &skip_install())
        .await
        .unwrap();

    assert!(!report.installed);
    assert!(report.files.contains(&".gitignore".to_string()));
    assert!(report.files.contains(&".editorconfig".to_string()));
    assert!(report.files.contains(&"README.md".to_string()));

    let pkg = package_json(&dir);
    assert_eq!(pkg["name"], "hello-kiln");
    assert_eq!(pkg["private"], true);
    assert_eq!(pkg["dependencies"]["@kiln/router"], "^4.0.3");
    assert_eq!(pkg["eslintConfig"]["parserOptions"]["parser"], "@babel/eslint-parser");
    assert_eq!(pkg["devDependencies"]["@kiln/cli-plugin-babel"], "latest");
    assert_eq!(pkg["scripts"]["lint"], "kiln-service lint");

    let keys: Vec<&str> = pkg.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(&keys[..3], &["name", "version", "private"]);

    let index = fs::read_to_string(dir.join("public/index.html")).unwrap();
    assert!(index.contains("<title>hello-kiln</title>"));

    let main = fs::read_to_string(dir.join("src/main.js")).unwrap();
    assert!(main.contains("import 'core-js/stable'"));
    assert!(main.contains("import router from './router'"));
    assert!(main.contains("createApp(App).use(router).mount('#app')"));

    let router = fs::read_to_string(dir.join("src/router/index.js")).unwrap();
    assert!(router.contains("createWebHistory()"));
    assert!(!router.contains("createWebHashHistory"));

    assert!(dir.join("README.md").is_file());
}

#[tokio::test]
async fn binary_template_files_are_copied_verbatim() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("icons");

    creator()
        .create("icons", &dir, PresetLoader::new().find("minimal").unwrap(), &skip_install())
        .await
        .unwrap();

    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("templates/service/template/public/favicon.ico");
    assert_eq!(
        fs::read(dir.join("public/favicon.ico")).unwrap(),
        fs::read(source).unwrap()
    );

    let main = fs::read_to_string(dir.join("src/main.js")).unwrap();
    assert!(!main.contains("core-js/stable"));
    assert!(!main.contains("router"));
}

#[tokio::test]
async fn config_files_are_extracted_when_requested() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("split-config");
    let preset = PresetLoader::new()
        .find("default")
        .unwrap()
        .use_config_files(true);

    creator()
        .create("split-config", &dir, preset, &skip_install())
        .await
        .unwrap();

    let pkg = package_json(&dir);
    assert!(pkg.get("babel").is_none());
    assert!(pkg.get("eslintConfig").is_none());
    assert!(pkg.get("kiln").is_none());

    let babel = fs::read_to_string(dir.join("babel.config.js")).unwrap();
    assert!(babel.starts_with("module.exports = "));
    assert!(babel.contains("@kiln/cli-plugin-babel/preset"));
    assert!(dir.join(".eslintrc.js").is_file());
    assert!(dir.join("kiln.config.js").is_file());
}

#[tokio::test]
async fn lint_on_commit_adds_hooks() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("hooks");
    let preset = Preset::new("hooks").with_plugin(
        PresetPlugin::new("eslint").with_options(json!({ "config": "prettier", "lintOn": ["commit"] })),
    );

    creator()
        .create("hooks", &dir, preset, &skip_install())
        .await
        .unwrap();

    let pkg = package_json(&dir);
    assert_eq!(pkg["gitHooks"]["pre-commit"], "lint-staged");
    assert_eq!(pkg["devDependencies"]["prettier"], "^2.4.1");
    assert_eq!(pkg["eslintConfig"]["parserOptions"]["ecmaVersion"], 2020);
}

#[tokio::test]
async fn dry_run_leaves_disk_untouched() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("ghost");

    let report = creator()
        .create(
            "ghost",
            &dir,
            default_preset_with_router(),
            &CreateOptions {
                dry_run: true,
                ..skip_install()
            },
        )
        .await
        .unwrap();

    assert!(report.dry_run);
    assert!(report.files.contains(&"package.json".to_string()));
    assert!(report.files.contains(&"src/router/index.js".to_string()));
    assert!(!dir.exists());
}

/// A memory filesystem holding a copy of the builtin template directories at
/// their real absolute paths.
fn memory_with_templates() -> MemoryFilesystem {
    let memory = MemoryFilesystem::new();
    let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");
    for relative in LocalFilesystem::new().list_files(&templates).unwrap() {
        let source = templates.join(&relative);
        memory.seed(source.clone(), fs::read(&source).unwrap());
    }
    memory
}

fn memory_creator(memory: &MemoryFilesystem) -> ProjectCreator {
    ProjectCreator::new(
        Arc::new(PluginRegistry::with_builtins()),
        Arc::new(memory.clone()),
        Arc::new(HandlebarsRenderer::new()),
    )
}

#[tokio::test]
async fn in_memory_creation_never_touches_disk() {
    let memory = memory_with_templates();
    let dir = PathBuf::from("/virtual/in-memory");

    let report = memory_creator(&memory)
        .create("in-memory", &dir, default_preset_with_router(), &skip_install())
        .await
        .unwrap();

    for file in &report.files {
        assert!(memory.exists(&dir.join(file)), "{file} missing in memory");
    }
    let pkg: Value =
        serde_json::from_str(&memory.read_to_string(&dir.join("package.json")).unwrap()).unwrap();
    assert_eq!(pkg["name"], "in-memory");
    assert!(
        memory
            .read_to_string(&dir.join("public/index.html"))
            .unwrap()
            .contains("<title>in-memory</title>")
    );
    assert!(!dir.exists());
}

#[tokio::test]
async fn replacing_a_directory_waits_for_successful_generation() {
    let memory = memory_with_templates();
    let dir = PathBuf::from("/virtual/existing");
    memory.seed(dir.join("precious.txt"), "keep");
    let replace = CreateOptions {
        replace_existing: true,
        ..skip_install()
    };

    let broken = PresetLoader::new()
        .find("default")
        .unwrap()
        .with_plugin(PresetPlugin::new("does-not-exist"));
    assert!(
        memory_creator(&memory)
            .create("existing", &dir, broken, &replace)
            .await
            .is_err()
    );
    assert_eq!(memory.read_to_string(&dir.join("precious.txt")).as_deref(), Some("keep"));

    memory_creator(&memory)
        .create("existing", &dir, PresetLoader::new().find("minimal").unwrap(), &replace)
        .await
        .unwrap();
    assert!(!memory.exists(&dir.join("precious.txt")));
    assert!(memory.exists(&dir.join("package.json")));
}
