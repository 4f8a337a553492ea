//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use kiln_core::{
    application::ApplicationError,
    domain::entities::plugin::matches_plugin_id,
    prelude::*,
};
use serde_json::{Value, json};

/// In-memory filesystem recording every write.
#[derive(Default)]
pub struct TestFs {
    files: Mutex<BTreeMap<PathBuf, Vec<u8>>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
}

impl TestFs {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seed(&self, path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) {
        self.files
            .lock()
            .unwrap()
            .insert(path.into(), content.into());
    }

    pub fn text(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap()
            .get(Path::new(path))
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn bytes(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    /// Files below `root`.
    pub fn files_under(&self, root: &str) -> Vec<PathBuf> {
        self.files
            .lock()
            .unwrap()
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect()
    }
}

impl Filesystem for TestFs {
    fn create_dir_all(&self, path: &Path) -> KilnResult<()> {
        self.dirs.lock().unwrap().insert(path.to_path_buf());
        Ok(())
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> KilnResult<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KilnResult<Vec<u8>> {
        self.bytes(&path.to_string_lossy()).ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "not found".into(),
            }
            .into()
        })
    }

    fn list_files(&self, dir: &Path) -> KilnResult<Vec<PathBuf>> {
        Ok(self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(dir).ok().map(Path::to_path_buf))
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn remove_dir_all(&self, path: &Path) -> KilnResult<()> {
        self.files.lock().unwrap().retain(|p, _| !p.starts_with(path));
        self.dirs.lock().unwrap().retain(|p| !p.starts_with(path));
        Ok(())
    }
}

/// `{{ dotted.path }}` substitution; unclosed tags are template errors.
pub struct TestRenderer;

impl TemplateRenderer for TestRenderer {
    fn render(&self, template: &str, data: &Value, path: &Path) -> KilnResult<String> {
        let mut out = String::new();
        let mut rest = template;
        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find("}}").ok_or_else(|| ApplicationError::TemplateError {
                path: path.to_path_buf(),
                reason: "unclosed tag".into(),
            })?;
            let key = after[..end].trim();
            match key.split('.').try_fold(data, |v, k| v.get(k)) {
                Some(Value::String(s)) => out.push_str(s),
                Some(Value::Null) | None => {}
                Some(other) => out.push_str(&other.to_string()),
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// Catalog over a fixed descriptor list.
pub struct TestCatalog(pub Vec<PluginDescriptor>);

impl PluginCatalog for TestCatalog {
    fn lookup(&self, id: &str) -> Option<PluginDescriptor> {
        self.0
            .iter()
            .find(|p| matches_plugin_id(id, &p.id))
            .cloned()
    }

    fn ids(&self) -> Vec<String> {
        self.0.iter().map(|p| p.id.clone()).collect()
    }
}

/// Installer that only counts calls.
#[derive(Default)]
pub struct CountingInstaller {
    pub calls: AtomicUsize,
}

#[async_trait]
impl PackageInstaller for CountingInstaller {
    async fn install(&self, _dir: &Path) -> KilnResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl CountingInstaller {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

pub fn plugin<F>(id: &str, f: F) -> PluginDescriptor
where
    F: Fn(&mut PluginApi<'_>, &Value, &Value) -> Result<(), PluginError> + Send + Sync + 'static,
{
    PluginDescriptor::new(id, Arc::new(FnPlugin::new(f)))
}

pub fn base_manifest() -> Manifest {
    Manifest::from_value(json!({
        "name": "my-app",
        "version": "0.1.0",
        "private": true,
        "devDependencies": {}
    }))
    .unwrap()
}

pub fn generator(
    plugins: Vec<PluginDescriptor>,
    fs: Arc<TestFs>,
) -> Generator {
    Generator::new("/out", plugins, base_manifest(), fs, Arc::new(TestRenderer)).unwrap()
}

pub fn manifest_json(fs: &TestFs) -> Value {
    serde_json::from_str(&fs.text("/out/package.json").unwrap()).unwrap()
}
