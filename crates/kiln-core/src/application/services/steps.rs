//! Deferred file steps: work queued by plugins and drained after all of them
//! have been applied.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRenderer},
        services::plugin::PluginError,
    },
    domain::entities::file_tree::{FileContent, FileTree, escape_template_path},
};

/// Collaborators a step may use while it runs.
pub struct StepContext<'a> {
    pub fs: &'a dyn Filesystem,
    pub renderer: &'a dyn TemplateRenderer,
}

/// Async unit of work over the file tree.
#[async_trait]
pub trait FileStep: Send + Sync {
    async fn run(&self, files: &mut FileTree, ctx: &StepContext<'_>) -> Result<(), PluginError>;
}

/// A step together with the plugin that queued it.
pub(crate) struct QueuedStep {
    pub plugin: String,
    pub step: Box<dyn FileStep>,
}

/// Adapter turning a synchronous closure over the tree into a [`FileStep`].
pub struct FnStep<F> {
    f: F,
}

impl<F> FnStep<F>
where
    F: Fn(&mut FileTree) -> Result<(), PluginError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F> FileStep for FnStep<F>
where
    F: Fn(&mut FileTree) -> Result<(), PluginError> + Send + Sync,
{
    async fn run(&self, files: &mut FileTree, _ctx: &StepContext<'_>) -> Result<(), PluginError> {
        (self.f)(files)
    }
}

/// Where a render step takes its templates from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSource {
    /// A template directory. Relative paths resolve against the plugin's
    /// base dir.
    Dir(PathBuf),
    /// Output path to template text. Paths are used as given.
    Inline(Vec<(String, String)>),
}

impl RenderSource {
    pub fn inline<I, P, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (P, T)>,
        P: Into<String>,
        T: Into<String>,
    {
        Self::Inline(
            entries
                .into_iter()
                .map(|(path, text)| (path.into(), text.into()))
                .collect(),
        )
    }
}

impl From<&str> for RenderSource {
    fn from(dir: &str) -> Self {
        Self::Dir(PathBuf::from(dir))
    }
}

impl From<PathBuf> for RenderSource {
    fn from(dir: PathBuf) -> Self {
        Self::Dir(dir)
    }
}

impl From<&Path> for RenderSource {
    fn from(dir: &Path) -> Self {
        Self::Dir(dir.to_path_buf())
    }
}

/// Renders a template source into the tree with a fixed data context.
pub struct RenderStep {
    source: RenderSource,
    base_dir: Option<PathBuf>,
    data: Value,
}

impl RenderStep {
    pub fn new(source: RenderSource, base_dir: Option<PathBuf>, data: Value) -> Self {
        Self {
            source,
            base_dir,
            data,
        }
    }

    fn resolve_dir(&self, dir: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if dir.is_relative() => base.join(dir),
            _ => dir.to_path_buf(),
        }
    }

    fn render_dir(
        &self,
        dir: &Path,
        files: &mut FileTree,
        ctx: &StepContext<'_>,
    ) -> Result<(), PluginError> {
        let root = self.resolve_dir(dir);
        debug!(dir = %root.display(), "rendering template directory");

        for relative in ctx.fs.list_files(&root)? {
            let source_path = root.join(&relative);
            let raw = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            let target = escape_template_path(&raw);

            let content = match FileContent::from_bytes(ctx.fs.read_file(&source_path)?) {
                FileContent::Text(text) => {
                    FileContent::Text(ctx.renderer.render(&text, &self.data, &source_path)?)
                }
                binary => binary,
            };

            if content.is_blank() {
                trace!(file = %target, "rendered blank, skipped");
                continue;
            }
            trace!(file = %target, bytes = content.size(), "rendered");
            files.insert(target, content)?;
        }
        Ok(())
    }

    fn render_inline(
        &self,
        entries: &[(String, String)],
        files: &mut FileTree,
        ctx: &StepContext<'_>,
    ) -> Result<(), PluginError> {
        for (target, template) in entries {
            let rendered = ctx.renderer.render(template, &self.data, Path::new(target))?;
            if rendered.trim().is_empty() {
                trace!(file = %target, "rendered blank, skipped");
                continue;
            }
            files.insert(target, rendered)?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileStep for RenderStep {
    async fn run(&self, files: &mut FileTree, ctx: &StepContext<'_>) -> Result<(), PluginError> {
        match &self.source {
            RenderSource::Dir(dir) => self.render_dir(dir, files, ctx),
            RenderSource::Inline(entries) => self.render_inline(entries, files, ctx),
        }
    }
}

/// Map a failed step to the error the generator reports.
///
/// Template errors pass through untouched; everything else becomes
/// `StepFailed` for the plugin that queued the step.
pub(crate) fn step_error(plugin: &str, err: PluginError) -> crate::error::KilnError {
    use crate::error::KilnError;

    match err.downcast::<KilnError>() {
        Ok(kiln) => match *kiln {
            template @ KilnError::Application(ApplicationError::TemplateError { .. }) => template,
            other => ApplicationError::StepFailed {
                plugin: plugin.to_owned(),
                reason: other.to_string(),
            }
            .into(),
        },
        Err(other) => ApplicationError::StepFailed {
            plugin: plugin.to_owned(),
            reason: other.to_string(),
        }
        .into(),
    }
}
