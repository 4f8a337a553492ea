use std::collections::BTreeMap;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// How many leading bytes are inspected when sniffing for binary content.
const BINARY_SNIFF_LEN: usize = 8000;

/// Content of one output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Classify raw bytes by looking at the content, never the extension.
    ///
    /// A NUL byte in the first 8000 bytes, or bytes that are not valid UTF-8,
    /// mark the content as binary.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if is_binary(&bytes) {
            return Self::Binary(bytes);
        }
        match String::from_utf8(bytes) {
            Ok(text) => Self::Text(text),
            Err(e) => Self::Binary(e.into_bytes()),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Binary(b) => b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Binary(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary(_))
    }

    /// Empty or whitespace-only text. Binary content is never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Binary(_) => false,
        }
    }

    pub fn size(&self) -> usize {
        self.as_bytes().len()
    }
}

impl From<String> for FileContent {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for FileContent {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<Vec<u8>> for FileContent {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

/// Content sniffing used by [`FileContent::from_bytes`].
pub fn is_binary(bytes: &[u8]) -> bool {
    let check_len = bytes.len().min(BINARY_SNIFF_LEN);
    bytes[..check_len].contains(&0) || std::str::from_utf8(bytes).is_err()
}

/// Map a template source path to its output path.
///
/// Per segment: `_name` becomes `.name`, `__name` becomes `_name`, anything
/// else passes through. Lets template directories ship dotfiles without
/// tooling treating them specially.
pub fn escape_template_path(raw: &str) -> String {
    raw.split('/')
        .map(|segment| {
            if let Some(rest) = segment.strip_prefix("__") {
                format!("_{rest}")
            } else if let Some(rest) = segment.strip_prefix('_') {
                format!(".{rest}")
            } else {
                segment.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The complete set of files to be written for a project.
///
/// Keys are project-relative paths. A later insert at the same path replaces
/// the earlier content, so insertion order is composition order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTree {
    entries: BTreeMap<RelativePath, FileContent>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, returning the content it replaced.
    pub fn insert(
        &mut self,
        path: impl AsRef<str>,
        content: impl Into<FileContent>,
    ) -> Result<Option<FileContent>, DomainError> {
        let path = RelativePath::try_new(path)?;
        Ok(self.entries.insert(path, content.into()))
    }

    pub fn with_file(
        mut self,
        path: impl AsRef<str>,
        content: impl Into<FileContent>,
    ) -> Result<Self, DomainError> {
        self.insert(path, content)?;
        Ok(self)
    }

    pub fn get(&self, path: &str) -> Option<&FileContent> {
        let path = RelativePath::try_new(path).ok()?;
        self.entries.get(&path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn remove(&mut self, path: &str) -> Option<FileContent> {
        let path = RelativePath::try_new(path).ok()?;
        self.entries.remove(&path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RelativePath, &FileContent)> {
        self.entries.iter()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(RelativePath::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.entries.values().map(FileContent::size).sum()
    }
}
