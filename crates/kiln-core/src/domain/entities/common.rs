use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A project-relative output path.
///
/// Invariant: never absolute, never climbs above the project root, always
/// uses `/` as the separator. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    ///
    /// Backslashes are normalised to `/` and `.` segments are dropped so that
    /// `./src/main.js` and `src\main.js` name the same tree entry.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref().replace('\\', "/");
        let as_path = Path::new(&raw);

        if as_path.is_absolute() || raw.starts_with('/') {
            return Err(DomainError::AbsolutePathNotAllowed { path: raw });
        }

        let mut segments = Vec::new();
        for component in as_path.components() {
            match component {
                Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::PathEscapesRoot { path: raw });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed { path: raw });
                }
            }
        }

        if segments.is_empty() {
            return Err(DomainError::InvalidManifest(format!(
                "empty output path '{}'",
                path.as_ref()
            )));
        }

        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Resolve against an output root.
    pub fn to_path_under(&self, root: &Path) -> PathBuf {
        self.segments().fold(root.to_path_buf(), |acc, s| acc.join(s))
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for RelativePath {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
