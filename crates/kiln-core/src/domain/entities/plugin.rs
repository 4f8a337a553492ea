//! Plugin identifiers and the naming conventions around them.
//!
//! Full ids come in three shapes:
//!
//! ```text
//! @kiln/cli-plugin-babel        official
//! kiln-cli-plugin-foo           community, unscoped
//! @acme/kiln-cli-plugin-foo     community, scoped
//! ```
//!
//! Each has a short alias (`babel`, `foo`) that [`matches_plugin_id`]
//! accepts interchangeably with the full id.

use std::fmt;

use serde::Serialize;

use crate::domain::error::DomainError;

/// Id of the root service plugin. Its options become the root options.
pub const SERVICE_PLUGIN_ID: &str = "@kiln/cli-service";

const OFFICIAL_SCOPE: &str = "@kiln/";
const PLUGIN_PREFIX: &str = "cli-plugin-";
const COMMUNITY_PREFIX: &str = "kiln-cli-plugin-";

/// A validated plugin id (full or short form, as given).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PluginId(String);

impl PluginId {
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DomainError::InvalidPluginId {
                id,
                reason: "id cannot be empty".into(),
            });
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidPluginId {
                id,
                reason: "id cannot contain whitespace".into(),
            });
        }
        if id.starts_with('@') && split_scope(&id).is_none() {
            return Err(DomainError::InvalidPluginId {
                id,
                reason: "scoped ids look like @scope/name".into(),
            });
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PluginId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// What templates see about an installed plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub name: String,
    pub link: String,
}

/// `@scope/rest` → (`@scope/`, `rest`).
fn split_scope(id: &str) -> Option<(&str, &str)> {
    if !id.starts_with('@') {
        return None;
    }
    let slash = id.find('/')?;
    let (scope, rest) = id.split_at(slash + 1);
    if scope.len() < 3 || rest.is_empty() {
        return None;
    }
    Some((scope, rest))
}

/// Length of the plugin prefix at the start of `id`, if it has one.
fn plugin_prefix_len(id: &str) -> Option<usize> {
    if let Some(rest) = id.strip_prefix(OFFICIAL_SCOPE) {
        return rest
            .starts_with(PLUGIN_PREFIX)
            .then_some(OFFICIAL_SCOPE.len() + PLUGIN_PREFIX.len());
    }
    if id.starts_with(COMMUNITY_PREFIX) {
        return Some(COMMUNITY_PREFIX.len());
    }
    let (scope, rest) = split_scope(id)?;
    rest.starts_with(COMMUNITY_PREFIX)
        .then_some(scope.len() + COMMUNITY_PREFIX.len())
}

/// Whether `id` is a full plugin id in any of the recognised shapes.
pub fn is_plugin(id: &str) -> bool {
    plugin_prefix_len(id).is_some()
}

pub fn to_short_plugin_id(id: &str) -> &str {
    match plugin_prefix_len(id) {
        Some(len) => &id[len..],
        None => id,
    }
}

/// Does `input` name the plugin whose full id is `full`?
///
/// True when `input` is the full id, the short id, or a scoped short id
/// whose unscoped part equals the short id.
pub fn matches_plugin_id(input: &str, full: &str) -> bool {
    let short = to_short_plugin_id(full);
    let unscoped = split_scope(input).map_or(input, |(_, rest)| rest);
    full == input || short == input || short == unscoped
}

/// Expand a short or scoped-short id into a full id.
///
/// `official` lists the short names of the builtin official plugins.
pub fn resolve_plugin_id(id: &str, official: &[&str]) -> String {
    if is_plugin(id) || id == SERVICE_PLUGIN_ID {
        return id.to_owned();
    }
    if official.contains(&id) {
        return format!("{OFFICIAL_SCOPE}{PLUGIN_PREFIX}{id}");
    }
    if let Some((scope, short)) = split_scope(id) {
        return if scope == OFFICIAL_SCOPE {
            format!("{scope}{PLUGIN_PREFIX}{short}")
        } else {
            format!("{scope}{COMMUNITY_PREFIX}{short}")
        };
    }
    format!("{COMMUNITY_PREFIX}{id}")
}

/// Documentation link for a plugin: its homepage, else its npm page.
pub fn plugin_link(id: &str, homepage: Option<&str>) -> String {
    match homepage {
        Some(url) => url.to_owned(),
        None => format!("https://www.npmjs.com/package/{}", id.replacen('/', "%2F", 1)),
    }
}
