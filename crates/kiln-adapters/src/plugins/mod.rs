//! Builtin plugins and the static registry that serves them.
//!
//! Plugins are registered by id at startup; there is no dynamic loading.
//! Each builtin declares its own template root under this crate's
//! `templates/` directory.

mod babel;
mod eslint;
mod router;
mod service;

use std::sync::Arc;

use kiln_core::{
    application::{PluginDescriptor, ports::PluginCatalog},
    domain::{
        DomainError,
        entities::plugin::{PluginId, matches_plugin_id, resolve_plugin_id},
    },
};
use tracing::debug;

pub use babel::BabelPlugin;
pub use eslint::EslintPlugin;
pub use router::RouterPlugin;
pub use service::ServicePlugin;

/// Short names of the official builtin plugins.
pub const OFFICIAL_PLUGINS: &[&str] = &["babel", "eslint", "router"];

/// Template root for a builtin plugin.
macro_rules! template_root {
    ($name:literal) => {
        concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name)
    };
}

/// A registry entry: the descriptor plus a one-line description for listings.
#[derive(Debug, Clone)]
pub struct RegisteredPlugin {
    pub descriptor: PluginDescriptor,
    pub description: String,
}

/// Statically populated plugin table.
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    entries: Vec<RegisteredPlugin>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every builtin plugin.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (descriptor, description) in builtin_plugins() {
            // Builtin ids are distinct constants.
            if let Err(e) = registry.register(descriptor, description) {
                debug!(error = %e, "builtin plugin skipped");
            }
        }
        registry
    }

    /// Add a plugin. Ids must be valid and not registered yet.
    pub fn register(
        &mut self,
        descriptor: PluginDescriptor,
        description: impl Into<String>,
    ) -> Result<(), DomainError> {
        PluginId::new(descriptor.id.as_str())?;
        if self.entries.iter().any(|e| e.descriptor.id == descriptor.id) {
            return Err(DomainError::DuplicatePlugin {
                id: descriptor.id.clone(),
            });
        }
        debug!(plugin = %descriptor.id, "plugin registered");
        self.entries.push(RegisteredPlugin {
            descriptor,
            description: description.into(),
        });
        Ok(())
    }

    /// Look up by full id, short id, or scoped short id.
    pub fn get(&self, id: &str) -> Option<&RegisteredPlugin> {
        let full = resolve_plugin_id(id, OFFICIAL_PLUGINS);
        self.entries
            .iter()
            .find(|e| e.descriptor.id == full)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| matches_plugin_id(id, &e.descriptor.id))
            })
    }

    pub fn list(&self) -> &[RegisteredPlugin] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PluginCatalog for PluginRegistry {
    fn lookup(&self, id: &str) -> Option<PluginDescriptor> {
        self.get(id).map(|e| e.descriptor.clone())
    }

    fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.descriptor.id.clone()).collect()
    }
}

fn builtin_plugins() -> Vec<(PluginDescriptor, &'static str)> {
    vec![
        (
            PluginDescriptor::new(service::ID, Arc::new(ServicePlugin))
                .with_base_dir(template_root!("service")),
            "Project skeleton, serve/build scripts and the build tool config",
        ),
        (
            PluginDescriptor::new(babel::ID, Arc::new(BabelPlugin)),
            "Babel transpilation with the kiln preset",
        ),
        (
            PluginDescriptor::new(eslint::ID, Arc::new(EslintPlugin))
                .with_base_dir(template_root!("eslint")),
            "ESLint setup with optional prettier and lint-on-commit",
        ),
        (
            PluginDescriptor::new(router::ID, Arc::new(RouterPlugin)),
            "Client-side router with a home and an about view",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use kiln_core::domain::SERVICE_PLUGIN_ID;

    #[test]
    fn builtins_are_registered_in_order() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(
            registry.ids(),
            vec![
                SERVICE_PLUGIN_ID,
                "@kiln/cli-plugin-babel",
                "@kiln/cli-plugin-eslint",
                "@kiln/cli-plugin-router",
            ]
        );
    }

    #[test]
    fn lookup_accepts_aliases() {
        let registry = PluginRegistry::with_builtins();
        for alias in ["babel", "@kiln/babel", "@kiln/cli-plugin-babel"] {
            let found = registry.lookup(alias).unwrap();
            assert_eq!(found.id, "@kiln/cli-plugin-babel", "alias {alias}");
        }
        assert_eq!(registry.lookup(SERVICE_PLUGIN_ID).unwrap().id, SERVICE_PLUGIN_ID);
        assert!(registry.lookup("pwa").is_none());
    }

    #[test]
    fn duplicate_registration_rejected() {
        let mut registry = PluginRegistry::with_builtins();
        let again = PluginDescriptor::new("@kiln/cli-plugin-babel", Arc::new(BabelPlugin));
        assert!(matches!(
            registry.register(again, "dup"),
            Err(DomainError::DuplicatePlugin { .. })
        ));
    }

    #[test]
    fn builtin_template_roots_exist() {
        for entry in PluginRegistry::with_builtins().list() {
            if let Some(dir) = &entry.descriptor.base_dir {
                assert!(dir.is_dir(), "{} missing", dir.display());
            }
        }
    }
}
