//! `@kiln/cli-plugin-eslint`: lint config, `lint` script and lint-on-commit.

use async_trait::async_trait;
use kiln_core::application::{Plugin, PluginApi, PluginError};
use serde::Deserialize;
use serde_json::{Map, Value, json};

pub(super) const ID: &str = "@kiln/cli-plugin-eslint";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ConfigStyle {
    #[default]
    Base,
    Prettier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum LintOn {
    Save,
    Commit,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EslintOptions {
    config: ConfigStyle,
    lint_on: Vec<LintOn>,
}

impl Default for EslintOptions {
    fn default() -> Self {
        Self {
            config: ConfigStyle::Base,
            lint_on: vec![LintOn::Save],
        }
    }
}

pub struct EslintPlugin;

#[async_trait]
impl Plugin for EslintPlugin {
    async fn apply(
        &self,
        api: &mut PluginApi<'_>,
        options: &Value,
        _root_options: &Value,
    ) -> Result<(), PluginError> {
        let options: EslintOptions = serde_json::from_value(options.clone())?;
        let has_babel = api.has_plugin("babel");

        api.extend_manifest(json!({
            "scripts": { "lint": "kiln-service lint" },
            "eslintConfig": eslint_config(options.config, has_babel),
            "devDependencies": dev_dependencies(options.config, has_babel),
        }))?;

        if options.lint_on.contains(&LintOn::Commit) {
            api.extend_manifest(json!({
                "gitHooks": { "pre-commit": "lint-staged" },
                "devDependencies": { "lint-staged": "^11.1.2" },
                "lint-staged": { "*.{js,jsx}": "kiln-service lint" }
            }))?;
        }

        api.render("template", Value::Null)?;
        Ok(())
    }
}

fn eslint_config(style: ConfigStyle, has_babel: bool) -> Value {
    let mut extends = vec![json!("eslint:recommended")];
    if style == ConfigStyle::Prettier {
        extends.push(json!("plugin:prettier/recommended"));
    }

    let parser_options = if has_babel {
        json!({ "parser": "@babel/eslint-parser" })
    } else {
        json!({ "ecmaVersion": 2020, "sourceType": "module" })
    };

    json!({
        "root": true,
        "env": { "node": true, "browser": true },
        "extends": extends,
        "parserOptions": parser_options,
        "rules": {}
    })
}

fn dev_dependencies(style: ConfigStyle, has_babel: bool) -> Value {
    let mut deps = Map::new();
    deps.insert("eslint".into(), json!("^7.32.0"));
    if has_babel {
        deps.insert("@babel/eslint-parser".into(), json!("^7.12.16"));
    }
    if style == ConfigStyle::Prettier {
        deps.insert("prettier".into(), json!("^2.4.1"));
        deps.insert("eslint-plugin-prettier".into(), json!("^4.0.0"));
        deps.insert("eslint-config-prettier".into(), json!("^8.3.0"));
    }
    Value::Object(deps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_default_to_base_and_lint_on_save() {
        let options: EslintOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options.config, ConfigStyle::Base);
        assert_eq!(options.lint_on, vec![LintOn::Save]);
    }

    #[test]
    fn parser_depends_on_babel() {
        assert_eq!(
            eslint_config(ConfigStyle::Base, true)["parserOptions"],
            json!({"parser": "@babel/eslint-parser"})
        );
        assert_eq!(
            eslint_config(ConfigStyle::Base, false)["parserOptions"]["ecmaVersion"],
            2020
        );
    }

    #[test]
    fn prettier_adds_extends_and_dependencies() {
        let config = eslint_config(ConfigStyle::Prettier, false);
        assert_eq!(
            config["extends"],
            json!(["eslint:recommended", "plugin:prettier/recommended"])
        );
        let deps = dev_dependencies(ConfigStyle::Prettier, false);
        assert!(deps.get("prettier").is_some());
        assert!(deps.get("@babel/eslint-parser").is_none());
    }

    #[test]
    fn unknown_option_values_are_rejected() {
        let result: Result<EslintOptions, _> = serde_json::from_value(json!({"config": "airbnb"}));
        assert!(result.is_err());
    }
}
