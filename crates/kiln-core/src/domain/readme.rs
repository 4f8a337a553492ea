//! README text for a freshly generated project.

use crate::domain::entities::manifest::Manifest;

const SCRIPT_DESCRIPTIONS: &[(&str, &str)] = &[
    ("build", "Compiles and minifies for production"),
    ("serve", "Compiles and hot-reloads for development"),
    ("lint", "Lints and fixes files"),
    ("test:e2e", "Run your end-to-end tests"),
    ("test:unit", "Run your unit tests"),
];

fn describe(script: &str) -> Option<&'static str> {
    SCRIPT_DESCRIPTIONS
        .iter()
        .find(|(name, _)| *name == script)
        .map(|(_, description)| *description)
}

/// One section per script with a known description, in manifest order.
fn script_sections(manifest: &Manifest) -> String {
    let Some(scripts) = manifest.get("scripts").and_then(|s| s.as_object()) else {
        return String::new();
    };

    scripts
        .keys()
        .filter_map(|key| {
            describe(key).map(|description| {
                format!("\n### {description}\n```\nnpm run {key}\n```\n")
            })
        })
        .collect()
}

pub fn generate_readme(manifest: &Manifest) -> String {
    let name = manifest.name().unwrap_or("project");
    [
        format!("# {name}\n"),
        "## Project setup".to_owned(),
        "```".to_owned(),
        "npm install".to_owned(),
        "```".to_owned(),
        script_sections(manifest),
        "### Customize configuration".to_owned(),
        "See `kiln.config.js` and the kiln configuration reference.".to_owned(),
        String::new(),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn readme_lists_known_scripts_only() {
        let manifest = Manifest::from_value(json!({
            "name": "my-app",
            "scripts": {"serve": "kiln serve", "custom": "x", "lint": "kiln lint"}
        }))
        .unwrap();
        let readme = generate_readme(&manifest);
        assert!(readme.starts_with("# my-app\n"));
        assert!(readme.contains("### Compiles and hot-reloads for development\n```\nnpm run serve\n```"));
        assert!(readme.contains("npm run lint"));
        assert!(!readme.contains("npm run custom"));
        assert!(readme.ends_with('\n'));
    }

    #[test]
    fn readme_without_scripts() {
        let manifest = Manifest::from_value(json!({"name": "bare"})).unwrap();
        let readme = generate_readme(&manifest);
        assert!(readme.contains("npm install"));
        assert!(!readme.contains("npm run"));
    }
}
