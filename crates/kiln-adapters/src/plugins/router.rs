//! `@kiln/cli-plugin-router`: router dependency, inline-rendered views and
//! wiring of the router into the entry file.

use async_trait::async_trait;
use kiln_core::{
    application::{Plugin, PluginApi, PluginError, RenderSource},
    domain::FileTree,
};
use serde_json::{Value, json};

pub(super) const ID: &str = "@kiln/cli-plugin-router";

const ENTRY_FILE: &str = "src/main.js";
const ROUTER_IMPORT: &str = "import router from './router'";

const ROUTER_INDEX: &str = "\
import { createRouter, {{#if options.historyMode}}createWebHistory{{else}}createWebHashHistory{{/if}} } from '@kiln/router'
import Home from '../views/Home'

const routes = [
  { path: '/', name: 'home', component: Home },
  { path: '/about', name: 'about', component: () => import('../views/About') }
]

export default createRouter({
  history: {{#if options.historyMode}}createWebHistory(){{else}}createWebHashHistory(){{/if}},
  routes
})
";

const HOME_VIEW: &str = "\
export default {
  name: 'Home',
  render: () => '<h1>{{rootOptions.projectName}}</h1>'
}
";

const ABOUT_VIEW: &str = "\
export default {
  name: 'About',
  render: () => '<p>This is the about page</p>'
}
";

pub struct RouterPlugin;

#[async_trait]
impl Plugin for RouterPlugin {
    async fn apply(
        &self,
        api: &mut PluginApi<'_>,
        _options: &Value,
        _root_options: &Value,
    ) -> Result<(), PluginError> {
        api.extend_manifest(json!({
            "dependencies": { "@kiln/router": "^4.0.3" }
        }))?;

        api.render(
            RenderSource::inline([
                ("src/router/index.js", ROUTER_INDEX),
                ("src/views/Home.js", HOME_VIEW),
                ("src/views/About.js", ABOUT_VIEW),
            ]),
            Value::Null,
        )?;

        api.post_process_files(wire_router);
        Ok(())
    }
}

/// Import the router in the entry file and install it on the app.
fn wire_router(files: &mut FileTree) -> Result<(), PluginError> {
    let entry = files
        .get(ENTRY_FILE)
        .and_then(|content| content.as_text())
        .ok_or_else(|| format!("entry file {ENTRY_FILE} not found"))?;

    if entry.contains(ROUTER_IMPORT) {
        return Ok(());
    }

    let updated = inject_import(entry, ROUTER_IMPORT).replacen(
        "createApp(App)",
        "createApp(App).use(router)",
        1,
    );
    files.insert(ENTRY_FILE, updated)?;
    Ok(())
}

/// Insert `import` after the last import statement, or at the top.
fn inject_import(source: &str, import: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let position = lines
        .iter()
        .rposition(|line| line.trim_start().starts_with("import "))
        .map_or(0, |i| i + 1);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..position]);
    out.push(import);
    out.extend_from_slice(&lines[position..]);

    let mut text = out.join("\n");
    if source.ends_with('\n') {
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_goes_after_existing_imports() {
        let source = "import { createApp } from '@kiln/runtime'\nimport App from './App'\n\ncreateApp(App).mount('#app')\n";
        let out = inject_import(source, ROUTER_IMPORT);
        assert_eq!(
            out,
            "import { createApp } from '@kiln/runtime'\nimport App from './App'\nimport router from './router'\n\ncreateApp(App).mount('#app')\n"
        );
    }

    #[test]
    fn import_goes_first_without_imports() {
        assert_eq!(inject_import("run()", "import x from 'x'"), "import x from 'x'\nrun()");
    }

    #[test]
    fn entry_file_is_wired_once() {
        let mut files = FileTree::new()
            .with_file(ENTRY_FILE, "import App from './App'\ncreateApp(App).mount('#app')\n")
            .unwrap();

        wire_router(&mut files).unwrap();
        wire_router(&mut files).unwrap();

        let entry = files.get(ENTRY_FILE).unwrap().as_text().unwrap();
        assert_eq!(entry.matches(ROUTER_IMPORT).count(), 1);
        assert!(entry.contains("createApp(App).use(router).mount('#app')"));
    }

    #[test]
    fn missing_entry_file_is_an_error() {
        let mut files = FileTree::new();
        assert!(wire_router(&mut files).is_err());
    }
}
