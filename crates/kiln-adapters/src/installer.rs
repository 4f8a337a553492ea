//! npm-backed [`PackageInstaller`].

use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use kiln_core::{
    application::{ApplicationError, ports::PackageInstaller},
    error::KilnResult,
};
use tokio::process::Command;
use tracing::{debug, info, instrument};

const MIN_SUPPORTED_NPM: (u64, u64, u64) = (6, 9, 0);

/// Installs dependencies by running `npm install` in the project directory.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    bin: String,
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self { bin: "npm".into() }
    }
}

impl NpmInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable, e.g. a wrapper script or an absolute path.
    pub fn with_command(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn command(&self) -> &str {
        &self.bin
    }

    async fn version(&self) -> KilnResult<(u64, u64, u64)> {
        let output = Command::new(&self.bin)
            .arg("--version")
            .output()
            .await
            .map_err(|e| install_failed(format!("failed to run `{} --version`: {e}", self.bin)))?;

        let raw = String::from_utf8_lossy(&output.stdout);
        parse_version(&raw)
            .ok_or_else(|| install_failed(format!("unrecognised npm version '{}'", raw.trim())))
    }
}

#[async_trait]
impl PackageInstaller for NpmInstaller {
    #[instrument(skip(self), fields(bin = %self.bin, dir = %dir.display()))]
    async fn install(&self, dir: &Path) -> KilnResult<()> {
        let version = self.version().await?;
        let args = install_args(version)?;
        info!(args = ?args, "installing dependencies");

        let status = Command::new(&self.bin)
            .args(&args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|e| install_failed(format!("failed to run {}: {e}", self.bin)))?;

        if !status.success() {
            return Err(install_failed(format!("{} install exited with {status}", self.bin)));
        }

        debug!("dependencies installed");
        Ok(())
    }
}

/// Arguments for `npm install` given the npm version.
fn install_args(version: (u64, u64, u64)) -> KilnResult<Vec<&'static str>> {
    if version < MIN_SUPPORTED_NPM {
        let (major, minor, patch) = MIN_SUPPORTED_NPM;
        return Err(install_failed(format!(
            "npm {}.{}.{} is too old, {major}.{minor}.{patch} or newer is required",
            version.0, version.1, version.2
        )));
    }

    let mut args = vec!["install", "--loglevel", "error"];
    // npm 7 enforces peer dependencies strictly.
    if version.0 >= 7 {
        args.push("--legacy-peer-deps");
    }
    Ok(args)
}

/// `8.19.2`, `v8.19.2` or `10.0.0-pre.1` → `(major, minor, patch)`.
fn parse_version(raw: &str) -> Option<(u64, u64, u64)> {
    let raw = raw.trim().trim_start_matches('v');
    let core = raw.split(['-', '+']).next()?;
    let mut parts = core.split('.').map(|p| p.parse::<u64>());
    let major = parts.next()?.ok()?;
    let minor = parts.next().unwrap_or(Ok(0)).ok()?;
    let patch = parts.next().unwrap_or(Ok(0)).ok()?;
    Some((major, minor, patch))
}

fn install_failed(reason: String) -> kiln_core::error::KilnError {
    ApplicationError::InstallFailed { reason }.into()
}
