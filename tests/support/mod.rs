#![allow(dead_code)]

use aliascat::{Catalog, CatalogKey};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::Once;
use std::{env, fs};
use tempfile::TempDir;

/// Variables the library reads at load time.
const CATALOG_ENV_VARS: [&str; 2] = ["ALIASCAT_CATALOG", "ALIASCAT_SCHEMA"];

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// The bundled `catalogs/libs.versions.toml` fixture.
pub fn fixture_catalog_path() -> PathBuf {
    repo_root().join("catalogs").join("libs.versions.toml")
}

/// Clear the catalog overrides from this test process so in-process loads
/// see the bundled schema regardless of the runner's environment.
pub fn isolate_env() {
    static CLEARED: Once = Once::new();
    CLEARED.call_once(|| {
        for var in CATALOG_ENV_VARS {
            unsafe {
                env::remove_var(var);
            }
        }
    });
}

pub fn fixture_catalog() -> Catalog {
    isolate_env();
    Catalog::load(&fixture_catalog_path()).expect("fixture catalog must load")
}

pub fn toml_catalog(text: &str) -> Result<Catalog> {
    isolate_env();
    Ok(Catalog::from_toml_str(CatalogKey("libs".into()), text)?)
}

/// Command for the `aliascat` binary with discovery pinned to `catalog`.
pub fn aliascat(catalog: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_aliascat"));
    cmd.arg("--catalog").arg(catalog);
    for var in CATALOG_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("ALIASCAT_LOG");
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Run a command that is expected to fail and return its stderr.
pub fn run_failing(mut cmd: Command) -> Result<String> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        bail!(
            "command {:?} unexpectedly succeeded\nstdout: {}",
            cmd,
            String::from_utf8_lossy(&output.stdout)
        );
    }
    Ok(String::from_utf8_lossy(&output.stderr).into_owned())
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Write `text` to `relative` inside a fresh temp directory.
pub fn write_catalog(relative: &str, text: &str) -> Result<(TempDir, PathBuf)> {
    isolate_env();
    let dir = TempDir::new().context("failed to allocate temp dir")?;
    let path = dir.path().join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok((dir, path))
}
