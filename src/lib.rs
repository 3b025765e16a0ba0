//! Typed, read-only access to dependency version catalogs.
//!
//! A catalog maps short aliases to module coordinates, version strings,
//! ordered bundles and plugin ids. `Catalog` is built once from a
//! `libs.versions.toml` (or JSON) document, validated in a single pass, and
//! then shared freely across threads. Aliases also form a namespace tree
//! (`cuda.redist` lives under `cuda`) that `NamespaceView` walks.
//!
//! The helpers at the crate root cover catalog discovery for the `aliascat`
//! binary: honor `ALIASCAT_CATALOG`, otherwise climb from the working directory
//! looking for the conventional `gradle/libs.versions.toml`.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod catalog;
pub mod codegen;
pub mod error;
pub mod logging;
mod schema_loader;

pub use catalog::{
    Alias, Catalog, CatalogDocument, CatalogEntry, CatalogKey, CatalogRepository, EntryKind,
    ModuleCoordinate, NamespacePath, NamespaceView, PluginRef, RichVersion, VersionConstraint,
    VersionRef, load_catalog_from_path,
};
pub use error::CatalogError;

/// Environment variable naming an explicit catalog file.
pub const ENV_CATALOG: &str = "ALIASCAT_CATALOG";

/// Catalog locations probed in each directory while climbing, in order.
const CATALOG_CANDIDATES: [&str; 2] = ["gradle/libs.versions.toml", "libs.versions.toml"];

/// Verifies that an explicit `ALIASCAT_CATALOG` hint points at a file.
fn catalog_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.is_file() {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        for candidate in CATALOG_CANDIDATES {
            let path = dir.join(candidate);
            if path.is_file() {
                return Some(path);
            }
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the catalog file for `start`, honoring `ALIASCAT_CATALOG`.
pub fn find_catalog_path_from(start: &Path) -> Result<PathBuf> {
    let hint = env::var(ENV_CATALOG).ok();
    discover_catalog(hint.as_deref(), start)
}

/// Locate the catalog file for `start` with an explicit hint.
///
/// Search order: `hint` when it names an existing file, then each directory
/// from `start` up to the filesystem root.
pub fn discover_catalog(hint: Option<&str>, start: &Path) -> Result<PathBuf> {
    if let Some(path) = hint.and_then(catalog_from_hint) {
        return Ok(path);
    }

    if let Some(path) = search_upwards(start) {
        return Ok(path);
    }

    bail!(
        "Unable to locate a version catalog above {}. Set {ENV_CATALOG} or pass --catalog.",
        start.display()
    );
}

/// Locate the catalog file starting from the current working directory.
pub fn find_catalog_path() -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    find_catalog_path_from(&cwd)
}

/// Load a catalog from an explicit path or by discovery.
pub fn open_catalog(path: Option<&Path>, key: Option<&str>) -> Result<Catalog> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => find_catalog_path()?,
    };
    let key = match key {
        Some(key) => CatalogKey(key.to_string()),
        None => CatalogKey::from_path(&path),
    };
    Ok(Catalog::load_with_key(&path, key)?)
}
