//! Deserializable representation of a version catalog document.
//!
//! The types mirror the `libs.versions.toml` layout (and its JSON equivalent)
//! so tests and tooling can reason about declarations without ad-hoc TOML
//! handling. Use `Catalog` for validation and alias lookup; use these structs
//! when the raw declarations are required (or to re-serialize a catalog).

use crate::catalog::version::VersionConstraint;
use crate::error::{CatalogError, Result};
use crate::schema_loader;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Catalog format versions this crate understands (`[metadata] format.version`).
pub const SUPPORTED_FORMAT_VERSIONS: [&str; 2] = ["1.0", "1.1"];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// Full catalog document as stored on disk.
pub struct CatalogDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CatalogMetadata>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub versions: BTreeMap<String, VersionConstraint>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub libraries: BTreeMap<String, LibraryDeclaration>,
    /// Bundle members keep declaration order.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub bundles: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub plugins: BTreeMap<String, PluginDeclaration>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatInfo>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// One `[libraries]` value: `"group:artifact[:version]"`, `{ module = … }` or
/// `{ group = …, name = … }`.
pub enum LibraryDeclaration {
    Notation(String),
    Module(ModuleDeclaration),
    Split(SplitDeclaration),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDeclaration {
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitDeclaration {
    pub group: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionDeclaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// A version written inline or as `version.ref = "alias"`.
pub enum VersionDeclaration {
    Reference(VersionReference),
    Constraint(VersionConstraint),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionReference {
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// One `[plugins]` value: `"plugin.id[:version]"` or `{ id = …, version = … }`.
pub enum PluginDeclaration {
    Notation(String),
    Spec(PluginSpec),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginSpec {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionDeclaration>,
}

/// On-disk encoding of a catalog document.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from the file extension; anything but `.json` is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

/// Parse document text into a generic JSON value (TOML is converted).
pub fn parse_document_value(text: &str, format: DocumentFormat, origin: &str) -> Result<Value> {
    let parsed = match format {
        DocumentFormat::Toml => toml::from_str::<Value>(text).map_err(|err| err.to_string()),
        DocumentFormat::Json => serde_json::from_str::<Value>(text).map_err(|err| err.to_string()),
    };
    parsed.map_err(|message| CatalogError::Parse {
        origin: origin.to_string(),
        message,
    })
}

/// Schema-check a raw document value and convert it into typed declarations.
pub fn document_from_value(value: Value, origin: &str) -> Result<CatalogDocument> {
    schema_loader::validate_catalog_value(&value, origin)?;
    let document: CatalogDocument =
        serde_json::from_value(value).map_err(|err| CatalogError::Parse {
            origin: origin.to_string(),
            message: err.to_string(),
        })?;
    validate_format_version(&document, origin)?;
    Ok(document)
}

fn validate_format_version(document: &CatalogDocument, origin: &str) -> Result<()> {
    let declared = document
        .metadata
        .as_ref()
        .and_then(|meta| meta.format.as_ref())
        .and_then(|format| format.version.as_deref());
    match declared {
        Some(version) if !SUPPORTED_FORMAT_VERSIONS.contains(&version) => {
            Err(CatalogError::Parse {
                origin: origin.to_string(),
                message: format!(
                    "format version '{version}' not in supported set {SUPPORTED_FORMAT_VERSIONS:?}"
                ),
            })
        }
        _ => Ok(()),
    }
}

/// Read, parse and schema-check a catalog document from disk.
///
/// No alias-level validation happens here; `Catalog` owns that.
pub fn load_catalog_from_path(path: &Path) -> Result<CatalogDocument> {
    let text = fs::read_to_string(path).map_err(|err| CatalogError::io(path, err))?;
    let origin = path.display().to_string();
    let value = parse_document_value(&text, DocumentFormat::from_path(path), &origin)?;
    document_from_value(value, &origin)
}
