//! JSON Schema validation for raw catalog documents.
//!
//! Documents are checked against `schema/version_catalog.schema.json` before
//! they are converted into typed declarations, so misspelled sections or
//! malformed notations fail with a schema report rather than a serde error.
//! `ALIASCAT_SCHEMA` points the loader at a replacement schema file.

use crate::error::{CatalogError, Result};
use jsonschema::JSONSchema;
use serde_json::Value;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

const BUNDLED_SCHEMA: &str = include_str!("../schema/version_catalog.schema.json");
const ENV_SCHEMA_OVERRIDE: &str = "ALIASCAT_SCHEMA";

fn bundled_schema() -> Result<&'static Value> {
    static SCHEMA: OnceLock<std::result::Result<Value, String>> = OnceLock::new();
    let parsed =
        SCHEMA.get_or_init(|| serde_json::from_str(BUNDLED_SCHEMA).map_err(|err| err.to_string()));
    match parsed {
        Ok(schema) => Ok(schema),
        Err(message) => Err(CatalogError::Parse {
            origin: "bundled catalog schema".to_string(),
            message: message.clone(),
        }),
    }
}

/// Read a schema file from disk.
pub(crate) fn load_json_schema(path: &Path) -> Result<Value> {
    let file = File::open(path).map_err(|err| CatalogError::io(path, err))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|err| CatalogError::Parse {
        origin: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Replacement schema named by `ALIASCAT_SCHEMA`, if any.
///
/// Unit tests always use the bundled schema so the runner's environment
/// cannot change their outcome.
fn schema_override() -> Option<PathBuf> {
    if cfg!(test) {
        return None;
    }
    env::var_os(ENV_SCHEMA_OVERRIDE)
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}

/// Validate a raw catalog value against the active schema.
pub(crate) fn validate_catalog_value(value: &Value, origin: &str) -> Result<()> {
    match schema_override() {
        Some(path) => {
            debug!("validating {origin} against schema override {}", path.display());
            let schema = load_json_schema(&path)?;
            validate_against(&schema, value, origin)
        }
        None => validate_against(bundled_schema()?, value, origin),
    }
}

fn validate_against(schema: &Value, value: &Value, origin: &str) -> Result<()> {
    let compiled = JSONSchema::compile(schema).map_err(|err| CatalogError::Schema {
        origin: origin.to_string(),
        details: format!("schema does not compile: {err}"),
    })?;

    if let Err(errors) = compiled.validate(value) {
        let details = errors
            .map(|err| format!("{}: {err}", err.instance_path))
            .collect::<Vec<_>>()
            .join("\n");
        return Err(CatalogError::Schema {
            origin: origin.to_string(),
            details,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_schema_parses_and_compiles() {
        let parsed: Value = serde_json::from_str(BUNDLED_SCHEMA).unwrap();
        assert!(parsed.is_object());
        assert!(JSONSchema::compile(&parsed).is_ok());
    }

    #[test]
    fn accepts_every_declaration_form() {
        let value = json!({
            "versions": {"groovy": "4.0.9", "jts": {"strictly": "[1.18, 2.0[", "prefer": "1.19.0"}},
            "libraries": {
                "gson": "com.google.code.gson:gson:2.10",
                "guava": "com.google.guava:guava",
                "groovy-core": {"module": "org.apache.groovy:groovy", "version": {"ref": "groovy"}},
                "jts": {"group": "org.locationtech.jts", "name": "jts-core", "version": {"ref": "jts"}}
            },
            "bundles": {"groovy": ["groovy-core"]},
            "plugins": {
                "javafx": {"id": "org.openjfx.javafxplugin", "version": "0.0.13"},
                "jpackage": "org.beryx.runtime:1.12.7"
            }
        });
        validate_against(bundled_schema().unwrap(), &value, "inline").unwrap();
    }

    #[test]
    fn reports_instance_path_of_bad_declaration() {
        let value = json!({"libraries": {"gson": {"module": "no-colon"}}});
        let err = validate_against(bundled_schema().unwrap(), &value, "inline").unwrap_err();
        match err {
            CatalogError::Schema { origin, details } => {
                assert_eq!(origin, "inline");
                assert!(details.contains("/libraries/gson"), "{details}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn replacement_schema_is_read_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("strict.schema.json");
        std::fs::write(
            &path,
            r#"{"type": "object", "properties": {"libraries": {"maxProperties": 1}}}"#,
        )
        .unwrap();
        let strict = load_json_schema(&path).unwrap();

        let value = json!({"libraries": {
            "gson": "com.google.code.gson:gson:2.10",
            "guava": "com.google.guava:guava:31.1-jre"
        }});
        validate_against(bundled_schema().unwrap(), &value, "inline").unwrap();
        match validate_against(&strict, &value, "inline").unwrap_err() {
            CatalogError::Schema { details, .. } => {
                assert!(details.contains("/libraries"), "{details}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn missing_replacement_schema_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("absent.schema.json");
        match load_json_schema(&missing).unwrap_err() {
            CatalogError::Io { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
