//! Error taxonomy for catalog loading and alias resolution.
//!
//! Resolution errors carry the offending alias and the namespace it was
//! requested under. Load errors (dangling bundle members, unknown version
//! references, duplicates) are raised once by the validation pass and keep a
//! catalog from ever being constructed.

use crate::catalog::identity::{Alias, EntryKind, NamespacePath};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    #[error("unknown {kind} alias '{alias}'{}", in_namespace(.namespace))]
    UnknownAlias {
        kind: EntryKind,
        alias: String,
        namespace: NamespacePath,
    },

    #[error("unknown namespace '{segment}'{}", in_namespace(.path))]
    UnknownNamespace {
        path: NamespacePath,
        segment: String,
    },

    #[error("bundle '{bundle}' references unknown library alias '{member}'")]
    DanglingBundleReference { bundle: Alias, member: String },

    #[error("version alias '{alias}' is a rich constraint ({constraint}) with no single-string form")]
    UnrepresentableVersion { alias: Alias, constraint: String },

    #[error("{owner} references unknown version alias '{reference}'")]
    UnknownVersionReference { owner: String, reference: String },

    #[error("duplicate {kind} alias '{alias}' (declared as '{first}' and '{second}')")]
    DuplicateAlias {
        kind: EntryKind,
        alias: Alias,
        first: String,
        second: String,
    },

    #[error("invalid {kind} alias '{raw}': {reason}")]
    InvalidAlias {
        kind: EntryKind,
        raw: String,
        reason: String,
    },

    #[error("library alias '{alias}' starts with reserved group name '{reserved}'")]
    ReservedAlias { alias: Alias, reserved: String },

    #[error("invalid coordinate for {owner}: '{notation}'")]
    InvalidCoordinate { owner: String, notation: String },

    #[error("catalog {origin} failed schema validation:\n{details}")]
    Schema { origin: String, details: String },

    #[error("failed to parse {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl CatalogError {
    pub(crate) fn unknown_alias(kind: EntryKind, alias: &str, namespace: &NamespacePath) -> Self {
        CatalogError::UnknownAlias {
            kind,
            alias: alias.to_string(),
            namespace: namespace.clone(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source: Arc::new(err),
        }
    }

    /// The alias this error is about, when there is one.
    pub fn alias(&self) -> Option<&str> {
        match self {
            CatalogError::UnknownAlias { alias, .. } => Some(alias),
            CatalogError::DanglingBundleReference { bundle, .. } => Some(bundle.as_str()),
            CatalogError::UnrepresentableVersion { alias, .. } => Some(alias.as_str()),
            CatalogError::DuplicateAlias { alias, .. } => Some(alias.as_str()),
            CatalogError::InvalidAlias { raw, .. } => Some(raw),
            CatalogError::ReservedAlias { alias, .. } => Some(alias.as_str()),
            _ => None,
        }
    }
}

fn in_namespace(path: &NamespacePath) -> String {
    if path.is_root() {
        String::new()
    } else {
        format!(" in namespace '{path}'")
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
