//! Version constraints as declared in a catalog.
//!
//! A version is either a literal string or a rich constraint
//! (`strictly`/`require`/`prefer`/`reject`). Rich constraints only flatten to a
//! single string when exactly one exact version is named; everything else is
//! reported through `VersionRef::Unrepresentable` instead of an empty string.

use crate::catalog::identity::Alias;
use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionConstraint {
    Literal(String),
    Rich(RichVersion),
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RichVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strictly: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefer: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reject: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reject_all: bool,
}

/// Outcome of flattening a version alias.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VersionRef {
    Single(String),
    /// Rich constraint with no single-string form.
    Unrepresentable(RichVersion),
}

impl VersionConstraint {
    pub fn flatten(&self) -> VersionRef {
        match self {
            VersionConstraint::Literal(value) => VersionRef::Single(value.clone()),
            VersionConstraint::Rich(rich) => match rich.single() {
                Some(value) => VersionRef::Single(value.to_string()),
                None => VersionRef::Unrepresentable(rich.clone()),
            },
        }
    }
}

impl RichVersion {
    /// The one exact version this constraint names, if any.
    pub fn single(&self) -> Option<&str> {
        if self.reject_all || !self.reject.is_empty() {
            return None;
        }
        let mut named = [&self.strictly, &self.require, &self.prefer]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty());
        let first = named.next()?;
        if named.any(|other| other != first) || is_range_or_dynamic(first) {
            return None;
        }
        Some(first)
    }
}

impl VersionRef {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            VersionRef::Single(value) => Some(value),
            VersionRef::Unrepresentable(_) => None,
        }
    }

    /// Turn the unrepresentable sentinel into an error for callers that need a
    /// literal.
    pub fn require_single(&self, alias: &Alias) -> Result<&str> {
        match self {
            VersionRef::Single(value) => Ok(value),
            VersionRef::Unrepresentable(rich) => Err(CatalogError::UnrepresentableVersion {
                alias: alias.clone(),
                constraint: rich.to_string(),
            }),
        }
    }
}

fn is_range_or_dynamic(version: &str) -> bool {
    version.starts_with("latest.")
        || version
            .chars()
            .any(|c| matches!(c, '[' | ']' | '(' | ')' | ',' | '+'))
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionConstraint::Literal(value) => f.write_str(value),
            VersionConstraint::Rich(rich) => rich.fmt(f),
        }
    }
}

impl fmt::Display for RichVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(value) = &self.strictly {
            parts.push(format!("strictly {value}"));
        }
        if let Some(value) = &self.require {
            parts.push(format!("require {value}"));
        }
        if let Some(value) = &self.prefer {
            parts.push(format!("prefer {value}"));
        }
        if self.reject_all {
            parts.push("reject all".to_string());
        } else if !self.reject.is_empty() {
            parts.push(format!("reject {}", self.reject.join(" & ")));
        }
        write!(f, "{{{}}}", parts.join("; "))
    }
}
