use crate::catalog::identity::{Alias, EntryKind};
use crate::catalog::version::{VersionConstraint, VersionRef};
use serde::Serialize;
use std::fmt;

/// Resolved `group:artifact[:version]` for one library alias.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ModuleCoordinate {
    pub group: String,
    pub artifact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionConstraint>,
    /// Version alias the version was declared through, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_ref: Option<Alias>,
}

impl ModuleCoordinate {
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: None,
            version_ref: None,
        }
    }

    /// `group:artifact` without a version.
    pub fn module(&self) -> String {
        format!("{}:{}", self.group, self.artifact)
    }

    pub fn flat_version(&self) -> Option<VersionRef> {
        self.version.as_ref().map(VersionConstraint::flatten)
    }
}

impl fmt::Display for ModuleCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

/// Plugin id plus optional version.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PluginRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionConstraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_ref: Option<Alias>,
}

impl fmt::Display for PluginRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}

/// Borrowed view of any catalog entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CatalogEntry<'a> {
    Module(&'a ModuleCoordinate),
    Version(&'a VersionConstraint),
    Bundle(&'a [Alias]),
    Plugin(&'a PluginRef),
}

impl CatalogEntry<'_> {
    pub fn kind(&self) -> EntryKind {
        match self {
            CatalogEntry::Module(_) => EntryKind::Library,
            CatalogEntry::Version(_) => EntryKind::Version,
            CatalogEntry::Bundle(_) => EntryKind::Bundle,
            CatalogEntry::Plugin(_) => EntryKind::Plugin,
        }
    }
}

impl fmt::Display for CatalogEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogEntry::Module(module) => module.fmt(f),
            CatalogEntry::Version(version) => version.fmt(f),
            CatalogEntry::Bundle(members) => {
                let names: Vec<&str> = members.iter().map(Alias::as_str).collect();
                write!(f, "[{}]", names.join(", "))
            }
            CatalogEntry::Plugin(plugin) => plugin.fmt(f),
        }
    }
}
