use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::path::Path;

/// Accessor name of a catalog (e.g., `libs`, `testLibs`).
///
/// Derived from the catalog file name so several catalogs can be registered
/// side by side in a `CatalogRepository`.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogKey(pub String);

impl CatalogKey {
    /// Key for a catalog file: `libs.versions.toml` becomes `libs`.
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("libs");
        let stem = file_name
            .strip_suffix(".versions.toml")
            .or_else(|| file_name.strip_suffix(".versions.json"))
            .or_else(|| file_name.strip_suffix(".toml"))
            .or_else(|| file_name.strip_suffix(".json"))
            .unwrap_or(file_name);
        CatalogKey(stem.to_string())
    }
}

impl fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalized alias: separators `-`, `_` and `.` all collapse to `.`.
///
/// `groovy-core`, `groovy_core` and `groovy.core` name the same entry, which is
/// also how the namespace tree is derived.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Alias(String);

impl Alias {
    /// Normalize and validate a raw alias as written in a catalog.
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("alias must not be empty".to_string());
        }
        let segments = split_segments(raw);
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err("alias must not contain empty segments".to_string());
        }
        if !raw.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err("alias must start with a lowercase ASCII letter".to_string());
        }
        if let Some(bad) = segments
            .iter()
            .flat_map(|segment| segment.chars())
            .find(|c| !c.is_ascii_alphanumeric())
        {
            return Err(format!("unexpected character '{bad}'"));
        }
        Ok(Alias(segments.join(".")))
    }

    /// Normalize without validating; used for lookups so any spelling of a
    /// declared alias resolves and anything else simply misses.
    pub fn normalize(raw: &str) -> String {
        split_segments(raw).join(".")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Namespace this alias lives in (`cuda.redist` lives in `cuda`).
    pub fn namespace(&self) -> NamespacePath {
        let mut segments: Vec<String> = self.segments().map(str::to_string).collect();
        segments.pop();
        NamespacePath(segments)
    }

    /// Last segment of the alias.
    pub fn leaf(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Alias {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for Alias {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Alias {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Alias::parse(&value).map_err(D::Error::custom)
    }
}

/// Dotted path of a namespace node; the empty path is the catalog root.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NamespacePath(Vec<String>);

impl NamespacePath {
    pub fn root() -> Self {
        NamespacePath(Vec::new())
    }

    /// Parse a dotted (or dashed) path; empty input is the root.
    ///
    /// Empty segments (`cuda..`, `.cuda`) are kept as they are, so navigation
    /// reports them as unknown namespaces the same way an alias with an empty
    /// segment is rejected.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return NamespacePath::root();
        }
        NamespacePath(split_segments(raw).into_iter().map(str::to_string).collect())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn child(&self, segment: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.to_string());
        NamespacePath(segments)
    }

    /// Full alias string for `name` under this namespace.
    pub fn qualify(&self, name: &str) -> String {
        let name = Alias::normalize(name);
        if self.is_root() {
            name
        } else if name.is_empty() {
            self.to_string()
        } else {
            format!("{self}.{name}")
        }
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Which of the four disjoint catalog tables an entry belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EntryKind {
    Library,
    Version,
    Bundle,
    Plugin,
}

impl EntryKind {
    pub const ALL: [EntryKind; 4] = [
        EntryKind::Library,
        EntryKind::Version,
        EntryKind::Bundle,
        EntryKind::Plugin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Library => "library",
            EntryKind::Version => "version",
            EntryKind::Bundle => "bundle",
            EntryKind::Plugin => "plugin",
        }
    }

    /// Section name used by the catalog document.
    pub fn section(&self) -> &'static str {
        match self {
            EntryKind::Library => "libraries",
            EntryKind::Version => "versions",
            EntryKind::Bundle => "bundles",
            EntryKind::Plugin => "plugins",
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "library" | "module" => Some(EntryKind::Library),
            "version" => Some(EntryKind::Version),
            "bundle" => Some(EntryKind::Bundle),
            "plugin" => Some(EntryKind::Plugin),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntryKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntryKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        EntryKind::from_str(&value)
            .ok_or_else(|| D::Error::custom(format!("unknown entry kind '{value}'")))
    }
}

fn split_segments(raw: &str) -> Vec<&str> {
    raw.split(['-', '_', '.']).collect()
}
