//! Indexed, validated view of a version catalog.
//!
//! `Catalog` is built once from a document and never changes afterwards. The
//! load pass normalizes every alias, rejects duplicates and reserved names,
//! resolves `version.ref` links and checks that every bundle member names a
//! declared library, so resolution never meets a half-valid catalog.

use crate::catalog::entry::{CatalogEntry, ModuleCoordinate, PluginRef};
use crate::catalog::identity::{Alias, CatalogKey, EntryKind, NamespacePath};
use crate::catalog::model::{
    CatalogDocument, CatalogMetadata, DocumentFormat, LibraryDeclaration, ModuleDeclaration,
    PluginDeclaration, PluginSpec, VersionDeclaration, VersionReference, document_from_value,
    load_catalog_from_path, parse_document_value,
};
use crate::catalog::namespace::{NamespaceNode, NamespaceView};
use crate::catalog::version::{VersionConstraint, VersionRef};
use crate::error::{CatalogError, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// Library aliases may not start with these; they name the accessor groups.
const RESERVED_LIBRARY_PREFIXES: [&str; 3] = ["bundles", "versions", "plugins"];

#[derive(Debug, Clone, PartialEq)]
/// Catalog document plus four disjoint alias tables and the namespace tree.
pub struct Catalog {
    key: CatalogKey,
    metadata: Option<CatalogMetadata>,
    libraries: HashMap<Alias, ModuleCoordinate>,
    versions: HashMap<Alias, VersionConstraint>,
    bundles: HashMap<Alias, Vec<Alias>>,
    plugins: HashMap<Alias, PluginRef>,
    root: NamespaceNode,
}

impl Catalog {
    /// Load and validate a catalog file; the key comes from the file name.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_key(path, CatalogKey::from_path(path))
    }

    pub fn load_with_key(path: &Path, key: CatalogKey) -> Result<Self> {
        let document = load_catalog_from_path(path)?;
        debug!("loaded catalog document {}", path.display());
        Self::from_document(key, document)
    }

    pub fn from_toml_str(key: CatalogKey, text: &str) -> Result<Self> {
        Self::from_text(key, text, DocumentFormat::Toml)
    }

    pub fn from_json_str(key: CatalogKey, text: &str) -> Result<Self> {
        Self::from_text(key, text, DocumentFormat::Json)
    }

    fn from_text(key: CatalogKey, text: &str, format: DocumentFormat) -> Result<Self> {
        let origin = format!("'{key}' (inline)");
        let value = parse_document_value(text, format, &origin)?;
        let document = document_from_value(value, &origin)?;
        Self::from_document(key, document)
    }

    /// Validate typed declarations and build the lookup tables.
    pub fn from_document(key: CatalogKey, document: CatalogDocument) -> Result<Self> {
        let versions = build_versions(&document.versions)?;
        let libraries = build_libraries(&document.libraries, &versions)?;
        let bundles = build_bundles(&document.bundles, &libraries)?;
        let plugins = build_plugins(&document.plugins, &versions)?;

        let root = NamespaceNode::build(
            libraries
                .keys()
                .map(|alias| (EntryKind::Library, alias))
                .chain(versions.keys().map(|alias| (EntryKind::Version, alias)))
                .chain(bundles.keys().map(|alias| (EntryKind::Bundle, alias)))
                .chain(plugins.keys().map(|alias| (EntryKind::Plugin, alias))),
        );

        debug!(
            catalog = %key,
            libraries = libraries.len(),
            versions = versions.len(),
            bundles = bundles.len(),
            plugins = plugins.len(),
            namespaces = root.node_count() - 1,
            "catalog validated"
        );

        Ok(Self {
            key,
            metadata: document.metadata,
            libraries,
            versions,
            bundles,
            plugins,
            root,
        })
    }

    /// The accessor name of this catalog.
    pub fn key(&self) -> &CatalogKey {
        &self.key
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.as_ref()?.description.as_deref()
    }

    /// Resolve a library alias to its coordinate.
    pub fn resolve_module(&self, alias: &str) -> Result<&ModuleCoordinate> {
        self.root().resolve_module(alias)
    }

    /// Resolve a version alias; rich constraints come back as
    /// `VersionRef::Unrepresentable` rather than an empty string.
    pub fn resolve_version(&self, alias: &str) -> Result<VersionRef> {
        self.root().resolve_version(alias)
    }

    /// Resolve a bundle to its member coordinates in declaration order.
    pub fn resolve_bundle(&self, alias: &str) -> Result<Vec<&ModuleCoordinate>> {
        self.root().resolve_bundle(alias)
    }

    pub fn resolve_plugin(&self, alias: &str) -> Result<&PluginRef> {
        self.root().resolve_plugin(alias)
    }

    /// Navigate the namespace tree by dotted path.
    pub fn namespace(&self, path: &str) -> Result<NamespaceView<'_>> {
        self.root().namespace(path)
    }

    pub fn root(&self) -> NamespaceView<'_> {
        NamespaceView::new(self, &self.root)
    }

    /// Any entry by kind and alias, for generic tooling.
    pub fn entry(&self, kind: EntryKind, alias: &str) -> Result<CatalogEntry<'_>> {
        let normalized = Alias::normalize(alias);
        let found = match kind {
            EntryKind::Library => self.lookup_module(&normalized).map(CatalogEntry::Module),
            EntryKind::Version => self.lookup_version(&normalized).map(CatalogEntry::Version),
            EntryKind::Bundle => self
                .lookup_bundle(&normalized)
                .map(|(_, members)| CatalogEntry::Bundle(members.as_slice())),
            EntryKind::Plugin => self.lookup_plugin(&normalized).map(CatalogEntry::Plugin),
        };
        found.ok_or_else(|| CatalogError::unknown_alias(kind, alias, &NamespacePath::root()))
    }

    /// Aliases of one table in sorted order.
    pub fn aliases(&self, kind: EntryKind) -> Vec<&Alias> {
        let mut aliases: Vec<&Alias> = match kind {
            EntryKind::Library => self.libraries.keys().collect(),
            EntryKind::Version => self.versions.keys().collect(),
            EntryKind::Bundle => self.bundles.keys().collect(),
            EntryKind::Plugin => self.plugins.keys().collect(),
        };
        aliases.sort();
        aliases
    }

    /// Number of entries in one table.
    pub fn len(&self, kind: EntryKind) -> usize {
        match kind {
            EntryKind::Library => self.libraries.len(),
            EntryKind::Version => self.versions.len(),
            EntryKind::Bundle => self.bundles.len(),
            EntryKind::Plugin => self.plugins.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        EntryKind::ALL.iter().all(|kind| self.len(*kind) == 0)
    }

    /// Re-serialize the resolved entries as a catalog document.
    ///
    /// Aliases come back in normalized (dotted) form; building a catalog from
    /// the result yields the same tables.
    pub fn to_document(&self) -> CatalogDocument {
        let versions = self
            .versions
            .iter()
            .map(|(alias, constraint)| (alias.to_string(), constraint.clone()))
            .collect();
        let libraries = self
            .libraries
            .iter()
            .map(|(alias, module)| {
                let declaration = LibraryDeclaration::Module(ModuleDeclaration {
                    module: module.module(),
                    version: version_declaration(&module.version, &module.version_ref),
                });
                (alias.to_string(), declaration)
            })
            .collect();
        let bundles = self
            .bundles
            .iter()
            .map(|(alias, members)| {
                (
                    alias.to_string(),
                    members.iter().map(Alias::to_string).collect(),
                )
            })
            .collect();
        let plugins = self
            .plugins
            .iter()
            .map(|(alias, plugin)| {
                let declaration = PluginDeclaration::Spec(PluginSpec {
                    id: plugin.id.clone(),
                    version: version_declaration(&plugin.version, &plugin.version_ref),
                });
                (alias.to_string(), declaration)
            })
            .collect();

        CatalogDocument {
            metadata: self.metadata.clone(),
            versions,
            libraries,
            bundles,
            plugins,
        }
    }

    pub(crate) fn lookup_module(&self, alias: &str) -> Option<&ModuleCoordinate> {
        self.libraries.get(alias)
    }

    pub(crate) fn lookup_version(&self, alias: &str) -> Option<&VersionConstraint> {
        self.versions.get(alias)
    }

    pub(crate) fn lookup_bundle(&self, alias: &str) -> Option<(&Alias, &Vec<Alias>)> {
        self.bundles.get_key_value(alias)
    }

    pub(crate) fn lookup_plugin(&self, alias: &str) -> Option<&PluginRef> {
        self.plugins.get(alias)
    }
}

fn version_declaration(
    version: &Option<VersionConstraint>,
    version_ref: &Option<Alias>,
) -> Option<VersionDeclaration> {
    match (version_ref, version) {
        (Some(reference), _) => Some(VersionDeclaration::Reference(VersionReference {
            reference: reference.to_string(),
        })),
        (None, Some(constraint)) => Some(VersionDeclaration::Constraint(constraint.clone())),
        (None, None) => None,
    }
}

/// Normalize the aliases of one table, rejecting invalid names and
/// duplicates that only differ by separator.
fn normalize_table<'a, V>(
    kind: EntryKind,
    table: &'a BTreeMap<String, V>,
) -> Result<Vec<(Alias, &'a str, &'a V)>> {
    let mut seen: HashMap<Alias, &str> = HashMap::new();
    let mut normalized = Vec::with_capacity(table.len());
    for (raw, value) in table {
        let alias = Alias::parse(raw).map_err(|reason| CatalogError::InvalidAlias {
            kind,
            raw: raw.clone(),
            reason,
        })?;
        if let Some(first) = seen.insert(alias.clone(), raw.as_str()) {
            return Err(CatalogError::DuplicateAlias {
                kind,
                alias,
                first: first.to_string(),
                second: raw.clone(),
            });
        }
        normalized.push((alias, raw.as_str(), value));
    }
    Ok(normalized)
}

fn build_versions(
    table: &BTreeMap<String, VersionConstraint>,
) -> Result<HashMap<Alias, VersionConstraint>> {
    Ok(normalize_table(EntryKind::Version, table)?
        .into_iter()
        .map(|(alias, _, constraint)| (alias, constraint.clone()))
        .collect())
}

/// Resolve an optional version declaration against the versions table.
fn resolve_declared_version(
    owner: impl FnOnce() -> String,
    declaration: Option<&VersionDeclaration>,
    versions: &HashMap<Alias, VersionConstraint>,
) -> Result<(Option<VersionConstraint>, Option<Alias>)> {
    match declaration {
        None => Ok((None, None)),
        Some(VersionDeclaration::Constraint(constraint)) => Ok((Some(constraint.clone()), None)),
        Some(VersionDeclaration::Reference(VersionReference { reference })) => {
            let normalized = Alias::normalize(reference);
            match versions.get_key_value(normalized.as_str()) {
                Some((alias, constraint)) => Ok((Some(constraint.clone()), Some(alias.clone()))),
                None => Err(CatalogError::UnknownVersionReference {
                    owner: owner(),
                    reference: reference.clone(),
                }),
            }
        }
    }
}

fn build_libraries(
    table: &BTreeMap<String, LibraryDeclaration>,
    versions: &HashMap<Alias, VersionConstraint>,
) -> Result<HashMap<Alias, ModuleCoordinate>> {
    let mut libraries = HashMap::with_capacity(table.len());
    for (alias, raw, declaration) in normalize_table(EntryKind::Library, table)? {
        let reserved = alias
            .segments()
            .next()
            .filter(|first| RESERVED_LIBRARY_PREFIXES.contains(first))
            .map(str::to_string);
        if let Some(reserved) = reserved {
            return Err(CatalogError::ReservedAlias { alias, reserved });
        }

        let owner = || format!("library '{raw}'");
        let module = match declaration {
            LibraryDeclaration::Notation(notation) => {
                let parts = split_notation(notation, 2, 3)
                    .ok_or_else(|| invalid_coordinate(owner(), notation))?;
                let mut module = ModuleCoordinate::new(parts[0], parts[1]);
                module.version = parts
                    .get(2)
                    .map(|version| VersionConstraint::Literal(version.to_string()));
                module
            }
            LibraryDeclaration::Module(ModuleDeclaration { module, version }) => {
                let parts = split_notation(module, 2, 2)
                    .ok_or_else(|| invalid_coordinate(owner(), module))?;
                let (version, version_ref) =
                    resolve_declared_version(owner, version.as_ref(), versions)?;
                ModuleCoordinate {
                    group: parts[0].to_string(),
                    artifact: parts[1].to_string(),
                    version,
                    version_ref,
                }
            }
            LibraryDeclaration::Split(split) => {
                let group = split.group.trim();
                let artifact = split.name.trim();
                if group.is_empty() || artifact.is_empty() {
                    return Err(invalid_coordinate(
                        owner(),
                        &format!("{}:{}", split.group, split.name),
                    ));
                }
                let (version, version_ref) =
                    resolve_declared_version(owner, split.version.as_ref(), versions)?;
                ModuleCoordinate {
                    group: group.to_string(),
                    artifact: artifact.to_string(),
                    version,
                    version_ref,
                }
            }
        };
        libraries.insert(alias, module);
    }
    Ok(libraries)
}

fn build_bundles(
    table: &BTreeMap<String, Vec<String>>,
    libraries: &HashMap<Alias, ModuleCoordinate>,
) -> Result<HashMap<Alias, Vec<Alias>>> {
    let mut bundles = HashMap::with_capacity(table.len());
    for (alias, _, members) in normalize_table(EntryKind::Bundle, table)? {
        let mut resolved = Vec::with_capacity(members.len());
        for member in members {
            let normalized = Alias::normalize(member);
            match libraries.get_key_value(normalized.as_str()) {
                Some((member_alias, _)) => resolved.push(member_alias.clone()),
                None => {
                    return Err(CatalogError::DanglingBundleReference {
                        bundle: alias,
                        member: member.clone(),
                    });
                }
            }
        }
        bundles.insert(alias, resolved);
    }
    Ok(bundles)
}

fn build_plugins(
    table: &BTreeMap<String, PluginDeclaration>,
    versions: &HashMap<Alias, VersionConstraint>,
) -> Result<HashMap<Alias, PluginRef>> {
    let mut plugins = HashMap::with_capacity(table.len());
    for (alias, raw, declaration) in normalize_table(EntryKind::Plugin, table)? {
        let owner = || format!("plugin '{raw}'");
        let plugin = match declaration {
            PluginDeclaration::Notation(notation) => {
                let parts = split_notation(notation, 1, 2)
                    .ok_or_else(|| invalid_coordinate(owner(), notation))?;
                PluginRef {
                    id: parts[0].to_string(),
                    version: parts
                        .get(1)
                        .map(|version| VersionConstraint::Literal(version.to_string())),
                    version_ref: None,
                }
            }
            PluginDeclaration::Spec(spec) => {
                let id = spec.id.trim();
                if id.is_empty() {
                    return Err(invalid_coordinate(owner(), &spec.id));
                }
                let (version, version_ref) =
                    resolve_declared_version(owner, spec.version.as_ref(), versions)?;
                PluginRef {
                    id: id.to_string(),
                    version,
                    version_ref,
                }
            }
        };
        plugins.insert(alias, plugin);
    }
    Ok(plugins)
}

/// Split `a:b[:c]` into between `min` and `max` non-empty parts.
fn split_notation(notation: &str, min: usize, max: usize) -> Option<Vec<&str>> {
    let parts: Vec<&str> = notation.split(':').map(str::trim).collect();
    if parts.len() < min || parts.len() > max || parts.iter().any(|part| part.is_empty()) {
        return None;
    }
    Some(parts)
}

fn invalid_coordinate(owner: String, notation: &str) -> CatalogError {
    CatalogError::InvalidCoordinate {
        owner,
        notation: notation.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> CatalogKey {
        CatalogKey("libs".into())
    }

    #[test]
    fn builds_tables_and_namespaces() {
        let catalog = Catalog::from_toml_str(
            key(),
            r#"
            [versions]
            cuda = "11.8-8.6-1.5.8"

            [libraries]
            cuda = { module = "org.bytedeco:cuda-platform", version.ref = "cuda" }
            cuda-redist = { module = "org.bytedeco:cuda-platform-redist", version.ref = "cuda" }
            gson = "com.google.code.gson:gson:2.10"
            "#,
        )
        .unwrap();

        assert_eq!(catalog.len(EntryKind::Library), 3);
        assert_eq!(catalog.len(EntryKind::Version), 1);
        let cuda = catalog.namespace("cuda").unwrap();
        assert_eq!(cuda.resolve_default().unwrap().artifact, "cuda-platform");
        assert_eq!(
            cuda.resolve_module("redist").unwrap().version_ref,
            Some(Alias::parse("cuda").unwrap())
        );
        assert_eq!(
            catalog.resolve_module("gson").unwrap().to_string(),
            "com.google.code.gson:gson:2.10"
        );
    }

    #[test]
    fn duplicate_after_normalization_is_rejected() {
        let err = Catalog::from_toml_str(
            key(),
            r#"
            [libraries]
            groovy-core = "org.apache.groovy:groovy:4.0.9"
            groovy_core = "org.apache.groovy:groovy:4.0.9"
            "#,
        )
        .unwrap_err();
        match err {
            CatalogError::DuplicateAlias {
                kind,
                alias,
                first,
                second,
            } => {
                assert_eq!(kind, EntryKind::Library);
                assert_eq!(alias.as_str(), "groovy.core");
                assert_eq!(first, "groovy-core");
                assert_eq!(second, "groovy_core");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn reserved_library_prefix_is_rejected() {
        let err = Catalog::from_toml_str(
            key(),
            r#"
            [libraries]
            bundles-core = "org.example:core:1.0"
            "#,
        )
        .unwrap_err();
        assert!(
            matches!(err, CatalogError::ReservedAlias { ref reserved, .. } if reserved == "bundles"),
            "{err}"
        );
    }

    #[test]
    fn unknown_version_reference_fails_load() {
        let err = Catalog::from_toml_str(
            key(),
            r#"
            [plugins]
            javacpp = { id = "org.bytedeco.gradle-javacpp-platform", version.ref = "javacpp" }
            "#,
        )
        .unwrap_err();
        match err {
            CatalogError::UnknownVersionReference { owner, reference } => {
                assert_eq!(owner, "plugin 'javacpp'");
                assert_eq!(reference, "javacpp");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn split_declaration_requires_group_and_name() {
        let mut document = CatalogDocument::default();
        document.libraries.insert(
            "jts".into(),
            LibraryDeclaration::Split(crate::catalog::model::SplitDeclaration {
                group: " ".into(),
                name: "jts-core".into(),
                version: None,
            }),
        );
        let err = Catalog::from_document(key(), document).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidCoordinate { .. }), "{err}");
    }

    #[test]
    fn notation_splitting_bounds() {
        assert_eq!(split_notation("a:b", 2, 3), Some(vec!["a", "b"]));
        assert_eq!(split_notation("a:b:1.0", 2, 3), Some(vec!["a", "b", "1.0"]));
        assert_eq!(split_notation("a", 2, 3), None);
        assert_eq!(split_notation("a::1.0", 2, 3), None);
        assert_eq!(split_notation("a:b:c:d", 2, 3), None);
        assert_eq!(split_notation("org.beryx.runtime", 1, 2), Some(vec!["org.beryx.runtime"]));
    }

    #[test]
    fn entry_lookup_reports_kind() {
        let catalog = Catalog::from_toml_str(
            key(),
            r#"
            [versions]
            javafx = "19"
            "#,
        )
        .unwrap();
        let entry = catalog.entry(EntryKind::Version, "javafx").unwrap();
        assert_eq!(entry.kind(), EntryKind::Version);
        assert_eq!(entry.to_string(), "19");
        let err = catalog.entry(EntryKind::Plugin, "javafx").unwrap_err();
        assert_eq!(err.alias(), Some("javafx"));
    }
}
