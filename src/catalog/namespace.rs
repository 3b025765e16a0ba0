//! Namespace tree derived from dotted alias prefixes.
//!
//! Every alias contributes one leaf to the node of its namespace, creating the
//! intermediate nodes on the way. Nodes only index names; entries stay in the
//! catalog's flat tables, so navigation is a tree walk and resolution is a
//! single lookup.

use crate::catalog::entry::{ModuleCoordinate, PluginRef};
use crate::catalog::identity::{Alias, EntryKind, NamespacePath};
use crate::catalog::index::Catalog;
use crate::catalog::version::VersionRef;
use crate::error::{CatalogError, Result};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NamespaceNode {
    path: NamespacePath,
    children: BTreeMap<String, NamespaceNode>,
    leaves: BTreeMap<String, BTreeSet<EntryKind>>,
}

impl NamespaceNode {
    pub(crate) fn build<'a>(aliases: impl IntoIterator<Item = (EntryKind, &'a Alias)>) -> Self {
        let mut root = NamespaceNode::default();
        for (kind, alias) in aliases {
            root.insert(kind, alias);
        }
        root
    }

    fn insert(&mut self, kind: EntryKind, alias: &Alias) {
        let mut node = self;
        for segment in alias.namespace().segments() {
            let child_path = node.path.child(segment);
            node = node
                .children
                .entry(segment.clone())
                .or_insert_with(|| NamespaceNode {
                    path: child_path,
                    ..Default::default()
                });
        }
        node.leaves
            .entry(alias.leaf().to_string())
            .or_default()
            .insert(kind);
    }

    pub fn path(&self) -> &NamespacePath {
        &self.path
    }

    pub(crate) fn descend(&self, path: &NamespacePath) -> Result<&NamespaceNode> {
        let mut node = self;
        for segment in path.segments() {
            node = node
                .children
                .get(segment)
                .ok_or_else(|| CatalogError::UnknownNamespace {
                    path: node.path.clone(),
                    segment: segment.clone(),
                })?;
        }
        Ok(node)
    }

    /// Number of nodes below (and including) this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .values()
            .map(NamespaceNode::node_count)
            .sum::<usize>()
    }
}

/// A namespace node bound to its catalog.
#[derive(Clone, Copy, Debug)]
pub struct NamespaceView<'a> {
    catalog: &'a Catalog,
    node: &'a NamespaceNode,
}

impl<'a> NamespaceView<'a> {
    pub(crate) fn new(catalog: &'a Catalog, node: &'a NamespaceNode) -> Self {
        Self { catalog, node }
    }

    pub fn path(&self) -> &'a NamespacePath {
        &self.node.path
    }

    /// Last path segment; empty for the root.
    pub fn name(&self) -> &'a str {
        self.node
            .path
            .segments()
            .last()
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The library whose alias equals this namespace (`cuda` for `cuda.redist`).
    pub fn resolve_default(&self) -> Result<&'a ModuleCoordinate> {
        let alias = self.node.path.to_string();
        self.catalog
            .lookup_module(&alias)
            .ok_or_else(|| CatalogError::unknown_alias(EntryKind::Library, &alias, &self.node.path))
    }

    pub fn resolve_module(&self, name: &str) -> Result<&'a ModuleCoordinate> {
        self.catalog
            .lookup_module(&self.node.path.qualify(name))
            .ok_or_else(|| CatalogError::unknown_alias(EntryKind::Library, name, &self.node.path))
    }

    pub fn resolve_version(&self, name: &str) -> Result<VersionRef> {
        self.catalog
            .lookup_version(&self.node.path.qualify(name))
            .map(|constraint| constraint.flatten())
            .ok_or_else(|| CatalogError::unknown_alias(EntryKind::Version, name, &self.node.path))
    }

    pub fn resolve_bundle(&self, name: &str) -> Result<Vec<&'a ModuleCoordinate>> {
        let qualified = self.node.path.qualify(name);
        let (bundle, members) = self
            .catalog
            .lookup_bundle(&qualified)
            .ok_or_else(|| CatalogError::unknown_alias(EntryKind::Bundle, name, &self.node.path))?;
        members
            .iter()
            .map(|member| {
                self.catalog.lookup_module(member.as_str()).ok_or_else(|| {
                    CatalogError::DanglingBundleReference {
                        bundle: bundle.clone(),
                        member: member.to_string(),
                    }
                })
            })
            .collect()
    }

    pub fn resolve_plugin(&self, name: &str) -> Result<&'a PluginRef> {
        self.catalog
            .lookup_plugin(&self.node.path.qualify(name))
            .ok_or_else(|| CatalogError::unknown_alias(EntryKind::Plugin, name, &self.node.path))
    }

    /// Navigate to a descendant namespace (dotted path, relative to this one).
    pub fn namespace(&self, path: &str) -> Result<NamespaceView<'a>> {
        let node = self.node.descend(&NamespacePath::parse(path))?;
        Ok(NamespaceView::new(self.catalog, node))
    }

    pub fn children(self) -> impl Iterator<Item = NamespaceView<'a>> + 'a {
        let catalog = self.catalog;
        self.node
            .children
            .values()
            .map(move |node| NamespaceView::new(catalog, node))
    }

    /// Names declared directly in this namespace for `kind`, sorted.
    pub fn leaves(self, kind: EntryKind) -> impl Iterator<Item = &'a str> + 'a {
        self.node
            .leaves
            .iter()
            .filter(move |(_, kinds)| kinds.contains(&kind))
            .map(|(name, _)| name.as_str())
    }

    /// Every name declared directly in this namespace with the tables it is in.
    pub fn entries(self) -> impl Iterator<Item = (&'a str, &'a BTreeSet<EntryKind>)> + 'a {
        self.node
            .leaves
            .iter()
            .map(|(name, kinds)| (name.as_str(), kinds))
    }
}
