//! Holds one or more catalogs for lookup by key.
//!
//! A build usually declares a single `libs` catalog, but extra catalogs
//! (`testLibs`, `toolLibs`) sit next to it under their own accessor names.

use crate::catalog::entry::ModuleCoordinate;
use crate::catalog::identity::CatalogKey;
use crate::catalog::index::Catalog;
use std::collections::BTreeMap;

#[derive(Default)]
/// In-memory store for catalogs keyed by `CatalogKey`.
pub struct CatalogRepository {
    catalogs: BTreeMap<CatalogKey, Catalog>,
}

impl CatalogRepository {
    /// Register a catalog; a catalog with the same key is replaced and returned.
    pub fn register(&mut self, catalog: Catalog) -> Option<Catalog> {
        self.catalogs.insert(catalog.key().clone(), catalog)
    }

    pub fn get(&self, key: &CatalogKey) -> Option<&Catalog> {
        self.catalogs.get(key)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &CatalogKey> {
        self.catalogs.keys()
    }

    /// Resolve a library alias inside a registered catalog.
    pub fn find_module(&self, key: &CatalogKey, alias: &str) -> Option<&ModuleCoordinate> {
        self.get(key)?.resolve_module(alias).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(key: &str, text: &str) -> Catalog {
        Catalog::from_toml_str(CatalogKey(key.into()), text).unwrap()
    }

    #[test]
    fn catalogs_are_kept_apart_by_key() {
        let mut repository = CatalogRepository::default();
        repository.register(catalog(
            "libs",
            "[libraries]\ngson = \"com.google.code.gson:gson:2.10\"\n",
        ));
        repository.register(catalog(
            "testLibs",
            "[libraries]\njunit = \"org.junit.jupiter:junit-jupiter:5.9.2\"\n",
        ));

        let keys: Vec<&str> = repository.keys().map(|key| key.0.as_str()).collect();
        assert_eq!(keys, vec!["libs", "testLibs"]);

        let libs = CatalogKey("libs".into());
        let test_libs = CatalogKey("testLibs".into());
        assert!(repository.find_module(&libs, "gson").is_some());
        assert!(repository.find_module(&libs, "junit").is_none());
        assert_eq!(
            repository.find_module(&test_libs, "junit").unwrap().artifact,
            "junit-jupiter"
        );
        assert!(repository.find_module(&CatalogKey("other".into()), "gson").is_none());
    }

    #[test]
    fn register_replaces_existing_key() {
        let mut repository = CatalogRepository::default();
        assert!(repository.register(catalog("libs", "")).is_none());
        let previous = repository.register(catalog(
            "libs",
            "[versions]\ngroovy = \"4.0.9\"\n",
        ));
        assert!(previous.unwrap().is_empty());
        assert_eq!(repository.keys().count(), 1);
    }
}
