//! Version catalog wiring.
//!
//! A catalog document (`libs.versions.toml` or its JSON form) is parsed into
//! the serde types in `model`, validated once, and indexed into a `Catalog`.
//! Callers resolve aliases directly on the `Catalog` or walk the namespace
//! tree through `NamespaceView`; `CatalogRepository` holds several catalogs
//! when a build declares more than one.

pub mod entry;
pub mod identity;
pub mod index;
pub mod model;
pub mod namespace;
pub mod repository;
pub mod version;

pub use entry::{CatalogEntry, ModuleCoordinate, PluginRef};
pub use identity::{Alias, CatalogKey, EntryKind, NamespacePath};
pub use index::Catalog;
pub use model::{
    CatalogDocument, CatalogMetadata, LibraryDeclaration, PluginDeclaration, VersionDeclaration,
};
pub use namespace::{NamespaceNode, NamespaceView};
pub use repository::CatalogRepository;
pub use version::{RichVersion, VersionConstraint, VersionRef};

pub use model::load_catalog_from_path;
