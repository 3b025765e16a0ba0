//! Rendering of named accessor wrappers for a catalog.
//!
//! The output is a Rust module whose nested `pub mod` blocks mirror the
//! namespace tree. Each generated function forwards to the generic resolution
//! call with its fully qualified alias, so a build script can turn misspelled
//! aliases into compile errors instead of lookup failures.

use crate::catalog::{Catalog, EntryKind, NamespaceView};
use std::collections::BTreeSet;

/// Name used for the default entry of a namespace (`cuda` under `mod cuda`).
const DEFAULT_ENTRY_FN: &str = "provider";

const KEYWORDS: [&str; 49] = [
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "union",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be raw identifiers.
const RESERVED_PATH_KEYWORDS: [&str; 4] = ["self", "Self", "super", "crate"];

/// Render accessor wrappers for every entry of `catalog`.
pub fn render_accessors(catalog: &Catalog) -> String {
    let mut writer = SourceWriter::default();
    writer.line(&format!(
        "// Accessors for version catalog `{}`. Generated by aliascat; do not edit.",
        catalog.key()
    ));
    writer.open(&rust_ident(&catalog.key().0));
    render_namespace(&mut writer, catalog.root(), EntryKind::Library, None);
    for kind in [EntryKind::Version, EntryKind::Bundle, EntryKind::Plugin] {
        if catalog.len(kind) == 0 {
            continue;
        }
        writer.blank();
        writer.open(kind.section());
        render_namespace(&mut writer, catalog.root(), kind, None);
        writer.close();
    }
    writer.close();
    writer.finish()
}

/// Render one module body. `default_alias` is the entry whose alias equals
/// this namespace; it is emitted first, as `provider`.
fn render_namespace(
    writer: &mut SourceWriter,
    view: NamespaceView<'_>,
    kind: EntryKind,
    default_alias: Option<String>,
) {
    let nested: Vec<NamespaceView<'_>> = view
        .children()
        .filter(|child| subtree_has(*child, kind))
        .collect();

    // Leaves claim names before the default entry so `provider` yields to a
    // declared `provider` leaf.
    let mut functions = NameAllocator::default();
    let leaves: Vec<(String, String)> = view
        .leaves(kind)
        .filter(|leaf| !nested.iter().any(|child| child.name() == *leaf))
        .map(|leaf| (functions.claim(rust_ident(leaf)), view.path().qualify(leaf)))
        .collect();
    let default = default_alias.map(|alias| (functions.claim(DEFAULT_ENTRY_FN.to_string()), alias));

    let mut first = true;
    for (name, alias) in default.iter().chain(leaves.iter()) {
        if !first {
            writer.blank();
        }
        first = false;
        render_accessor(writer, name, alias, kind);
    }

    let mut modules = NameAllocator::default();
    for child in nested {
        if !first {
            writer.blank();
        }
        first = false;
        writer.open(&modules.claim(rust_ident(child.name())));
        let child_default = view
            .leaves(kind)
            .any(|leaf| leaf == child.name())
            .then(|| child.path().to_string());
        render_namespace(writer, child, kind, child_default);
        writer.close();
    }
}

/// Hands out identifiers unique within one module. A clash gets the first
/// free `_2`, `_3`, ... suffix; claims happen in sorted alias order, so the
/// result is stable across runs.
#[derive(Default)]
struct NameAllocator {
    taken: BTreeSet<String>,
}

impl NameAllocator {
    fn claim(&mut self, ident: String) -> String {
        if self.taken.insert(ident.clone()) {
            return ident;
        }
        let base = ident.strip_prefix("r#").unwrap_or(&ident);
        let mut counter = 2;
        loop {
            let candidate = format!("{base}_{counter}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn render_accessor(writer: &mut SourceWriter, name: &str, alias: &str, kind: EntryKind) {
    let (returns, call) = match kind {
        EntryKind::Library => ("&::aliascat::ModuleCoordinate", "resolve_module"),
        EntryKind::Version => ("::aliascat::VersionRef", "resolve_version"),
        EntryKind::Bundle => ("Vec<&::aliascat::ModuleCoordinate>", "resolve_bundle"),
        EntryKind::Plugin => ("&::aliascat::PluginRef", "resolve_plugin"),
    };
    writer.line(&format!(
        "pub fn {name}(catalog: &::aliascat::Catalog) -> ::aliascat::error::Result<{returns}> {{"
    ));
    writer.indented(&format!("catalog.{call}(\"{alias}\")"));
    writer.line("}");
}

fn subtree_has(view: NamespaceView<'_>, kind: EntryKind) -> bool {
    view.leaves(kind).next().is_some() || view.children().any(|child| subtree_has(child, kind))
}

/// Turn an alias segment into a snake_case Rust identifier.
pub fn rust_ident(segment: &str) -> String {
    let mut ident = String::with_capacity(segment.len() + 4);
    let mut previous_lower = false;
    for c in segment.chars() {
        if c.is_ascii_uppercase() {
            if previous_lower {
                ident.push('_');
            }
            ident.push(c.to_ascii_lowercase());
            previous_lower = false;
        } else if c.is_ascii_alphanumeric() {
            ident.push(c);
            previous_lower = true;
        } else {
            ident.push('_');
            previous_lower = false;
        }
    }
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if RESERVED_PATH_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    } else if KEYWORDS.contains(&ident.as_str()) {
        ident.insert_str(0, "r#");
    }
    ident
}

#[derive(Default)]
struct SourceWriter {
    out: String,
    depth: usize,
}

impl SourceWriter {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn indented(&mut self, text: &str) {
        self.depth += 1;
        self.line(text);
        self.depth -= 1;
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, module: &str) {
        self.line(&format!("pub mod {module} {{"));
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogKey;

    #[test]
    fn identifiers_are_snake_case_and_escaped() {
        assert_eq!(rust_ident("deepJavaLibrary"), "deep_java_library");
        assert_eq!(rust_ident("jsr223"), "jsr223");
        assert_eq!(rust_ident("type"), "r#type");
        assert_eq!(rust_ident("self"), "self_");
        assert_eq!(rust_ident("4x"), "_4x");
        assert_eq!(rust_ident("testLibs"), "test_libs");
    }

    #[test]
    fn namespaces_become_nested_modules() {
        let catalog = Catalog::from_toml_str(
            CatalogKey("libs".into()),
            r#"
            [versions]
            groovy = "4.0.9"

            [libraries]
            cuda = "org.bytedeco:cuda-platform:11.8-8.6-1.5.8"
            cuda-redist = "org.bytedeco:cuda-platform-redist:11.8-8.6-1.5.8"
            gson = "com.google.code.gson:gson:2.10"

            [bundles]
            cuda = ["cuda", "cuda-redist"]
            "#,
        )
        .unwrap();
        let rendered = render_accessors(&catalog);

        assert!(rendered.starts_with("// Accessors for version catalog `libs`."));
        assert!(rendered.contains("pub mod libs {\n"));
        assert!(rendered.contains("    pub mod cuda {\n        pub fn provider("));
        assert!(rendered.contains("catalog.resolve_module(\"cuda\")"));
        assert!(rendered.contains("        pub fn redist(catalog: &::aliascat::Catalog)"));
        assert!(rendered.contains("catalog.resolve_module(\"cuda.redist\")"));
        assert!(rendered.contains("    pub fn gson(catalog: &::aliascat::Catalog)"));
        assert!(rendered.contains("    pub mod versions {\n        pub fn groovy("));
        assert!(rendered.contains("catalog.resolve_bundle(\"cuda\")"));
        assert!(!rendered.contains("pub mod plugins"));
        assert!(!rendered.contains("\n    pub fn cuda("));
    }

    #[test]
    fn default_entry_avoids_leaf_named_provider() {
        let catalog = Catalog::from_toml_str(
            CatalogKey("libs".into()),
            r#"
            [libraries]
            auth = "org.example:auth:1.0"
            auth-provider = "org.example:auth-provider:1.0"
            "#,
        )
        .unwrap();
        let rendered = render_accessors(&catalog);
        assert!(rendered.contains("pub fn provider_2(catalog"));
        assert!(rendered.contains("pub fn provider(catalog"));
        assert!(rendered.contains("catalog.resolve_module(\"auth.provider\")"));
    }

    #[test]
    fn clashing_identifiers_get_stable_suffixes() {
        let catalog = Catalog::from_toml_str(
            CatalogKey("libs".into()),
            r#"
            [libraries]
            xmlAPI = "org.example:xml-api-upper:1.0"
            xmlApi = "org.example:xml-api:1.0"
            jsonAPI-core = "org.example:json-core-upper:1.0"
            jsonApi-core = "org.example:json-core:1.0"
            "#,
        )
        .unwrap();
        let rendered = render_accessors(&catalog);

        assert_eq!(rendered.matches("pub fn xml_api(").count(), 1);
        assert_eq!(rendered.matches("pub fn xml_api_2(").count(), 1);
        assert!(rendered.contains(
            "pub fn xml_api(catalog: &::aliascat::Catalog) -> ::aliascat::error::Result<&::aliascat::ModuleCoordinate> {\n        catalog.resolve_module(\"xmlAPI\")"
        ));
        assert!(rendered.contains(
            "pub fn xml_api_2(catalog: &::aliascat::Catalog) -> ::aliascat::error::Result<&::aliascat::ModuleCoordinate> {\n        catalog.resolve_module(\"xmlApi\")"
        ));

        assert_eq!(rendered.matches("pub mod json_api {").count(), 1);
        assert_eq!(rendered.matches("pub mod json_api_2 {").count(), 1);
        assert!(rendered.contains("catalog.resolve_module(\"jsonAPI.core\")"));
        assert!(rendered.contains("catalog.resolve_module(\"jsonApi.core\")"));

        assert_eq!(render_accessors(&catalog), rendered);
    }

    #[test]
    fn allocator_suffixes_raw_identifiers_without_prefix() {
        let mut names = NameAllocator::default();
        assert_eq!(names.claim("r#type".into()), "r#type");
        assert_eq!(names.claim("r#type".into()), "type_2");
        assert_eq!(names.claim("r#type".into()), "type_3");
    }
}
