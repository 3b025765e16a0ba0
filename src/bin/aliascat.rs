//! Inspect a version catalog from the command line.
//!
//! Usage:
//!   aliascat check
//!   aliascat resolve module groovy-core
//!   aliascat resolve bundle opencv-cuda --json
//!   aliascat tree cuda
//!   aliascat --catalog gradle/libs.versions.toml accessors

use aliascat::codegen::render_accessors;
use aliascat::logging::init_logging;
use aliascat::{Alias, Catalog, EntryKind, NamespaceView, open_catalog};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "aliascat")]
#[command(about = "Resolve aliases from a dependency version catalog")]
struct Cli {
    /// Catalog file; defaults to ALIASCAT_CATALOG or gradle/libs.versions.toml above the working directory.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Accessor name for the catalog; defaults to the file name stem.
    #[arg(long, global = true)]
    key: Option<String>,
    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load and validate the catalog, then print table sizes.
    Check,
    /// Resolve one alias.
    Resolve {
        #[arg(value_parser = ["module", "library", "version", "bundle", "plugin"])]
        kind: String,
        alias: String,
        /// Emit JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Print the namespace tree, optionally starting below NAMESPACE.
    Tree { namespace: Option<String> },
    /// Print the resolved catalog as a JSON document.
    Dump,
    /// Print generated Rust accessor wrappers.
    Accessors,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let catalog = open_catalog(cli.catalog.as_deref(), cli.key.as_deref())
        .context("failed to load version catalog")?;
    debug!("catalog '{}' ready", catalog.key());

    match cli.command {
        Command::Check => check(&catalog),
        Command::Resolve { kind, alias, json } => resolve(&catalog, entry_kind(&kind), &alias, json),
        Command::Tree { namespace } => tree(&catalog, namespace.as_deref()),
        Command::Dump => {
            let document = catalog.to_document();
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
        Command::Accessors => {
            print!("{}", render_accessors(&catalog));
            Ok(())
        }
    }
}

fn entry_kind(raw: &str) -> EntryKind {
    match raw {
        "version" => EntryKind::Version,
        "bundle" => EntryKind::Bundle,
        "plugin" => EntryKind::Plugin,
        _ => EntryKind::Library,
    }
}

fn check(catalog: &Catalog) -> Result<()> {
    let counts: Vec<String> = EntryKind::ALL
        .iter()
        .map(|kind| format!("{} {}", catalog.len(*kind), kind.section()))
        .collect();
    println!("catalog '{}' ok: {}", catalog.key(), counts.join(", "));
    if let Some(description) = catalog.description() {
        println!("{description}");
    }
    Ok(())
}

fn resolve(catalog: &Catalog, kind: EntryKind, alias: &str, as_json: bool) -> Result<()> {
    if as_json {
        let entry = catalog.entry(kind, alias)?;
        let mut value = json!({
            "catalog": catalog.key(),
            "kind": kind,
            "alias": Alias::normalize(alias),
            "entry": entry,
        });
        if kind == EntryKind::Bundle {
            let modules: Vec<String> = catalog
                .resolve_bundle(alias)?
                .iter()
                .map(|module| module.to_string())
                .collect();
            value["modules"] = json!(modules);
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match kind {
        EntryKind::Library => println!("{}", catalog.resolve_module(alias)?),
        EntryKind::Version => {
            let version = catalog.resolve_version(alias)?;
            let normalized = Alias::parse(alias)
                .map_err(|reason| anyhow::anyhow!("invalid alias '{alias}': {reason}"))?;
            println!("{}", version.require_single(&normalized)?);
        }
        EntryKind::Bundle => {
            for module in catalog.resolve_bundle(alias)? {
                println!("{module}");
            }
        }
        EntryKind::Plugin => println!("{}", catalog.resolve_plugin(alias)?),
    }
    Ok(())
}

fn tree(catalog: &Catalog, namespace: Option<&str>) -> Result<()> {
    let start = match namespace {
        Some(path) => catalog.namespace(path)?,
        None => catalog.root(),
    };
    let label = if start.path().is_root() {
        catalog.key().to_string()
    } else {
        format!("{}.{}", catalog.key(), start.path())
    };
    let mut out = String::new();
    out.push_str(&label);
    out.push('\n');
    render_tree(start, 1, &mut out);
    print!("{out}");
    Ok(())
}

fn render_tree(view: NamespaceView<'_>, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (name, kinds) in view.entries() {
        let kinds: Vec<&str> = kinds.iter().map(EntryKind::as_str).collect();
        out.push_str(&format!("{indent}{name} [{}]\n", kinds.join(", ")));
    }
    for child in view.children() {
        out.push_str(&format!("{indent}{}/\n", child.name()));
        render_tree(child, depth + 1, out);
    }
}
