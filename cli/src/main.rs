//! `cfgbind` command line tool
//!
//! Loads metadata documents and resolves raw property keys against them.

use anyhow::{Context, Result};
use cfgbind_binder::NameBinder;
use cfgbind_key::{Catalog, ConfigKey, IndexAccessScanner, IndexAccessVisitor, TextRange};
use cfgbind_metadata::{CatalogLoader, ContentHash, DocumentSource, EngineConfig, LoadedDocument};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

fn metadata_arg() -> Arg {
    Arg::new("metadata")
        .long("metadata")
        .short('m')
        .required(true)
        .action(ArgAction::Append)
        .value_parser(value_parser!(PathBuf))
        .help("Metadata JSON document; repeat to load several in order")
}

fn cli() -> Command {
    Command::new("cfgbind")
        .version(cfgbind_metadata::VERSION)
        .about("Resolve configuration property keys against metadata")
        .subcommand_required(true)
        .arg(
            Arg::new("dialect")
                .long("dialect")
                .global(true)
                .value_parser(value_parser!(NameBinder))
                .help("Name binding convention: strict or relaxed"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Engine configuration JSON"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging when RUST_LOG is unset"),
        )
        .subcommand(
            Command::new("resolve")
                .about("Resolve raw keys to declared keys")
                .arg(metadata_arg())
                .arg(
                    Arg::new("keys")
                        .required(true)
                        .num_args(1..)
                        .help("Raw property keys"),
                ),
        )
        .subcommand(
            Command::new("keys")
                .about("List declared keys")
                .arg(metadata_arg()),
        )
        .subcommand(
            Command::new("scan")
                .about("Report index access events of a raw key")
                .arg(metadata_arg())
                .arg(Arg::new("key").required(true).help("Raw property key")),
        )
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "cfgbind=debug,cfgbind_metadata=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    setup_tracing(matches.get_flag("verbose"));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let config = engine_config(&matches).await?;
    let loader = CatalogLoader::new(config);
    let json = matches.get_flag("json");

    match matches.subcommand() {
        Some(("resolve", args)) => {
            let catalog = load_catalog(&loader, args, &cancel).await?;
            let resolutions: Vec<_> = args
                .get_many::<String>("keys")
                .into_iter()
                .flatten()
                .map(|raw| ResolveOutput::new(&loader, &catalog, raw))
                .collect();
            if json {
                print_json(&resolutions)?;
            } else {
                for resolution in &resolutions {
                    println!("{resolution}");
                }
            }
        }
        Some(("keys", args)) => {
            let documents = loader.load_documents(&sources(args), &cancel).await?;
            let report = KeysOutput::new(&documents);
            if json {
                print_json(&report)?;
            } else {
                println!("{report}");
            }
        }
        Some(("scan", args)) => {
            let catalog = load_catalog(&loader, args, &cancel).await?;
            let raw = args
                .get_one::<String>("key")
                .context("missing raw key")?;
            let report = ScanOutput::new(&loader, &catalog, raw);
            if json {
                print_json(&report)?;
            } else {
                println!("{report}");
            }
        }
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

async fn engine_config(matches: &ArgMatches) -> Result<EngineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?;
            EngineConfig::from_json(&text)?
        }
        None => EngineConfig::default(),
    };
    if let Some(dialect) = matches.get_one::<NameBinder>("dialect") {
        config = config.with_dialect(*dialect);
    }
    Ok(config)
}

fn sources(args: &ArgMatches) -> Vec<DocumentSource> {
    args.get_many::<PathBuf>("metadata")
        .into_iter()
        .flatten()
        .map(DocumentSource::from_path)
        .collect()
}

async fn load_catalog(
    loader: &CatalogLoader,
    args: &ArgMatches,
    cancel: &CancellationToken,
) -> Result<Catalog> {
    let sources = sources(args);
    let catalog = loader.load_all(&sources, cancel).await?;
    tracing::debug!(documents = sources.len(), keys = catalog.len(), "catalog loaded");
    Ok(catalog)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    raw: String,
    key: Option<String>,
    access_type: Option<&'static str>,
    key_index: Option<String>,
    key_property: Option<String>,
}

impl ResolveOutput {
    fn new(loader: &CatalogLoader, catalog: &Catalog, raw: &str) -> Self {
        let resolution = loader.resolver().resolve(catalog, raw);
        Self {
            raw: raw.to_string(),
            key: resolution.as_ref().map(|r| r.key().name().to_string()),
            access_type: resolution.as_ref().map(|r| r.key().access_type().as_str()),
            key_index: resolution
                .as_ref()
                .and_then(|r| r.key_index().map(str::to_string)),
            key_property: resolution
                .as_ref()
                .and_then(|r| r.key_property().map(str::to_string)),
        }
    }
}

impl std::fmt::Display for ResolveOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(key) = &self.key else {
            return write!(f, "{}: unresolved", self.raw);
        };
        write!(f, "{} -> {key} [{}]", self.raw, self.access_type.unwrap_or("normal"))?;
        if let Some(index) = &self.key_index {
            write!(f, " index={index}")?;
        }
        if let Some(property) = &self.key_property {
            write!(f, " property={property}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct KeyOutput {
    name: String,
    #[serde(rename = "type")]
    declared_type: Option<String>,
    access_type: &'static str,
    default_value: Option<String>,
    deprecation: Option<&'static str>,
}

impl KeyOutput {
    fn new(key: &ConfigKey) -> Self {
        Self {
            name: key.name().to_string(),
            declared_type: key.declared_type().map(ToString::to_string),
            access_type: key.access_type().as_str(),
            default_value: key.default_value().map(str::to_string),
            deprecation: key.deprecation().level().map(|level| level.as_str()),
        }
    }
}

impl std::fmt::Display for KeyOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.name, self.access_type)?;
        if let Some(declared_type) = &self.declared_type {
            write!(f, " {declared_type}")?;
        }
        if let Some(level) = self.deprecation {
            write!(f, " (deprecated: {level})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct DocumentOutput {
    id: String,
    version: Option<ContentHash>,
    keys: usize,
    diagnostics: usize,
}

#[derive(Debug, Serialize)]
struct KeysOutput {
    documents: Vec<DocumentOutput>,
    keys: Vec<KeyOutput>,
}

impl KeysOutput {
    fn new(documents: &[LoadedDocument]) -> Self {
        Self {
            documents: documents
                .iter()
                .map(|doc| DocumentOutput {
                    id: doc.id.to_string(),
                    version: doc.version,
                    keys: doc.catalog.len(),
                    diagnostics: doc.diagnostics.len(),
                })
                .collect(),
            keys: documents
                .iter()
                .flat_map(|doc| doc.catalog.iter())
                .map(|key| KeyOutput::new(key))
                .collect(),
        }
    }
}

impl std::fmt::Display for KeysOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for doc in &self.documents {
            match &doc.version {
                Some(version) => {
                    writeln!(f, "# {} {} ({} keys)", doc.id, version.short(), doc.keys)?;
                }
                None => writeln!(f, "# {} unreadable", doc.id)?,
            }
        }
        for (i, key) in self.keys.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ScanEvent {
    event: &'static str,
    start: usize,
    end: usize,
    text: String,
}

#[derive(Debug, Serialize)]
struct ScanOutput {
    raw: String,
    key: Option<String>,
    events: Vec<ScanEvent>,
}

impl ScanOutput {
    fn new(loader: &CatalogLoader, catalog: &Catalog, raw: &str) -> Self {
        let mut report = Self {
            raw: raw.to_string(),
            key: None,
            events: Vec::new(),
        };
        if let Some(resolution) = loader.resolver().resolve(catalog, raw) {
            report.key = Some(resolution.key().name().to_string());
            IndexAccessScanner::new(raw, resolution.key()).visit(&mut report);
        }
        report
    }

    fn push(&mut self, event: &'static str, range: TextRange) {
        self.events.push(ScanEvent {
            event,
            start: range.start,
            end: range.end,
            text: range.slice(&self.raw).to_string(),
        });
    }
}

impl IndexAccessVisitor for ScanOutput {
    fn on_bracket(&mut self, at: usize) {
        self.push("bracket", TextRange::new(at, at + 1));
    }

    fn on_index_value(&mut self, range: TextRange) {
        self.push("index-value", range);
    }

    fn on_missing_closing_bracket(&mut self, at: usize) {
        self.push("missing-closing-bracket", TextRange::new(at, at + 1));
    }

    fn on_missing_index_value(&mut self, at: usize) {
        self.push("missing-index-value", TextRange::new(at, at));
    }

    fn on_index_value_not_integer(&mut self, range: TextRange) {
        self.push("index-value-not-integer", range);
    }
}

impl std::fmt::Display for ScanOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(key) = &self.key else {
            return write!(f, "{}: unresolved", self.raw);
        };
        write!(f, "{} -> {key}", self.raw)?;
        for event in &self.events {
            write!(f, "\n  {}..{} {} {:?}", event.start, event.end, event.event, event.text)?;
        }
        Ok(())
    }
}
