use cfgbind_key::{DeclarationResolveResult, TypeModel};
use cfgbind_metadata::{
    CatalogLoader, DocumentKind, DocumentSource, EngineConfig, MetadataCatalogBuilder,
    MetadataError,
};
use cfgbind_test_utils::{sample_type_model, SAMPLE_METADATA};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

const ONE_KEY: &str = r#"{"properties":[{"name":"app.first"}]}"#;
const TWO_KEYS: &str = r#"{"properties":[{"name":"app.first"},{"name":"app.second"}]}"#;

const SOURCED_KEYS: &str = r#"{"properties":[
    {"name":"app.a","sourceType":"org.example.A"},
    {"name":"app.b","sourceType":"org.example.B"},
    {"name":"app.c","sourceType":"org.example.C"},
    {"name":"app.d","sourceType":"org.example.D"}
]}"#;

/// Type model that raises `cancel` while the `nth` source type is looked up
#[derive(Debug)]
struct CancelDuringLookup {
    cancel: CancellationToken,
    nth: usize,
    lookups: AtomicUsize,
}

impl CancelDuringLookup {
    fn new(cancel: &CancellationToken, nth: usize) -> Arc<Self> {
        Arc::new(Self {
            cancel: cancel.clone(),
            nth,
            lookups: AtomicUsize::new(0),
        })
    }
}

impl TypeModel for CancelDuringLookup {
    fn contains_type(&self, _type_name: &str) -> bool {
        if self.lookups.fetch_add(1, Ordering::SeqCst) + 1 == self.nth {
            self.cancel.cancel();
        }
        true
    }
}

fn write(dir: &TempDir, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

async fn rewrite(path: &Path, text: &str) {
    tokio::fs::write(path, text).await.unwrap();
}

#[tokio::test]
async fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "spring-configuration-metadata.json", SAMPLE_METADATA);
    let loader = CatalogLoader::default().with_type_model(sample_type_model());

    let loaded = loader
        .load(&DocumentSource::from_path(&path), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(loaded.catalog.len(), 7);
    assert!(loaded.diagnostics.is_empty());
    assert!(loaded.version.is_some());
}

#[tokio::test]
async fn test_unchanged_content_is_served_from_cache() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "meta.json", ONE_KEY);
    let loader = CatalogLoader::default();
    let source = DocumentSource::from_path(&path);
    let cancel = CancellationToken::new();

    let first = loader.load(&source, &cancel).await.unwrap();
    let second = loader.load(&source, &cancel).await.unwrap();
    assert!(Arc::ptr_eq(&first.catalog, &second.catalog));
}

#[tokio::test]
async fn test_changed_content_is_never_stale() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "meta.json", ONE_KEY);
    let loader = CatalogLoader::default();
    let source = DocumentSource::from_path(&path);
    let cancel = CancellationToken::new();

    let before = loader.load(&source, &cancel).await.unwrap();
    assert_eq!(before.catalog.len(), 1);

    rewrite(&path, TWO_KEYS).await;
    let after = loader.load(&source, &cancel).await.unwrap();
    assert_eq!(after.catalog.len(), 2);
    assert_ne!(before.version, after.version);

    // The earlier snapshot is unaffected by the rebuild
    assert_eq!(before.catalog.len(), 1);
}

#[tokio::test]
async fn test_cancellation_propagates_and_keeps_cache() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "meta.json", ONE_KEY);
    let loader = CatalogLoader::default();
    let source = DocumentSource::from_path(&path);

    let loaded = loader.load(&source, &CancellationToken::new()).await.unwrap();
    let version = loaded.version.unwrap();

    rewrite(&path, TWO_KEYS).await;
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = loader.load(&source, &cancel).await.unwrap_err();
    assert!(matches!(err, MetadataError::Cancelled));

    let cached = loader.cache().latest(source.id()).await.unwrap();
    assert_eq!(cached.version, version);
    assert_eq!(cached.catalog.len(), 1);
}

#[tokio::test]
async fn test_cancelled_inline_parse() {
    let loader = CatalogLoader::default();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = loader
        .load(&DocumentSource::inline("mem", ONE_KEY), &cancel)
        .await;
    assert!(matches!(result, Err(MetadataError::Cancelled)));
}

#[tokio::test]
async fn test_oversized_document_is_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "meta.json", TWO_KEYS);
    let loader = CatalogLoader::new(EngineConfig::new().with_max_document_size(16));

    let loaded = loader
        .load(&DocumentSource::from_path(&path), &CancellationToken::new())
        .await
        .unwrap();
    assert!(loaded.catalog.is_empty());
}

#[tokio::test]
async fn test_load_all_concatenates_in_order() {
    let dir = TempDir::new().unwrap();
    let library = write(&dir, "spring-configuration-metadata.json", TWO_KEYS);
    let local = write(
        &dir,
        "additional-spring-configuration-metadata.json",
        r#"{"properties":[{"name":"app.first","description":"local"}]}"#,
    );
    let sources = [
        DocumentSource::from_path(&library).with_library("lib-1.0.jar"),
        DocumentSource::from_path(&local),
        DocumentSource::from_path(dir.path().join("missing.json")),
    ];
    assert_eq!(sources[1].kind(), DocumentKind::Additional);

    let loader = CatalogLoader::default();
    let catalog = loader
        .load_all(&sources, &CancellationToken::new())
        .await
        .unwrap();

    let names: Vec<_> = catalog.iter().map(|k| k.name()).collect();
    assert_eq!(names, ["app.first", "app.second", "app.first"]);
    assert_eq!(catalog.keys()[0].declaration().library(), "lib-1.0.jar");
    assert_eq!(
        catalog.keys()[2].declaration().result(),
        DeclarationResolveResult::AdditionalJson
    );

    let resolution = loader.resolver().resolve(&catalog, "app.first").unwrap();
    assert_eq!(resolution.key().description(), None);
}

#[tokio::test]
async fn test_case_sensitive_split() {
    let loader = CatalogLoader::new(EngineConfig::new().with_case_sensitive_keys(true));
    let catalog = loader
        .load_all(
            &[DocumentSource::inline(
                "mem",
                r#"{"properties":[{"name":"app.labels","type":"java.util.Map<java.lang.String,java.lang.String>"}]}"#,
            )],
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    let key = &catalog.keys()[0];
    assert!(loader.split(key, "app.labels.env").is_some());
    assert!(loader.split(key, "App.Labels.env").is_none());
}

#[test]
fn test_cancellation_between_entries_stops_parse() {
    let cancel = CancellationToken::new();
    let model = CancelDuringLookup::new(&cancel, 2);
    let builder = MetadataCatalogBuilder::new("demo").with_type_model(model.clone());

    let result = builder.parse_cancellable(SOURCED_KEYS, &cancel);
    assert!(matches!(result, Err(MetadataError::Cancelled)));
    assert_eq!(model.lookups.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_mid_parse_cancellation_keeps_cached_catalog() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "meta.json", ONE_KEY);
    let cancel = CancellationToken::new();
    let loader = CatalogLoader::default().with_type_model(CancelDuringLookup::new(&cancel, 2));
    let source = DocumentSource::from_path(&path);

    let before = loader.load(&source, &cancel).await.unwrap();
    assert!(!cancel.is_cancelled());

    rewrite(&path, SOURCED_KEYS).await;
    let err = loader.load(&source, &cancel).await.unwrap_err();
    assert!(matches!(err, MetadataError::Cancelled));

    let cached = loader.cache().latest(source.id()).await.unwrap();
    assert_eq!(Some(cached.version), before.version);
    assert!(Arc::ptr_eq(&cached.catalog, &before.catalog));
    let names: Vec<_> = cached.catalog.iter().map(|k| k.name()).collect();
    assert_eq!(names, ["app.first"]);
}
