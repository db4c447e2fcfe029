//! Integration tests for the bulk query pipeline.
//!
//! These tests exercise the complete flow against a scripted HTTP layer
//! and a real disk-backed durable store:
//! - catalog fetch -> cache fill -> per-build matching
//! - durable reuse across runner instances (a fresh "session")
//! - per-species failure absorption
//! - run supersession
//!
//! Run with: `cargo test --test pipeline_integration`

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bulkdex::catalog::CatalogLoader;
use bulkdex::fetch::{AsyncHttpClient, ConcurrencyLimiter, FetchError, RetryingFetcher};
use bulkdex::run::{BulkQuery, QueryRunner, RunOutcome};
use bulkdex::stats::formula::{BuildKind, StatProfile};
use bulkdex::stats::StatsCache;
use bulkdex::store::{DiskStore, KeyValueStore, MemoryStore};

// ============================================================================
// Scripted HTTP Layer
// ============================================================================

/// HTTP client serving canned bodies by URL and counting requests.
struct ScriptedClient {
    bodies: Mutex<HashMap<String, Result<Vec<u8>, FetchError>>>,
    requests: AtomicUsize,
}

impl ScriptedClient {
    fn new() -> Self {
        Self {
            bodies: Mutex::new(HashMap::new()),
            requests: AtomicUsize::new(0),
        }
    }

    fn with_body(self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.lock().unwrap().insert(url.to_string(), Ok(body));
        self
    }

    fn with_failure(self, url: &str, error: FetchError) -> Self {
        self.bodies.lock().unwrap().insert(url.to_string(), Err(error));
        self
    }

    fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl AsyncHttpClient for ScriptedClient {
    fn get(&self, url: &str) -> Pin<Box<dyn Future<Output = Result<Vec<u8>, FetchError>> + Send + '_>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let response = self
            .bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::Status {
                    status: 404,
                    url: url.to_string(),
                })
            });
        Box::pin(async move { response })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

const BASE_URL: &str = "https://api.test/v2";

fn detail_url(name: &str) -> String {
    format!("{BASE_URL}/pokemon/{name}/")
}

fn catalog_body(names: &[&str]) -> Vec<u8> {
    let entries: Vec<String> = names
        .iter()
        .map(|n| format!(r#"{{"name": "{n}", "url": "{}"}}"#, detail_url(n)))
        .collect();
    format!(r#"{{"count": {}, "results": [{}]}}"#, names.len(), entries.join(",")).into_bytes()
}

fn detail_body(hp: u16, defense: u16, sp_defense: u16) -> Vec<u8> {
    format!(
        r#"{{"stats": [
            {{"base_stat": {hp}, "effort": 0}},
            {{"base_stat": 1, "effort": 0}},
            {{"base_stat": {defense}, "effort": 0}},
            {{"base_stat": 1, "effort": 0}},
            {{"base_stat": {sp_defense}, "effort": 0}},
            {{"base_stat": 1, "effort": 0}}
        ]}}"#
    )
    .into_bytes()
}

/// Scripted client with a two-species dataset: one physically bulky,
/// one specially bulky.
fn two_species_client() -> ScriptedClient {
    ScriptedClient::new()
        .with_body(&format!("{BASE_URL}/pokemon?limit=1500"), catalog_body(&["tank", "sponge"]))
        .with_body(&detail_url("tank"), detail_body(100, 100, 50))
        .with_body(&detail_url("sponge"), detail_body(50, 50, 100))
}

fn runner_over(
    client: Arc<ScriptedClient>,
    cache_dir: &std::path::Path,
) -> QueryRunner<Arc<ScriptedClient>> {
    let fetcher = Arc::new(RetryingFetcher::new(client));
    let durable: Arc<dyn KeyValueStore> = Arc::new(DiskStore::new(cache_dir));
    let catalog = CatalogLoader::new(Arc::clone(&fetcher), Arc::clone(&durable), BASE_URL, 1500);
    let stats = StatsCache::new(fetcher, Arc::new(MemoryStore::default()), durable);
    QueryRunner::new(catalog, stats, ConcurrencyLimiter::new(4))
}

fn query(hp: u16, defense: u16, sp_defense: u16) -> BulkQuery {
    BulkQuery {
        profile: StatProfile {
            hp,
            defense,
            sp_defense,
        },
    }
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Full pipeline: catalog fetch, cache fill, and all three builds matched.
#[tokio::test]
async fn test_full_pipeline_produces_all_builds() {
    let client = Arc::new(two_species_client());
    let dir = tempfile::tempdir().unwrap();
    let runner = runner_over(Arc::clone(&client), dir.path());

    let outcome = runner.run_bulk(query(100, 80, 50), None).await.unwrap();
    let report = outcome.completed().unwrap();

    assert_eq!(report.catalog_size, 2);
    assert_eq!(report.records_available, 2);

    let kinds: Vec<BuildKind> = report.builds.iter().map(|b| b.build.kind).collect();
    assert_eq!(kinds, BuildKind::ALL.to_vec());

    // The physically-leaning profile lands on the physically bulky
    // species on both axes (hand-checked dataset).
    let zero = &report.builds[2];
    assert_eq!(zero.physical.as_ref().unwrap().name, "tank");
    assert_eq!(zero.special.as_ref().unwrap().name, "tank");

    // One catalog fetch plus one detail fetch per species.
    assert_eq!(client.request_count(), 3);
}

/// A second runner over the same durable directory answers from disk:
/// no network requests at all.
#[tokio::test]
async fn test_second_session_runs_offline() {
    let dir = tempfile::tempdir().unwrap();

    let first_client = Arc::new(two_species_client());
    let first = runner_over(Arc::clone(&first_client), dir.path());
    first.run_bulk(query(80, 80, 80), None).await.unwrap();
    assert_eq!(first_client.request_count(), 3);

    // Fresh runner, fresh memory layer, no scripted bodies: every
    // request would 404. The durable layer must answer everything.
    let second_client = Arc::new(ScriptedClient::new());
    let second = runner_over(Arc::clone(&second_client), dir.path());
    let report = second
        .run_bulk(query(80, 80, 80), None)
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(report.records_available, 2);
    assert_eq!(second_client.request_count(), 0);
}

/// A species whose detail fetch keeps failing is skipped, not fatal.
#[tokio::test(start_paused = true)]
async fn test_failing_species_shrinks_dataset() {
    let client = Arc::new(
        ScriptedClient::new()
            .with_body(
                &format!("{BASE_URL}/pokemon?limit=1500"),
                catalog_body(&["ok", "broken"]),
            )
            .with_body(&detail_url("ok"), detail_body(60, 60, 60))
            .with_failure(
                &detail_url("broken"),
                FetchError::Network("connection reset".to_string()),
            ),
    );
    let dir = tempfile::tempdir().unwrap();
    let runner = runner_over(Arc::clone(&client), dir.path());

    let report = runner
        .run_bulk(query(60, 60, 60), None)
        .await
        .unwrap()
        .completed()
        .unwrap();

    assert_eq!(report.catalog_size, 2);
    assert_eq!(report.records_available, 1);
    assert_eq!(report.builds[0].physical.as_ref().unwrap().name, "ok");
}

/// Progress lands on stride boundaries and always includes the final count.
#[tokio::test]
async fn test_fill_progress_reaches_total() {
    let names: Vec<String> = (0..23).map(|i| format!("s{i}")).collect();
    let name_refs: Vec<&str> = names.iter().map(|s| s.as_str()).collect();

    let mut client = ScriptedClient::new().with_body(
        &format!("{BASE_URL}/pokemon?limit=1500"),
        catalog_body(&name_refs),
    );
    for name in &names {
        client = client.with_body(&detail_url(name), detail_body(50, 50, 50));
    }

    let dir = tempfile::tempdir().unwrap();
    let runner = runner_over(Arc::new(client), dir.path());

    let updates: Arc<Mutex<Vec<(usize, usize)>>> = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&updates);
    let progress: bulkdex::stats::ProgressCallback = Arc::new(move |done, total| {
        seen.lock().unwrap().push((done, total));
    });

    runner
        .run_bulk(query(50, 50, 50), Some(progress))
        .await
        .unwrap();

    let updates = updates.lock().unwrap();
    assert_eq!(*updates, vec![(10, 23), (20, 23), (23, 23)]);
}

/// Beginning a run twice supersedes the first; superseded outcome carries
/// no report, and the newest run still completes.
#[tokio::test]
async fn test_superseding_run_wins() {
    let client = Arc::new(two_species_client());
    let dir = tempfile::tempdir().unwrap();
    let runner = Arc::new(runner_over(Arc::clone(&client), dir.path()));

    // Start two runs concurrently; the one that begins last must
    // complete. The other either completes before being superseded or
    // reports Superseded, never an error.
    let first = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run_bulk(query(80, 80, 80), None).await })
    };
    let second = {
        let runner = Arc::clone(&runner);
        tokio::spawn(async move { runner.run_bulk(query(70, 70, 70), None).await })
    };

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    let completed = [&first, &second]
        .iter()
        .filter(|o| matches!(o, RunOutcome::Completed(_)))
        .count();
    assert!(completed >= 1, "at least the newest run must complete");
}
