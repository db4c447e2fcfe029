//! Query runs: cancellation ownership and the end-to-end pipeline.
//!
//! At most one run is active at a time. Beginning a run atomically
//! cancels the previous one and installs a fresh token; every stage of
//! the pipeline observes its own token and stops producing output once
//! superseded. Cancellation never unwinds committed state: cache entries
//! written before the token flipped stay valid.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::catalog::{CatalogError, CatalogLoader};
use crate::fetch::{AsyncHttpClient, ConcurrencyLimiter};
use crate::stats::formula::{derive_build, BuildKind, StatProfile};
use crate::stats::matcher::{closest_match, BuildMatch};
use crate::stats::{ProgressCallback, StatsCache};

/// Cancellation handle for one run.
///
/// Cheap to clone; all clones observe the same cancellation.
#[derive(Clone, Debug)]
pub struct RunToken {
    token: CancellationToken,
}

impl RunToken {
    fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Whether this run has been superseded.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancels this run.
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

/// Owns the active run's token and replaces it on each new run.
#[derive(Debug, Default)]
pub struct RunController {
    current: std::sync::Mutex<Option<RunToken>>,
}

impl RunController {
    /// Creates a controller with no active run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new run, cancelling the previous one.
    ///
    /// The swap happens under one lock, so no window exists where two
    /// runs are both uncancelled.
    pub fn begin(&self) -> RunToken {
        let fresh = RunToken::new();
        let mut current = self.current.lock().expect("run controller lock poisoned");
        if let Some(previous) = current.replace(fresh.clone()) {
            debug!("superseding active run");
            previous.cancel();
        }
        fresh
    }
}

/// Errors that abort a query run.
///
/// Per-species failures never appear here; they shrink the dataset
/// inside the stats cache instead.
#[derive(Debug, Error)]
pub enum RunError {
    /// The catalog could not be loaded; there is nothing to query.
    #[error("catalog load failed")]
    Catalog(#[from] CatalogError),
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome<T> {
    /// The run finished and produced a report.
    Completed(T),
    /// A newer run superseded this one; no output was produced.
    /// This is not a failure.
    Superseded,
}

impl<T> RunOutcome<T> {
    /// The report, if the run completed.
    pub fn completed(self) -> Option<T> {
        match self {
            RunOutcome::Completed(report) => Some(report),
            RunOutcome::Superseded => None,
        }
    }
}

/// A bulk similarity query: the three defensive base values.
#[derive(Debug, Clone, Copy)]
pub struct BulkQuery {
    /// The queried stat profile.
    pub profile: StatProfile,
}

/// Full result of a bulk query: one match per build scenario.
#[derive(Debug)]
pub struct BulkReport {
    /// Match results in [`BuildKind::ALL`] order.
    pub builds: Vec<BuildMatch>,
    /// Number of species records the scan could use.
    pub records_available: usize,
    /// Total species in the catalog.
    pub catalog_size: usize,
}

/// Drives the catalog -> cache fill -> match pipeline for bulk queries.
pub struct QueryRunner<C: AsyncHttpClient> {
    catalog: CatalogLoader<C>,
    stats: StatsCache<C>,
    limiter: ConcurrencyLimiter,
    controller: RunController,
}

impl<C: AsyncHttpClient> QueryRunner<C> {
    /// Assembles a runner from its parts.
    pub fn new(
        catalog: CatalogLoader<C>,
        stats: StatsCache<C>,
        limiter: ConcurrencyLimiter,
    ) -> Self {
        Self {
            catalog,
            stats,
            limiter,
            controller: RunController::new(),
        }
    }

    /// The stats cache backing this runner.
    pub fn stats(&self) -> &StatsCache<C> {
        &self.stats
    }

    /// Runs one bulk query end to end.
    ///
    /// Supersedes any run still in flight. Catalog failure is fatal;
    /// everything after it degrades gracefully (missing species are
    /// skipped, cancellation yields [`RunOutcome::Superseded`]).
    pub async fn run_bulk(
        &self,
        query: BulkQuery,
        progress: Option<ProgressCallback>,
    ) -> Result<RunOutcome<BulkReport>, RunError> {
        let run = self.controller.begin();

        let refs = self.catalog.load().await?;

        self.stats
            .fill_missing(&refs, &self.limiter, &run, progress)
            .await;
        if run.is_cancelled() {
            return Ok(RunOutcome::Superseded);
        }

        // Scan against a settled snapshot: cache layers only, no fetches.
        let mut records = Vec::with_capacity(refs.len());
        for species in refs.iter() {
            if run.is_cancelled() {
                return Ok(RunOutcome::Superseded);
            }
            if let Some(stats) = self.stats.lookup_cached(species).await {
                records.push(stats);
            }
        }

        let mut builds = Vec::with_capacity(BuildKind::ALL.len());
        for kind in BuildKind::ALL {
            if run.is_cancelled() {
                return Ok(RunOutcome::Superseded);
            }
            let build = derive_build(kind, query.profile);
            builds.push(closest_match(&build, &records));
        }

        info!(
            records = records.len(),
            catalog = refs.len(),
            "bulk query completed"
        );

        Ok(RunOutcome::Completed(BulkReport {
            builds,
            records_available: records.len(),
            catalog_size: refs.len(),
        }))
    }
}

impl QueryRunner<crate::fetch::ReqwestClient> {
    /// Assembles a production runner from a configuration file: reqwest
    /// client, durable disk store, moka memory layer, and the configured
    /// retry policies and concurrency.
    pub fn from_config(config: &crate::config::ConfigFile) -> Result<Self, crate::fetch::FetchError> {
        use crate::fetch::{ReqwestClient, RetryingFetcher};
        use crate::store::{DiskStore, KeyValueStore, MemoryStore};

        let client =
            ReqwestClient::with_timeout(std::time::Duration::from_secs(config.api.timeout_secs))?;
        let fetcher = Arc::new(RetryingFetcher::new(client));

        let durable: Arc<dyn KeyValueStore> =
            Arc::new(DiskStore::new(config.cache.directory.clone()));
        let memory: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::new(config.cache.memory_size));

        let catalog = CatalogLoader::new(
            Arc::clone(&fetcher),
            Arc::clone(&durable),
            config.api.base_url.clone(),
            config.api.catalog_limit,
        )
        .with_policy(config.download.catalog_policy());

        let stats = StatsCache::new(fetcher, memory, durable)
            .with_detail_policy(config.download.detail_policy());

        Ok(Self::new(
            catalog,
            stats,
            ConcurrencyLimiter::new(config.download.concurrency),
        ))
    }
}
