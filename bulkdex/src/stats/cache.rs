//! Cache-aside store of per-species base stats.
//!
//! The cache owns the record set: it is the only writer to either
//! storage layer, and every reader goes through its lookup methods.
//! Lookup order is memory, then durable store (promoting hits into
//! memory), then network. A fetch or parse failure is absorbed here:
//! the species yields `None`, the run continues with a smaller dataset,
//! and already-committed entries are untouched.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, info, warn};

use crate::catalog::SpeciesRef;
use crate::fetch::{AsyncHttpClient, ConcurrencyLimiter, FetchPolicy, RetryingFetcher};
use crate::run::RunToken;
use crate::store::KeyValueStore;

use super::{parse_detail, BaseStats};

/// Progress is reported after every `PROGRESS_STRIDE` completed fetches
/// (and always on the final one), not per item.
pub const PROGRESS_STRIDE: usize = 10;

/// Callback receiving `(completed, total)` fill progress.
pub type ProgressCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Layered base-stat cache: memory in front of a durable store in front
/// of the network.
pub struct StatsCache<C: AsyncHttpClient> {
    fetcher: Arc<RetryingFetcher<C>>,
    memory: Arc<dyn KeyValueStore>,
    durable: Arc<dyn KeyValueStore>,
    detail_policy: FetchPolicy,
}

impl<C: AsyncHttpClient> StatsCache<C> {
    /// Creates a cache over the given layers.
    pub fn new(
        fetcher: Arc<RetryingFetcher<C>>,
        memory: Arc<dyn KeyValueStore>,
        durable: Arc<dyn KeyValueStore>,
    ) -> Self {
        Self {
            fetcher,
            memory,
            durable,
            detail_policy: FetchPolicy::detail(),
        }
    }

    /// Overrides the detail-fetch retry policy.
    pub fn with_detail_policy(mut self, policy: FetchPolicy) -> Self {
        self.detail_policy = policy;
        self
    }

    /// Returns the species' record, fetching it if no layer has it.
    ///
    /// `None` means the record is unavailable for this run: the fetch
    /// was exhausted or the response did not parse. Both cases are
    /// logged and absorbed; the caller skips the species.
    pub async fn get(&self, species: &SpeciesRef) -> Option<BaseStats> {
        if let Some(stats) = self.lookup_cached(species).await {
            return Some(stats);
        }

        let body = match self.fetcher.fetch(&species.url, self.detail_policy).await {
            Ok(body) => body,
            Err(error) => {
                warn!(species = %species.name, %error, "stats fetch failed, skipping");
                return None;
            }
        };

        let stats = match parse_detail(&species.name, &body) {
            Ok(stats) => stats,
            Err(error) => {
                warn!(species = %species.name, %error, "stats response unusable, skipping");
                return None;
            }
        };

        let key = BaseStats::store_key(&species.name);
        match serde_json::to_vec(&stats) {
            Ok(bytes) => {
                if let Err(error) = self.durable.set(&key, bytes.clone()).await {
                    warn!(species = %species.name, %error, "failed to persist stats");
                }
                if let Err(error) = self.memory.set(&key, bytes).await {
                    warn!(species = %species.name, %error, "failed to cache stats in memory");
                }
            }
            Err(error) => warn!(species = %species.name, %error, "failed to serialize stats"),
        }

        Some(stats)
    }

    /// Returns the species' record if a storage layer already has it.
    ///
    /// Never touches the network; the scan path uses this so a missing
    /// record is skipped rather than fetched mid-scan. An unreadable
    /// stored value is a miss.
    pub async fn lookup_cached(&self, species: &SpeciesRef) -> Option<BaseStats> {
        let key = BaseStats::store_key(&species.name);

        if let Ok(Some(bytes)) = self.memory.get(&key).await {
            if let Ok(stats) = serde_json::from_slice(&bytes) {
                return Some(stats);
            }
        }

        match self.durable.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<BaseStats>(&bytes) {
                Ok(stats) => {
                    if let Err(error) = self.memory.set(&key, bytes).await {
                        warn!(species = %species.name, %error, "failed to promote stats to memory");
                    }
                    Some(stats)
                }
                Err(error) => {
                    warn!(species = %species.name, %error, "stored stats unreadable, treating as miss");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(species = %species.name, %error, "durable stats read failed, treating as miss");
                None
            }
        }
    }

    /// Fetches every species that has no durable record yet.
    ///
    /// Fetches run through `limiter`, so at most its cap are in flight.
    /// Progress is reported through `progress` every [`PROGRESS_STRIDE`]
    /// completions and on the final one. Cancelling `run` stops work
    /// from starting; fetches already in flight finish and their records
    /// are kept (partial fills are valid, entries are independent).
    pub async fn fill_missing(
        &self,
        refs: &[SpeciesRef],
        limiter: &ConcurrencyLimiter,
        run: &RunToken,
        progress: Option<ProgressCallback>,
    ) {
        let mut to_fetch = Vec::new();
        for species in refs {
            let key = BaseStats::store_key(&species.name);
            if !self.durable.contains(&key).await.unwrap_or(false) {
                to_fetch.push(species);
            }
        }

        let total = to_fetch.len();
        if total == 0 {
            debug!("all species already cached");
            return;
        }
        info!(missing = total, "filling stats cache");

        let done = AtomicUsize::new(0);
        let mut fills = FuturesUnordered::new();
        for species in to_fetch {
            let done = &done;
            let progress = progress.clone();
            fills.push(limiter.run(async move {
                if run.is_cancelled() {
                    return;
                }
                let _ = self.get(species).await;
                let completed = done.fetch_add(1, Ordering::SeqCst) + 1;
                if completed % PROGRESS_STRIDE == 0 || completed == total {
                    if let Some(progress) = &progress {
                        progress(completed, total);
                    }
                }
            }));
        }

        while fills.next().await.is_some() {}

        if run.is_cancelled() {
            debug!(
                completed = done.load(Ordering::SeqCst),
                total, "fill cancelled"
            );
        }
    }
}
