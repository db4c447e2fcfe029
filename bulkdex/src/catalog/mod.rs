//! Species catalog: the list of every entity the matcher can compare against.
//!
//! The catalog is one remote document mapping species names to their
//! detail URLs. It is fetched at most once per durable-cache lifetime:
//! a durable copy short-circuits the network entirely, and within a
//! process the parsed list is loaded once and shared.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::fetch::{AsyncHttpClient, FetchError, FetchPolicy, RetryingFetcher};
use crate::store::KeyValueStore;

/// Durable store key holding the serialized catalog.
pub const CATALOG_KEY: &str = "catalog";

/// Default number of entries requested from the catalog endpoint.
pub const DEFAULT_CATALOG_LIMIT: u32 = 1500;

/// Default base URL of the remote API.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// One catalog entry: a species name and where to fetch its detail.
///
/// Immutable once loaded; the name is the unique key for everything
/// downstream (store keys, match results).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRef {
    /// Unique lowercase-hyphenated species name (e.g. `"mr-mime"`).
    pub name: String,
    /// Absolute URL of the species' detail document.
    pub url: String,
}

/// Renders a catalog name for display: first letter uppercased, hyphens
/// replaced by spaces (`"mr-mime"` becomes `"Mr mime"`).
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().replace('-', " "),
        None => String::new(),
    }
}

/// Errors that make a catalog unusable.
///
/// Unlike per-species failures, these are fatal to a query run: with no
/// catalog there is nothing to compare against.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog endpoint could not be fetched.
    #[error("catalog fetch failed")]
    Fetch(#[from] FetchError),

    /// The freshly fetched catalog document did not parse.
    #[error("malformed catalog response")]
    Parse(#[from] serde_json::Error),
}

/// Wire shape of the catalog endpoint.
#[derive(Deserialize)]
struct CatalogResponse {
    results: Vec<SpeciesRef>,
}

/// Loads the species catalog, durable-cache-aside.
///
/// Lookup order: in-process copy, then durable store, then network (with
/// the generous catalog retry policy). A durable copy that fails to parse
/// is treated as a miss and refetched; it is never fatal.
pub struct CatalogLoader<C: AsyncHttpClient> {
    fetcher: Arc<RetryingFetcher<C>>,
    durable: Arc<dyn KeyValueStore>,
    base_url: String,
    limit: u32,
    policy: FetchPolicy,
    loaded: OnceCell<Arc<Vec<SpeciesRef>>>,
}

impl<C: AsyncHttpClient> CatalogLoader<C> {
    /// Creates a loader over the given fetcher and durable store.
    pub fn new(
        fetcher: Arc<RetryingFetcher<C>>,
        durable: Arc<dyn KeyValueStore>,
        base_url: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            fetcher,
            durable,
            base_url: base_url.into(),
            limit,
            policy: FetchPolicy::catalog(),
            loaded: OnceCell::new(),
        }
    }

    /// Overrides the catalog retry policy.
    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the full species list, loading it on first use.
    ///
    /// Subsequent calls within the same process return the same shared
    /// list without touching the store or the network.
    pub async fn load(&self) -> Result<Arc<Vec<SpeciesRef>>, CatalogError> {
        self.loaded
            .get_or_try_init(|| self.load_uncached())
            .await
            .cloned()
    }

    async fn load_uncached(&self) -> Result<Arc<Vec<SpeciesRef>>, CatalogError> {
        match self.durable.get(CATALOG_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<SpeciesRef>>(&bytes) {
                Ok(refs) => {
                    info!(species = refs.len(), "loaded catalog from durable store");
                    return Ok(Arc::new(refs));
                }
                Err(error) => {
                    warn!(%error, "stored catalog unreadable, refetching");
                }
            },
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "durable catalog read failed, refetching");
            }
        }

        let url = format!("{}/pokemon?limit={}", self.base_url, self.limit);
        let body = self.fetcher.fetch(&url, self.policy).await?;
        let parsed: CatalogResponse = serde_json::from_slice(&body)?;
        let refs = parsed.results;
        info!(species = refs.len(), "fetched catalog from network");

        match serde_json::to_vec(&refs) {
            Ok(bytes) => {
                if let Err(error) = self.durable.set(CATALOG_KEY, bytes).await {
                    warn!(%error, "failed to persist catalog");
                }
            }
            Err(error) => warn!(%error, "failed to serialize catalog"),
        }

        Ok(Arc::new(refs))
    }
}
