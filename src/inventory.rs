//! Inventory search client and its view model.
//!
//! [`InventorySearchClient`] is a thin wrapper over
//! `GET /api/inventory/search`. [`InventorySearch`] re-runs the search on
//! every change to the query or a filter and guarantees that only the newest
//! request can update the displayed results: each trigger cancels the request
//! still in flight before issuing its own.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ensure_success, NetworkError};

/// Text shown when a search request fails.
pub const FETCH_RESULTS_FAILED: &str = "Failed to fetch inventory results";

const SEARCH_PATH: &str = "/api/inventory/search";

/// Server-assigned item identifier, numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// One row of the search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub name: String,
    pub category: String,
    pub stock_status: String,
}

/// Query string of a search request. Unset filters mean "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub q: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<InventoryItem>,
}

/// HTTP client for the inventory search endpoint.
#[derive(Debug, Clone)]
pub struct InventorySearchClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl InventorySearchClient {
    pub fn new(config: ClientConfig) -> Result<Self, NetworkError> {
        Ok(Self {
            client: config.build_client()?,
            config,
        })
    }

    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Run one search. Filtering and ranking happen server-side.
    pub async fn search(&self, params: &SearchParams) -> Result<Vec<InventoryItem>, NetworkError> {
        let response = self
            .client
            .get(self.config.endpoint(SEARCH_PATH))
            .query(params)
            .send()
            .await?;

        let body: SearchResponse = ensure_success(response).await?.json().await?;
        Ok(body.results)
    }
}

/// Snapshot of what the search view displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub results: Vec<InventoryItem>,
    pub loading: bool,
    /// Fixed, user-facing message of the last failed request.
    pub error: Option<String>,
}

struct InFlight {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// View model re-running the search whenever its inputs change.
///
/// State updates are published on a [`watch`] channel. Must be used from
/// within a Tokio runtime, since every trigger spawns its request.
pub struct InventorySearch {
    client: Arc<InventorySearchClient>,
    params: SearchParams,
    debounce: Duration,
    generation: Arc<AtomicU64>,
    in_flight: Option<InFlight>,
    state: Arc<watch::Sender<SearchState>>,
}

impl InventorySearch {
    pub fn new(client: InventorySearchClient) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            client: Arc::new(client),
            params: SearchParams::default(),
            debounce: Duration::ZERO,
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: None,
            state: Arc::new(state),
        }
    }

    /// Wait this long after a change before sending the request. A change
    /// arriving during the wait replaces the pending request.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Initial search with the current (empty) inputs.
    pub fn mount(&mut self) {
        self.trigger();
    }

    pub fn set_query(&mut self, q: impl Into<String>) {
        let q = q.into();
        if self.params.q != q {
            self.params.q = q;
            self.trigger();
        }
    }

    /// `None` or an empty string selects all categories.
    pub fn set_category(&mut self, category: Option<String>) {
        let category = category.filter(|c| !c.is_empty());
        if self.params.category != category {
            self.params.category = category;
            self.trigger();
        }
    }

    /// `None` or an empty string selects every stock status.
    pub fn set_stock_status(&mut self, stock_status: Option<String>) {
        let stock_status = stock_status.filter(|s| !s.is_empty());
        if self.params.stock_status != stock_status {
            self.params.stock_status = stock_status;
            self.trigger();
        }
    }

    /// Wait for the newest request to finish (or be cancelled).
    pub async fn settle(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if let Err(err) = in_flight.handle.await {
                warn!(error = %err, "inventory search task failed");
            }
        }
    }

    fn trigger(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel.cancel();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let cancel = CancellationToken::new();
        let task = SearchTask {
            client: Arc::clone(&self.client),
            params: self.params.clone(),
            debounce: self.debounce,
            generation,
            latest: Arc::clone(&self.generation),
            state: Arc::clone(&self.state),
            cancel: cancel.clone(),
        };
        let handle = tokio::spawn(task.run());

        self.in_flight = Some(InFlight { cancel, handle });
    }
}

impl Drop for InventorySearch {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
    }
}

struct SearchTask {
    client: Arc<InventorySearchClient>,
    params: SearchParams,
    debounce: Duration,
    generation: u64,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<SearchState>>,
    cancel: CancellationToken,
}

impl SearchTask {
    async fn run(self) {
        if !self.debounce.is_zero() {
            tokio::select! {
                _ = self.cancel.cancelled() => return,
                _ = tokio::time::sleep(self.debounce) => {}
            }
        }

        debug!(generation = self.generation, params = ?self.params, "searching inventory");

        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!(generation = self.generation, "inventory search superseded");
                return;
            }
            outcome = self.client.search(&self.params) => outcome,
        };

        if let Err(err) = &outcome {
            warn!(generation = self.generation, error = %err, "inventory search failed");
        }

        // The check runs under the channel's write lock; a newer trigger
        // either bumps the generation first (and this write is dropped) or
        // publishes after it.
        self.state.send_if_modified(|s| {
            if self.latest.load(Ordering::SeqCst) != self.generation {
                return false;
            }
            s.loading = false;
            match outcome {
                Ok(results) => s.results = results,
                Err(_) => s.error = Some(FETCH_RESULTS_FAILED.to_string()),
            }
            true
        });
    }
}
