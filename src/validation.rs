//! Feature validation status client and its view model.
//!
//! Wraps `GET /api/validation/status?feature=<name>` and maps the outcome to
//! one of four view states: loading, error, or one of the three statuses.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ensure_success, NetworkError};

/// Text shown when the status could not be fetched.
pub const FETCH_STATUS_FAILED: &str = "Failed to fetch status";

const STATUS_PATH: &str = "/api/validation/status";

/// Outcome of an external check for a named feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationStatus {
    Pass,
    Fail,
    Incomplete,
}

impl ValidationStatus {
    /// Lenient wire mapping: anything but `Pass` or `Fail` is `Incomplete`.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("Pass") => Self::Pass,
            Some("Fail") => Self::Fail,
            _ => Self::Incomplete,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "Pass",
            Self::Fail => "Fail",
            Self::Incomplete => "Incomplete",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    // Kept loose so unexpected values degrade to `Incomplete` instead of a decode error
    #[serde(default)]
    status: Option<serde_json::Value>,
}

/// HTTP client for the validation status endpoint.
#[derive(Debug, Clone)]
pub struct ValidationStatusClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ValidationStatusClient {
    pub fn new(config: ClientConfig) -> Result<Self, NetworkError> {
        Ok(Self {
            client: config.build_client()?,
            config,
        })
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the status of one feature.
    ///
    /// A missing or unknown `status` value yields
    /// [`ValidationStatus::Incomplete`]; a non-2xx answer (the server sends 404
    /// for features it does not know) is an error.
    pub async fn fetch_status(&self, feature: &str) -> Result<ValidationStatus, NetworkError> {
        debug!(feature, "fetching validation status");

        let response = self
            .client
            .get(self.config.endpoint(STATUS_PATH))
            .query(&[("feature", feature)])
            .send()
            .await?;

        let body: StatusResponse = ensure_success(response).await?.json().await?;
        let status = ValidationStatus::from_wire(
            body.status.as_ref().and_then(serde_json::Value::as_str),
        );
        Ok(status)
    }
}

/// What the status indicator shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationView {
    Loading,
    /// Fixed, user-facing message; the underlying error is only logged.
    Error(String),
    Ready(ValidationStatus),
}

impl ValidationView {
    /// Label displayed by the indicator.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "Loading...",
            Self::Error(_) => "Status unavailable",
            Self::Ready(status) => status.as_str(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// View model for a single feature's validation result.
///
/// Fetches once per distinct feature name. Showing the same feature again
/// keeps the last result; there is no retry and no cache across names.
#[derive(Debug)]
pub struct ValidationResult {
    client: ValidationStatusClient,
    feature: Option<String>,
    view: ValidationView,
}

impl ValidationResult {
    pub fn new(client: ValidationStatusClient) -> Self {
        Self {
            client,
            feature: None,
            view: ValidationView::Loading,
        }
    }

    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    pub fn view(&self) -> &ValidationView {
        &self.view
    }

    /// Title shown above the indicator.
    pub fn heading(&self) -> String {
        format!("{} Validation", self.feature.as_deref().unwrap_or_default())
    }

    /// Switch to `feature`, fetching its status if it differs from the
    /// current one.
    ///
    /// The view is `Loading` for the duration of the request. If a previous
    /// call was dropped before its fetch finished, the same feature is
    /// fetched again.
    pub async fn show(&mut self, feature: &str) -> &ValidationView {
        if self.feature.as_deref() == Some(feature) && !self.view.is_loading() {
            return &self.view;
        }

        self.feature = Some(feature.to_string());
        self.view = ValidationView::Loading;

        self.view = match self.client.fetch_status(feature).await {
            Ok(status) => ValidationView::Ready(status),
            Err(err) => {
                warn!(feature, error = %err, "validation status fetch failed");
                ValidationView::Error(FETCH_STATUS_FAILED.to_string())
            }
        };
        &self.view
    }
}
