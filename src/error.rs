//! Error types surfaced by the tracker and the HTTP clients.

use sea_orm::{DbErr, SqlErr};

/// Failure of a store operation.
///
/// The tracker never retries; every variant is handed back to the caller
/// (normally the sync process) as-is.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// The store rejected the insert because an activity with this id exists.
    #[error("activity `{0}` already exists")]
    DuplicateId(String),

    /// `get_unsynced_activities` was called with a zero limit.
    #[error("unsynced activity limit must be positive")]
    InvalidLimit,

    /// Any other store failure (connection loss, bad schema, ...).
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl PersistenceError {
    /// Map an insert failure, recognising primary-key collisions.
    pub(crate) fn from_insert(err: DbErr, id: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::DuplicateId(id.to_string()),
            _ => Self::Database(err),
        }
    }
}

/// Failure of a request to one of the remote endpoints.
///
/// View models never show this to the user; they log it and display a fixed
/// message instead.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// The HTTP request itself failed (connect, timeout, TLS, body decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("API error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl NetworkError {
    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Turn a non-2xx response into [`NetworkError::Status`].
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, NetworkError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(NetworkError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}
