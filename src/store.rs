//! The storage-facing contract of the activity tracker.
//!
//! The sync process is written against [`ActivityStore`] rather than a
//! concrete backend, so it can be driven by [`ActivityTracker`](crate::ActivityTracker)
//! in production and by any other implementation in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::user_activity;
use crate::error::PersistenceError;

/// Batch size used by [`ActivityStore::unsynced_batch`].
pub const DEFAULT_UNSYNCED_LIMIT: u64 = 500;

/// Identity of the tool producing activities.
///
/// Stamped onto every recorded row by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionInfo {
    pub name: String,
    pub version: String,
}

impl ExtensionInfo {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

/// An activity as submitted by the producing tool.
///
/// `synced` and the extension columns are not part of the input; the tracker
/// fills them in. When `timestamp` is `None` the insert time is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub workspace_id: String,
    pub vscode_state: String,
    pub mode: String,
    pub task_id: Option<String>,
    pub vs_code_usage: String,
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewActivity {
    /// Start an activity with its identifiers; the payload fields are empty.
    pub fn new(
        id: impl Into<String>,
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            workspace_id: workspace_id.into(),
            vscode_state: String::new(),
            mode: String::new(),
            task_id: None,
            vs_code_usage: String::new(),
            timestamp: None,
        }
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_vscode_state(mut self, state: impl Into<String>) -> Self {
        self.vscode_state = state.into();
        self
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.vs_code_usage = usage.into();
        self
    }

    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Persistence operations needed by activity producers and the sync process.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Insert a new, unsynced activity and return the stored row.
    async fn record_activity(
        &self,
        activity: NewActivity,
    ) -> Result<user_activity::Model, PersistenceError>;

    /// Up to `limit` unsynced rows in a stable order.
    ///
    /// There is no cursor: the same rows come back until they are marked
    /// synced.
    async fn get_unsynced_activities(
        &self,
        limit: u64,
    ) -> Result<Vec<user_activity::Model>, PersistenceError>;

    /// Flag the given ids as synced, returning how many rows changed.
    ///
    /// Unknown and already-synced ids are ignored.
    async fn mark_activities_as_synced(&self, ids: &[String]) -> Result<u64, PersistenceError>;

    /// [`get_unsynced_activities`](Self::get_unsynced_activities) with
    /// [`DEFAULT_UNSYNCED_LIMIT`].
    async fn unsynced_batch(&self) -> Result<Vec<user_activity::Model>, PersistenceError> {
        self.get_unsynced_activities(DEFAULT_UNSYNCED_LIMIT).await
    }
}
