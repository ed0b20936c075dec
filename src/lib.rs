//! # Activity Tracker
//!
//! A small toolkit around a user activity log, built on
//! [Sea-ORM](https://crates.io/crates/sea-orm) and
//! [`reqwest`](https://crates.io/crates/reqwest).
//!
//! ## Features
//!
//! - [`ActivityTracker`]: records activity rows and lets a sync process drain
//!   them in bounded batches, flagging each row `synced` exactly once
//! - [`ValidationResult`]: fetches and presents a feature's validation status
//! - [`InventorySearch`]: re-runs an inventory search on every input change,
//!   cancelling stale requests so the newest one always wins
//! - Schema migrations behind the `migration` feature (on by default)
//! - SQLite (default) or PostgreSQL through the `sqlite` / `postgres` features
//!
//! ## Quick Start
//!
//! ```no_run
//! use activity_tracker::migration::{Migrator, MigratorTrait};
//! use activity_tracker::{ActivityStore, ActivityTracker, DatabaseConfig, ExtensionInfo, NewActivity};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = DatabaseConfig::from_env().connect().await?;
//! Migrator::up(&conn, None).await?;
//!
//! let tracker = ActivityTracker::new(conn, ExtensionInfo::new("my-extension", "1.4.0"));
//! tracker
//!     .record_activity(
//!         NewActivity::new("act-1", "sess-1", "user-1", "ws-1")
//!             .with_mode("debug")
//!             .with_usage(r#"{"keystrokes": 120}"#),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Draining for Sync
//!
//! There is no cursor. A sync pass reads a batch, uploads it, and marks it;
//! only then does the next read move on.
//!
//! ```no_run
//! use activity_tracker::{ActivityStore, ActivityTracker};
//!
//! # async fn example(tracker: ActivityTracker) -> Result<(), Box<dyn std::error::Error>> {
//! loop {
//!     let batch = tracker.get_unsynced_activities(100).await?;
//!     if batch.is_empty() {
//!         break;
//!     }
//!     // upload `batch` to the aggregator here
//!     let ids: Vec<String> = batch.into_iter().map(|a| a.id).collect();
//!     tracker.mark_activities_as_synced(&ids).await?;
//! }
//! # Ok(())
//! # }
//! ```

mod activity_tracker;
pub mod config;
pub mod entity;
pub mod error;
pub mod inventory;
#[cfg(feature = "migration")]
pub mod migration;
mod store;
pub mod validation;

/// The Sea-ORM backed activity recorder.
pub use activity_tracker::ActivityTracker;

pub use config::{ClientConfig, DatabaseConfig};
pub use error::{NetworkError, PersistenceError};
pub use inventory::{
    InventoryItem, InventorySearch, InventorySearchClient, ItemId, SearchParams, SearchState,
};
pub use store::{ActivityStore, ExtensionInfo, NewActivity, DEFAULT_UNSYNCED_LIMIT};
pub use validation::{ValidationResult, ValidationStatus, ValidationStatusClient, ValidationView};

/// Row type returned by the tracker.
pub use entity::user_activity::Model as UserActivity;
