use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::debug;

use crate::entity::user_activity::{
    self, ActiveModel as ActivityActiveModel, Entity as ActivityEntity,
};
use crate::error::PersistenceError;
use crate::store::{ActivityStore, ExtensionInfo, NewActivity};

/// Largest id list sent in a single `UPDATE ... WHERE id IN (...)`.
///
/// Stays under SQLite's default bound-parameter limit.
const MARK_CHUNK_SIZE: usize = 500;

/// A Sea-ORM backed recorder for user activity.
///
/// `ActivityTracker` appends activity rows to the `user_activity` table and
/// exposes the bounded read and the mark-synced update the sync process uses
/// to drain it. It owns no global state: the database connection is passed
/// in by the caller and can be shared (it is a pool) between several trackers
/// and the sync process.
///
/// # Usage
///
/// ```no_run
/// use activity_tracker::{ActivityStore, ActivityTracker, ExtensionInfo, NewActivity};
/// use sea_orm::Database;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let conn = Database::connect("sqlite://activity.db?mode=rwc").await?;
/// let tracker = ActivityTracker::new(conn, ExtensionInfo::new("my-extension", "1.4.0"));
///
/// tracker
///     .record_activity(NewActivity::new("act-1", "sess-1", "user-1", "ws-1").with_mode("edit"))
///     .await?;
///
/// let batch = tracker.unsynced_batch().await?;
/// let ids: Vec<String> = batch.into_iter().map(|a| a.id).collect();
/// tracker.mark_activities_as_synced(&ids).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Error Handling
///
/// - Duplicate activity id → [`PersistenceError::DuplicateId`]
/// - Zero read limit → [`PersistenceError::InvalidLimit`]
/// - Anything raised by Sea-ORM → [`PersistenceError::Database`]
///
/// Nothing is retried here.
#[derive(Debug, Clone)]
pub struct ActivityTracker {
    conn: DatabaseConnection,
    extension: ExtensionInfo,
}

impl ActivityTracker {
    /// Creates a tracker over an existing connection.
    ///
    /// The schema is expected to exist already; run
    /// [`Migrator`](crate::migration::Migrator) first when it may not.
    pub fn new(conn: DatabaseConnection, extension: ExtensionInfo) -> Self {
        Self { conn, extension }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn extension(&self) -> &ExtensionInfo {
        &self.extension
    }

    /// Number of rows still waiting to be synced.
    pub async fn count_unsynced(&self) -> Result<u64, PersistenceError> {
        Ok(ActivityEntity::find()
            .filter(user_activity::Column::Synced.eq(false))
            .count(&self.conn)
            .await?)
    }

    /// Looks up one activity by id, synced or not.
    pub async fn find_activity(
        &self,
        id: &str,
    ) -> Result<Option<user_activity::Model>, PersistenceError> {
        Ok(ActivityEntity::find_by_id(id.to_string())
            .one(&self.conn)
            .await?)
    }
}

#[async_trait]
impl ActivityStore for ActivityTracker {
    /// Inserts a new activity with `synced = false`.
    ///
    /// The extension name and version come from the tracker's
    /// [`ExtensionInfo`]; the timestamp defaults to now.
    ///
    /// # Returns
    ///
    /// * `Ok(Model)` - The stored row.
    /// * `Err(PersistenceError::DuplicateId)` - A row with this id exists.
    /// * `Err(PersistenceError::Database)` - The store failed.
    async fn record_activity(
        &self,
        activity: NewActivity,
    ) -> Result<user_activity::Model, PersistenceError> {
        let id = activity.id.clone();
        let model = ActivityActiveModel {
            id: Set(activity.id),
            session_id: Set(activity.session_id),
            user_id: Set(activity.user_id),
            vscode_state: Set(activity.vscode_state),
            mode: Set(activity.mode),
            timestamp: Set(activity.timestamp.unwrap_or_else(Utc::now)),
            synced: Set(false),
            extension_name: Set(self.extension.name.clone()),
            extension_version: Set(self.extension.version.clone()),
            workspace_id: Set(activity.workspace_id),
            task_id: Set(activity.task_id),
            vs_code_usage: Set(activity.vs_code_usage),
        };

        // Single autocommit statement: the primary key decides duplicates, and
        // concurrent recorders only ever need the write lock.
        let stored = model
            .insert(&self.conn)
            .await
            .map_err(|e| PersistenceError::from_insert(e, &id))?;

        debug!(activity_id = %stored.id, session_id = %stored.session_id, "recorded activity");
        Ok(stored)
    }

    /// Returns at most `limit` unsynced rows, oldest first.
    ///
    /// Ties on `timestamp` are broken by `id`, so repeated calls without an
    /// intervening mark return the same rows in the same order.
    async fn get_unsynced_activities(
        &self,
        limit: u64,
    ) -> Result<Vec<user_activity::Model>, PersistenceError> {
        if limit == 0 {
            return Err(PersistenceError::InvalidLimit);
        }

        let rows = ActivityEntity::find()
            .filter(user_activity::Column::Synced.eq(false))
            .order_by_asc(user_activity::Column::Timestamp)
            .order_by_asc(user_activity::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await?;

        debug!(limit, returned = rows.len(), "fetched unsynced activities");
        Ok(rows)
    }

    /// Sets `synced = true` on the given ids in one transaction.
    ///
    /// Only rows that are currently unsynced are touched, so the returned
    /// count drops to zero when the same id set is applied again.
    async fn mark_activities_as_synced(&self, ids: &[String]) -> Result<u64, PersistenceError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let txn = self.conn.begin().await?;
        let mut updated = 0;

        for chunk in ids.chunks(MARK_CHUNK_SIZE) {
            let result = ActivityEntity::update_many()
                .col_expr(user_activity::Column::Synced, Expr::value(true))
                .filter(user_activity::Column::Id.is_in(chunk.iter().cloned()))
                .filter(user_activity::Column::Synced.eq(false))
                .exec(&txn)
                .await?;
            updated += result.rows_affected;
        }

        txn.commit().await?;

        debug!(requested = ids.len(), updated, "marked activities as synced");
        Ok(updated)
    }
}
