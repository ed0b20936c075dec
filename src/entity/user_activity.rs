//! User activity entity model for Sea-ORM database interaction.
//!
//! Defines the `user_activity` table the [`ActivityTracker`](crate::ActivityTracker)
//! appends to and the sync process drains.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity model representing one recorded activity.
///
/// # Database Schema
///
/// | Column            | Type               | Description                                |
/// |-------------------|--------------------|--------------------------------------------|
/// | id                | TEXT (Primary Key) | Caller-supplied activity identifier        |
/// | session_id        | TEXT               | Groups activities within one user session  |
/// | user_id           | TEXT               | Owning user                                |
/// | vscode_state      | TEXT               | Serialized editor state snapshot           |
/// | mode              | TEXT               | Operating mode label                       |
/// | timestamp         | TIMESTAMP          | Creation time (UTC)                        |
/// | synced            | BOOLEAN            | Uploaded to the remote aggregator          |
/// | extension_name    | TEXT               | Name of the producing tool                 |
/// | extension_version | TEXT               | Version of the producing tool              |
/// | workspace_id      | TEXT               | Workspace context                          |
/// | task_id           | TEXT NULL          | Optional associated task                   |
/// | vs_code_usage     | TEXT               | Free-form usage payload                    |
///
/// Rows are never updated except for `synced`, which only moves from
/// `false` to `true`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub vscode_state: String,
    pub mode: String,
    pub timestamp: DateTimeUtc,
    pub synced: bool,
    pub extension_name: String,
    pub extension_version: String,
    pub workspace_id: String,
    #[sea_orm(nullable)]
    pub task_id: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub vs_code_usage: String,
}

/// This entity has no relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
