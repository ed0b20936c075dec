//! Schema migrations for the activity tracker.
//!
//! ```no_run
//! use activity_tracker::migration::{Migrator, MigratorTrait};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Database::connect("sqlite://activity.db?mode=rwc").await?;
//! Migrator::up(&conn, None).await?;
//! # Ok(())
//! # }
//! ```

pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_user_activity_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    // Keep our bookkeeping apart from a host application's own migrator
    fn migration_table_name() -> sea_orm::DynIden {
        Alias::new("activity_tracker_migrations").into_iden()
    }

    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_user_activity_table::Migration)]
    }
}
