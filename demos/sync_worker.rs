//! Sync worker demo for activity-tracker
//!
//! Records a few activities and drains them the way a sync process would:
//! read a batch, hand it to the aggregator, mark it synced, repeat.
//!
//! # Running the demo
//!
//! ```bash
//! export ACTIVITY_DATABASE_URL="sqlite://activity-demo.db?mode=rwc"
//! RUST_LOG=debug cargo run --example sync_worker
//! ```

use activity_tracker::migration::{Migrator, MigratorTrait};
use activity_tracker::{
    ActivityStore, ActivityTracker, DatabaseConfig, ExtensionInfo, NewActivity, UserActivity,
};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const BATCH_SIZE: u64 = 2;

/// Stand-in for the remote aggregator: prints the payload it would send.
fn upload(batch: &[UserActivity]) -> Result<(), serde_json::Error> {
    let payload = serde_json::to_string(batch)?;
    info!(rows = batch.len(), bytes = payload.len(), "uploaded batch");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    let config = DatabaseConfig::from_env();
    let conn = config.connect().await?;
    Migrator::up(&conn, None).await?;

    let tracker = ActivityTracker::new(conn, ExtensionInfo::new("sync-worker-demo", "0.1.0"));

    let session = format!("sess-{}", chrono::Utc::now().timestamp());
    for (i, mode) in ["edit", "debug", "review"].into_iter().enumerate() {
        tracker
            .record_activity(
                NewActivity::new(format!("{session}-{i}"), &session, "demo-user", "demo-ws")
                    .with_mode(mode)
                    .with_usage(format!(r#"{{"step":{i}}}"#)),
            )
            .await?;
    }
    info!(pending = tracker.count_unsynced().await?, "recorded activities");

    loop {
        let batch = tracker.get_unsynced_activities(BATCH_SIZE).await?;
        if batch.is_empty() {
            break;
        }
        upload(&batch)?;

        let ids: Vec<String> = batch.into_iter().map(|a| a.id).collect();
        let marked = tracker.mark_activities_as_synced(&ids).await?;
        info!(marked, "marked batch synced");
    }

    info!("all activities synced");
    Ok(())
}
