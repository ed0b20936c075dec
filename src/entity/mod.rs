//! Database entity models for the activity tracker.
//!
//! The only persisted entity is [`user_activity`], the append-mostly log the
//! tracker writes and the sync process drains.

/// User activity entity model.
pub mod user_activity;
