#![forbid(unsafe_code)]

//! Core domain model and business logic for the Gaindalf workout tracker.
//!
//! This crate provides:
//! - Domain types (muscle groups, lifts, workouts, sets)
//! - The entity store and its file-backed persistence
//! - Lift suggestion engine
//! - Progression indexes and CSV export

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod store;
pub mod history;
pub mod engine;
pub mod progression;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::{Database, EntityStore, FileStore};
pub use store::catalog::LiftUpdate;
pub use store::journal::SetUpdate;
pub use engine::{suggest, CandidateFilter, Suggestion};
pub use progression::{indexes_for_all_workouts, indexes_for_lift, indexes_for_workout};
pub use export::write_indexes_csv;
