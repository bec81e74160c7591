//! # moodcanvas-core
//!
//! Core types, traits, and abstractions for the moodcanvas mood engine.
//!
//! This crate provides the foundational data structures (content entries,
//! corpus snapshots, history records), the session streak counter, and the
//! trait definitions for the external collaborators (content store, image
//! resolver, history persistence, popularity mutator) that other moodcanvas
//! crates depend on.

pub mod config;
pub mod corpus;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod streak;
pub mod tags;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::EngineConfig;
pub use corpus::ContentCorpus;
pub use error::{Error, Result};
pub use models::*;
pub use streak::SessionStreakCounter;
pub use tags::{meaningful_len, normalize_tag, normalize_tags};
pub use traits::*;
