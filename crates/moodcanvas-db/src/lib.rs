//! # moodcanvas-db
//!
//! Storage layer for moodcanvas.
//!
//! This crate provides:
//! - The bounded, newest-first [`HistoryLedger`]
//! - In-memory content and history stores
//! - A JSON-file history store for local, anonymous history
//! - The built-in seed corpus
//! - A public-bucket image URL resolver
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use moodcanvas_db::{HistoryLedger, JsonFileHistoryStore};
//! use moodcanvas_core::OwnerScope;
//!
//! let store = Arc::new(JsonFileHistoryStore::new("history.json"));
//! let mut ledger = HistoryLedger::load(store, OwnerScope::Local, 30).await?;
//! for record in ledger.list() {
//!     println!("{} -> {}", record.query_text, record.resolved_quote);
//! }
//! ```
pub mod image_urls;
pub mod json_file;
pub mod ledger;
pub mod memory;
pub mod seed;

// Test fixtures for integration tests
// Note: Always compiled so other crates' tests can build corpora the same way
pub mod test_fixtures;

// Re-export core types
pub use moodcanvas_core::*;

pub use image_urls::PublicUrlResolver;
pub use json_file::JsonFileHistoryStore;
pub use ledger::HistoryLedger;
pub use memory::{MemoryContentStore, MemoryHistoryStore};
pub use seed::seed_entries;
