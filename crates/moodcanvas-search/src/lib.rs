//! # moodcanvas-search
//!
//! Mood resolution and inspiration engine for moodcanvas.
//!
//! This crate provides:
//! - Exact and fuzzy tag matching of free-text mood queries
//! - Tiered resolution to exactly one entry (exact, fuzzy, random fallback)
//! - Popularity-biased and history-personalized inspiration
//! - Related-quote discovery by shared keywords
//! - The [`MoodSession`] pipeline tying resolution to history and streaks
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use moodcanvas_search::{EngineConfig, MoodSession, OwnerScope};
//! use moodcanvas_db::{MemoryContentStore, MemoryHistoryStore, PublicUrlResolver};
//!
//! let session = MoodSession::new(
//!     EngineConfig::from_env(),
//!     Arc::new(MemoryContentStore::seeded()),
//!     Arc::new(PublicUrlResolver::new("https://cdn.example.com", "mood_images")),
//!     Arc::new(MemoryHistoryStore::new()),
//!     OwnerScope::Local,
//! );
//! session.refresh_corpus().await?;
//!
//! let outcome = session.resolve_mood("calm").await?;
//! println!("{} ({})", outcome.entry.quote, outcome.tier);
//! ```

pub mod inspiration;
pub mod related;
pub mod resolution;
pub mod session;
pub mod similarity;
pub mod tag_matcher;

// Re-export core types
pub use moodcanvas_core::*;

pub use inspiration::InspirationSelector;
pub use related::{pick_random_related, RelatedCycle, RelatedQuoteFinder};
pub use resolution::{Resolution, ResolutionEngine, ResolutionTier};
pub use session::{load_corpus, MoodOutcome, MoodSession};
pub use similarity::{levenshtein, normalized_distance};
pub use tag_matcher::{MatchTier, RankedCandidate, TagMatcher};
