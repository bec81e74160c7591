//! Centralized default constants for moodcanvas.
//!
//! **This module is the single source of truth** for tunable engine values.
//! `EngineConfig` starts from these and lets the environment override them.

// =============================================================================
// MATCHING
// =============================================================================

/// Maximum normalized edit distance (0.0 to 1.0) for a tag to be fuzzy-accepted.
pub const FUZZY_THRESHOLD: f64 = 0.4;

/// Queries with fewer meaningful characters never fuzzy-match.
pub const MIN_QUERY_CHARS: usize = 2;

/// Queries longer than this are not fuzzy-matched (bounds edit-distance cost).
pub const MAX_QUERY_CHARS: usize = 64;

// =============================================================================
// INSPIRATION
// =============================================================================

/// Number of most popular entries considered for daily inspiration.
pub const INSPIRATION_TOP_K: usize = 5;

/// Number of newest history records consulted for personalized inspiration.
pub const PERSONALIZED_HISTORY_WINDOW: usize = 10;

// =============================================================================
// RELATED QUOTES
// =============================================================================

/// Maximum keywords extracted from a source quote.
pub const RELATED_MAX_TOKENS: usize = 3;

/// Minimum keyword length in characters.
pub const RELATED_MIN_TOKEN_LEN: usize = 4;

/// Size of the unfiltered sample used when no keyword matches.
pub const RELATED_FALLBACK_SAMPLE: usize = 5;

// =============================================================================
// HISTORY
// =============================================================================

/// Maximum number of records kept in the history ledger.
pub const HISTORY_CAP: usize = 30;

// =============================================================================
// I/O
// =============================================================================

/// Seconds allowed for a content store to return the corpus.
pub const CORPUS_LOAD_TIMEOUT_SECS: u64 = 10;

/// Author shown when an entry has none.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";
