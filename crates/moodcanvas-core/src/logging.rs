//! Structured logging conventions for moodcanvas.
//!
//! Every event carries `subsystem` ("search", "db", "cli"), `component`
//! (e.g. "resolution", "ledger", "session") and, where it names an operation,
//! `op`. Entity and measurement fields use `entry_id`, `record_id`, `query`,
//! `tier`, `result_count` and `duration_ms`.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Corpus unavailable, nothing can be shown |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (corpus loaded, ledger cleared) |
//! | DEBUG | Decision points (which tier resolved a query) |
//! | TRACE | Per-candidate data |
