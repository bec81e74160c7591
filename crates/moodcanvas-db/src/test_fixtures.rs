//! Shared builders for tests across the workspace.

use moodcanvas_core::{ContentCorpus, ContentEntry, HistoryRecord, HistoryRecordInput, OwnerScope};

/// Entry with the given quote and tags, a generated id and zero popularity.
pub fn entry(quote: &str, tags: &[&str]) -> ContentEntry {
    ContentEntry::new(quote, "Test Author", format!("test/{}.jpg", quote.len()))
        .tagged(tags.iter().copied())
        .themed(["from-gray-100", "to-slate-200"])
}

/// Entry with a popularity score.
pub fn popular_entry(quote: &str, tags: &[&str], popularity: u64) -> ContentEntry {
    entry(quote, tags).with_popularity(popularity)
}

/// Two-entry corpus: A tagged calm/peaceful, B tagged happy.
pub fn calm_happy_corpus() -> ContentCorpus {
    ContentCorpus::new(vec![
        entry("A", &["calm", "peaceful"]),
        entry("B", &["happy"]),
    ])
}

/// Record input pointing at `entry` for the local scope.
pub fn input_for(query: &str, entry: &ContentEntry) -> HistoryRecordInput {
    HistoryRecordInput::for_entry(query, entry, entry.image_ref.clone(), OwnerScope::Local)
}

/// Finalized record for `entry` in `scope`.
pub fn record_for(query: &str, entry: &ContentEntry, scope: OwnerScope) -> HistoryRecord {
    HistoryRecordInput::for_entry(query, entry, entry.image_ref.clone(), scope).into_record()
}
