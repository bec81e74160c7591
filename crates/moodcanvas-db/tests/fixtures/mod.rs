//! Test fixtures for ledger persistence tests.
#![allow(dead_code)]

use moodcanvas_core::{ContentEntry, HistoryRecordInput, OwnerScope};

pub const HISTORY_FILE: &str = "moodcanvas-history.json";

pub fn lake() -> ContentEntry {
    ContentEntry::new(
        "Morning light settles softly over the lake",
        "Fixture Author",
        "calm/lake.jpg",
    )
    .tagged(["calm", "peaceful"])
    .themed(["from-blue-100", "to-cyan-200"])
}

/// Record input for `query` resolved to the lake entry.
pub fn lake_input(query: &str) -> HistoryRecordInput {
    let entry = lake();
    HistoryRecordInput::for_entry(
        query,
        &entry,
        format!("https://cdn.test/{}", entry.image_ref),
        OwnerScope::Local,
    )
}
