//! Test fixtures for resolution and session tests.
//!
//! Provides small mood corpora with known tags and quotes.
#![allow(dead_code)]

use moodcanvas_core::{ContentCorpus, ContentEntry};

/// Quotes sharing the keyword "light".
pub mod light {
    pub const LAKE: &str = "Morning light settles softly over the lake";
    pub const CANDLE: &str = "Every candle gives light without losing any";
    pub const PATH: &str = "Follow the light when the path is unclear";
}

/// Quotes with no keyword in common with anything else.
pub mod unrelated {
    pub const DANCE: &str = "Dance like nobody watches";
    pub const BREAD: &str = "Fresh bread fixes most problems";
}

pub fn entry(quote: &str, tags: &[&str]) -> ContentEntry {
    ContentEntry::new(quote, "Fixture Author", format!("fixtures/{}.jpg", quote.len()))
        .tagged(tags.iter().copied())
        .themed(["from-sky-100", "to-indigo-200"])
}

/// Five moods, each with one or two entries.
pub fn mood_corpus() -> ContentCorpus {
    ContentCorpus::new(vec![
        entry(light::LAKE, &["calm", "peaceful"]),
        entry(light::CANDLE, &["grateful"]),
        entry(light::PATH, &["hopeful", "inspired"]),
        entry(unrelated::DANCE, &["happy", "joyful"]),
        entry(unrelated::BREAD, &["happy"]),
        entry("Stillness speaks", &["calm"]),
    ])
}

/// Entries tagged with the given normalized tag.
pub fn tagged<'a>(corpus: &'a ContentCorpus, tag: &str) -> Vec<&'a ContentEntry> {
    corpus.entries().iter().filter(|e| e.has_tag(tag)).collect()
}
