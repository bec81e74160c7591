//! "Show me something similar": related quotes by shared keywords.
//!
//! Keywords are the first few long-enough words of the source quote. Any
//! entry whose quote contains one of them is related. The entry being viewed
//! is never part of its own related list.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use moodcanvas_core::{defaults, ContentCorpus, ContentEntry, EngineConfig, EntryId};

/// Finds entries related to a source quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedQuoteFinder {
    /// Keywords kept from the source text.
    pub max_tokens: usize,
    /// Shorter words are ignored.
    pub min_token_len: usize,
    /// Entries sampled when no keyword matches.
    pub fallback_sample: usize,
}

impl Default for RelatedQuoteFinder {
    fn default() -> Self {
        Self {
            max_tokens: defaults::RELATED_MAX_TOKENS,
            min_token_len: defaults::RELATED_MIN_TOKEN_LEN,
            fallback_sample: defaults::RELATED_FALLBACK_SAMPLE,
        }
    }
}

impl RelatedQuoteFinder {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_tokens: config.related_max_tokens,
            min_token_len: config.related_min_token_len,
            fallback_sample: config.related_fallback_sample,
        }
    }

    /// Lower-cased whitespace tokens of at least `min_token_len` characters,
    /// first `max_tokens` only.
    pub fn keywords(&self, source_text: &str) -> Vec<String> {
        source_text
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|t| t.chars().count() >= self.min_token_len)
            .take(self.max_tokens)
            .collect()
    }

    /// Related entries using the thread-local RNG for the fallback sample.
    pub fn find_related(
        &self,
        source_text: &str,
        exclude_id: EntryId,
        corpus: &ContentCorpus,
    ) -> Vec<ContentEntry> {
        self.find_related_with_rng(source_text, exclude_id, corpus, &mut rand::thread_rng())
    }

    /// Entries whose quote contains any keyword of `source_text`, in corpus
    /// order, never including `exclude_id`.
    ///
    /// No usable keyword gives an empty list. Keywords that match nothing
    /// give a random sample of up to `fallback_sample` other entries instead,
    /// which is empty only when the corpus has nothing else to offer.
    pub fn find_related_with_rng<R: Rng + ?Sized>(
        &self,
        source_text: &str,
        exclude_id: EntryId,
        corpus: &ContentCorpus,
        rng: &mut R,
    ) -> Vec<ContentEntry> {
        let keywords = self.keywords(source_text);
        if keywords.is_empty() {
            return Vec::new();
        }

        let related: Vec<ContentEntry> = corpus
            .entries()
            .iter()
            .filter(|e| e.id != exclude_id)
            .filter(|e| {
                let quote = e.quote.to_lowercase();
                keywords.iter().any(|k| quote.contains(k.as_str()))
            })
            .cloned()
            .collect();

        if !related.is_empty() {
            debug!(
                subsystem = "search",
                component = "related",
                result_count = related.len(),
                "Related quotes by keyword"
            );
            return related;
        }

        let others: Vec<&ContentEntry> = corpus
            .entries()
            .iter()
            .filter(|e| e.id != exclude_id)
            .collect();
        let sample: Vec<ContentEntry> = others
            .choose_multiple(rng, self.fallback_sample)
            .map(|e| (*e).clone())
            .collect();
        debug!(
            subsystem = "search",
            component = "related",
            result_count = sample.len(),
            "No keyword matched, sampling other entries"
        );
        sample
    }
}

/// A uniformly random entry from `related`, or `current` if there is none.
pub fn pick_random_related<'a, R: Rng + ?Sized>(
    related: &'a [ContentEntry],
    current: &'a ContentEntry,
    rng: &mut R,
) -> &'a ContentEntry {
    related.choose(rng).unwrap_or(current)
}

/// Cached related list for one source entry.
///
/// The search runs once per source; cycling through related quotes reuses the
/// cached list until a different source entry is set.
#[derive(Debug, Clone, Default)]
pub struct RelatedCycle {
    source_id: Option<EntryId>,
    related: Vec<ContentEntry>,
}

impl RelatedCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `source` the current source entry, searching only if it changed.
    ///
    /// Returns whether a new search ran.
    pub fn set_source<R: Rng + ?Sized>(
        &mut self,
        source: &ContentEntry,
        finder: &RelatedQuoteFinder,
        corpus: &ContentCorpus,
        rng: &mut R,
    ) -> bool {
        if self.source_id == Some(source.id) {
            return false;
        }
        self.related = finder.find_related_with_rng(&source.quote, source.id, corpus, rng);
        self.source_id = Some(source.id);
        true
    }

    /// Next entry to show after `current`.
    pub fn next<'a, R: Rng + ?Sized>(
        &'a self,
        current: &'a ContentEntry,
        rng: &mut R,
    ) -> &'a ContentEntry {
        pick_random_related(&self.related, current, rng)
    }

    pub fn source_id(&self) -> Option<EntryId> {
        self.source_id
    }

    pub fn related(&self) -> &[ContentEntry] {
        &self.related
    }

    /// Forget the cached list; the next `set_source` searches again.
    pub fn reset(&mut self) {
        self.source_id = None;
        self.related.clear();
    }
}
