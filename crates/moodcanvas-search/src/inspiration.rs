//! Popularity-biased selection for query-less inspiration.
//!
//! Daily inspiration draws uniformly from the `top_k` most popular entries so
//! it favours proven content without always showing the same quote. When no
//! entry has been liked yet, every entry is equally likely.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use moodcanvas_core::{defaults, normalize_tag, ContentCorpus, ContentEntry, EngineConfig, HistoryRecord};

/// Picks inspiration entries from a corpus snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspirationSelector {
    /// How many of the most popular entries are eligible.
    pub top_k: usize,
    /// How many newest history records personalized picks consult.
    pub history_window: usize,
}

impl Default for InspirationSelector {
    fn default() -> Self {
        Self {
            top_k: defaults::INSPIRATION_TOP_K,
            history_window: defaults::PERSONALIZED_HISTORY_WINDOW,
        }
    }
}

impl InspirationSelector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            top_k: config.inspiration_top_k,
            history_window: config.personalized_history_window,
        }
    }

    /// Pick an entry using the thread-local RNG. `None` only for an empty corpus.
    pub fn pick_inspiration<'a>(&self, corpus: &'a ContentCorpus) -> Option<&'a ContentEntry> {
        self.pick_inspiration_with_rng(corpus, &mut rand::thread_rng())
    }

    /// Pick uniformly among the `top_k` most popular entries with positive
    /// popularity, or among all entries if none has any.
    ///
    /// Entries with equal popularity keep corpus order when ranking.
    pub fn pick_inspiration_with_rng<'a, R: Rng + ?Sized>(
        &self,
        corpus: &'a ContentCorpus,
        rng: &mut R,
    ) -> Option<&'a ContentEntry> {
        let mut popular: Vec<&ContentEntry> = corpus
            .entries()
            .iter()
            .filter(|e| e.popularity > 0)
            .collect();

        if popular.is_empty() {
            return corpus.entries().choose(rng);
        }

        // Stable sort: ties stay in corpus order.
        popular.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        popular.truncate(self.top_k.max(1));
        debug!(
            subsystem = "search",
            component = "inspiration",
            candidate_count = popular.len(),
            "Picking from most popular entries"
        );
        popular.choose(rng).copied()
    }

    /// Pick an entry matching the user's recent moods, using the thread-local RNG.
    pub fn pick_personalized<'a>(
        &self,
        corpus: &'a ContentCorpus,
        recent: &[HistoryRecord],
    ) -> Option<&'a ContentEntry> {
        self.pick_personalized_with_rng(corpus, recent, &mut rand::thread_rng())
    }

    /// Pick uniformly among entries tagged with any of the moods typed in the
    /// newest `history_window` records (`recent` is newest first). Falls back
    /// to [`pick_inspiration_with_rng`](Self::pick_inspiration_with_rng) when
    /// nothing matches.
    pub fn pick_personalized_with_rng<'a, R: Rng + ?Sized>(
        &self,
        corpus: &'a ContentCorpus,
        recent: &[HistoryRecord],
        rng: &mut R,
    ) -> Option<&'a ContentEntry> {
        let moods: Vec<String> = recent
            .iter()
            .take(self.history_window)
            .map(|r| normalize_tag(&r.query_text))
            .filter(|m| !m.is_empty())
            .collect();

        let matching: Vec<&ContentEntry> = corpus
            .entries()
            .iter()
            .filter(|e| moods.iter().any(|m| e.has_tag(m)))
            .collect();

        debug!(
            subsystem = "search",
            component = "inspiration",
            op = "personalized",
            candidate_count = matching.len(),
            "Personalized candidates from recent moods"
        );

        match matching.choose(rng) {
            Some(entry) => Some(*entry),
            None => self.pick_inspiration_with_rng(corpus, rng),
        }
    }
}
