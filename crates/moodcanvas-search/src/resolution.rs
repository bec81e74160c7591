//! Tiered resolution of a mood query to exactly one entry.
//!
//! Tiers run in a fixed order and stop at the first that yields a candidate:
//!
//! 1. blank query: straight to the fallback tier
//! 2. exact tag match: uniform pick among exact candidates
//! 3. fuzzy tag match: uniform pick among fuzzy candidates
//! 4. fallback: uniform pick across the whole corpus
//!
//! The fallback is deliberately unbiased; popularity only matters for
//! inspiration. A failure inside fuzzy matching degrades to the fallback tier.
//! The only error is [`Error::EmptyCorpus`].

use std::fmt;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use moodcanvas_core::{ContentCorpus, ContentEntry, EngineConfig, Error, Result};

use crate::tag_matcher::{RankedCandidate, TagMatcher};

/// Which tier produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    Exact,
    Fuzzy,
    Fallback,
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Fuzzy => write!(f, "fuzzy"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// The entry a query resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub entry: ContentEntry,
    pub tier: ResolutionTier,
    /// Tag matched by the exact or fuzzy tier.
    pub matched_tag: Option<String>,
}

/// Resolves mood queries against a corpus snapshot.
#[derive(Debug, Clone, Default)]
pub struct ResolutionEngine {
    matcher: TagMatcher,
}

impl ResolutionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            matcher: TagMatcher::new(config),
        }
    }

    pub fn with_matcher(matcher: TagMatcher) -> Self {
        Self { matcher }
    }

    /// Resolve `query` using the thread-local RNG.
    pub fn resolve(&self, query: &str, corpus: &ContentCorpus) -> Result<Resolution> {
        self.resolve_with_rng(query, corpus, &mut rand::thread_rng())
    }

    /// Resolve `query` with a caller-supplied RNG.
    ///
    /// Always returns an entry for a non-empty corpus. Has no side effects;
    /// recording history is the caller's business.
    pub fn resolve_with_rng<R: Rng + ?Sized>(
        &self,
        query: &str,
        corpus: &ContentCorpus,
        rng: &mut R,
    ) -> Result<Resolution> {
        let start = Instant::now();
        let entries = corpus.entries();
        if entries.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let resolution = if query.trim().is_empty() {
            fallback(entries, rng)?
        } else {
            let exact = self.matcher.exact(query, entries);
            if let Some(found) = pick_candidate(&exact, entries, ResolutionTier::Exact, rng) {
                found
            } else {
                match self.matcher.fuzzy(query, entries) {
                    Ok(fuzzy) => {
                        match pick_candidate(&fuzzy, entries, ResolutionTier::Fuzzy, rng) {
                            Some(found) => found,
                            None => fallback(entries, rng)?,
                        }
                    }
                    Err(e) => {
                        warn!(
                            subsystem = "search",
                            component = "resolution",
                            query = %query,
                            error = %e,
                            "Fuzzy matching failed, using random fallback"
                        );
                        fallback(entries, rng)?
                    }
                }
            }
        };

        debug!(
            subsystem = "search",
            component = "resolution",
            op = "resolve",
            query = %query,
            tier = %resolution.tier,
            matched_tag = resolution.matched_tag.as_deref().unwrap_or(""),
            entry_id = %resolution.entry.id,
            duration_ms = start.elapsed().as_millis() as u64,
            "Query resolved"
        );
        Ok(resolution)
    }
}

fn pick_candidate<R: Rng + ?Sized>(
    candidates: &[RankedCandidate],
    entries: &[ContentEntry],
    tier: ResolutionTier,
    rng: &mut R,
) -> Option<Resolution> {
    let chosen = candidates.choose(rng)?;
    debug!(
        component = "resolution",
        tier = %tier,
        candidate_count = candidates.len(),
        "Tier produced candidates"
    );
    Some(Resolution {
        entry: entries[chosen.index].clone(),
        tier,
        matched_tag: Some(chosen.matched_tag.clone()),
    })
}

fn fallback<R: Rng + ?Sized>(entries: &[ContentEntry], rng: &mut R) -> Result<Resolution> {
    let entry = entries.choose(rng).ok_or(Error::EmptyCorpus)?;
    Ok(Resolution {
        entry: entry.clone(),
        tier: ResolutionTier::Fallback,
        matched_tag: None,
    })
}
