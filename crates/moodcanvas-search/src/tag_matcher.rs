//! Exact and fuzzy matching of mood queries against entry tags.
//!
//! Matching is a pure function of the query and the entries. It ranks
//! candidates but never picks one; choosing among equally good candidates is
//! the resolution engine's job.

use serde::{Deserialize, Serialize};
use tracing::trace;

use moodcanvas_core::{
    defaults, meaningful_len, normalize_tag, ContentEntry, EngineConfig, EntryId, Error, Result,
};

use crate::similarity::normalized_distance;

/// How a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// The query equals one of the entry's tags.
    Exact,
    /// The query is within the edit-distance threshold of one of the entry's tags.
    Fuzzy,
}

/// One matched entry with its rank information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Position of the entry in the slice that was matched.
    pub index: usize,
    pub entry_id: EntryId,
    pub tier: MatchTier,
    /// 1.0 for exact matches, `1 - normalized_distance` for fuzzy ones.
    pub score: f64,
    /// The normalized tag the query matched.
    pub matched_tag: String,
}

/// Tiered tag matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatcher {
    /// Maximum normalized edit distance for a tag to be fuzzy-accepted.
    pub fuzzy_threshold: f64,
    /// Queries with fewer meaningful characters never fuzzy-match.
    pub min_query_chars: usize,
    /// Longer queries are refused by the fuzzy tier.
    pub max_query_chars: usize,
}

impl Default for TagMatcher {
    fn default() -> Self {
        Self {
            fuzzy_threshold: defaults::FUZZY_THRESHOLD,
            min_query_chars: defaults::MIN_QUERY_CHARS,
            max_query_chars: defaults::MAX_QUERY_CHARS,
        }
    }
}

impl TagMatcher {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            fuzzy_threshold: config.fuzzy_threshold,
            min_query_chars: config.min_query_chars,
            max_query_chars: config.max_query_chars,
        }
    }

    /// Rank entries for a query: the exact tier if it has any candidate,
    /// otherwise the fuzzy tier.
    ///
    /// Results are ordered best-first by tier, then score, then entry order.
    pub fn match_query(&self, query: &str, entries: &[ContentEntry]) -> Result<Vec<RankedCandidate>> {
        let exact = self.exact(query, entries);
        if !exact.is_empty() {
            return Ok(exact);
        }
        self.fuzzy(query, entries)
    }

    /// Entries having a tag equal to the normalized query.
    pub fn exact(&self, query: &str, entries: &[ContentEntry]) -> Vec<RankedCandidate> {
        let query = normalize_tag(query);
        if query.is_empty() {
            return Vec::new();
        }

        entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.tags.iter().any(|t| normalize_tag(t) == query))
            .map(|(index, entry)| RankedCandidate {
                index,
                entry_id: entry.id,
                tier: MatchTier::Exact,
                score: 1.0,
                matched_tag: query.clone(),
            })
            .collect()
    }

    /// Entries carrying the closest accepted tag.
    ///
    /// Every distinct tag is scored against the query; the tag with the
    /// smallest normalized edit distance at or below the threshold wins, the
    /// first-seen tag winning ties. Queries under `min_query_chars` meaningful
    /// characters yield no candidates. Queries over `max_query_chars` and
    /// malformed tags are reported as [`Error::Match`].
    pub fn fuzzy(&self, query: &str, entries: &[ContentEntry]) -> Result<Vec<RankedCandidate>> {
        let query = normalize_tag(query);
        if meaningful_len(&query) < self.min_query_chars {
            return Ok(Vec::new());
        }
        let query_len = query.chars().count();
        if query_len > self.max_query_chars {
            return Err(Error::Match(format!(
                "query of {} characters exceeds fuzzy limit of {}",
                query_len, self.max_query_chars
            )));
        }

        let mut best: Option<(String, f64)> = None;
        let mut seen: Vec<String> = Vec::new();
        for tag in entries.iter().flat_map(|e| e.tags.iter()) {
            let tag = normalize_tag(tag);
            if seen.contains(&tag) {
                continue;
            }
            let distance = normalized_distance(&query, &tag)?;
            trace!(
                component = "tag_matcher",
                matched_tag = %tag,
                distance,
                "Scored tag"
            );
            let improves = best.as_ref().map_or(true, |(_, d)| distance < *d);
            if distance <= self.fuzzy_threshold && improves {
                best = Some((tag.clone(), distance));
            }
            seen.push(tag);
        }

        let Some((best_tag, distance)) = best else {
            return Ok(Vec::new());
        };

        Ok(entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.tags.iter().any(|t| normalize_tag(t) == best_tag))
            .map(|(index, entry)| RankedCandidate {
                index,
                entry_id: entry.id,
                tier: MatchTier::Fuzzy,
                score: 1.0 - distance,
                matched_tag: best_tag.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moodcanvas_db::test_fixtures::entry;

    fn corpus() -> Vec<ContentEntry> {
        vec![
            entry("A", &["calm", "peaceful"]),
            entry("B", &["happy"]),
            entry("C", &["calm"]),
            entry("D", &["sad"]),
        ]
    }

    #[test]
    fn test_exact_matches_whole_tags_only() {
        let entries = corpus();
        let matcher = TagMatcher::default();

        let hits = matcher.exact("calm", &entries);
        assert_eq!(hits.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 2]);
        assert!(hits.iter().all(|c| c.tier == MatchTier::Exact && c.score == 1.0));

        // Substrings are not exact matches.
        assert!(matcher.exact("cal", &entries).is_empty());
        assert!(matcher.exact("peace", &entries).is_empty());
    }

    #[test]
    fn test_exact_normalizes_query() {
        let entries = corpus();
        let hits = TagMatcher::default().exact("  CaLm ", &entries);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].matched_tag, "calm");
    }

    #[test]
    fn test_exact_tolerates_unnormalized_stored_tags() {
        let mut raw = entry("A", &[]);
        raw.tags = vec![" Calm ".into()];
        let hits = TagMatcher::default().exact("calm", &[raw]);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_fuzzy_single_edit() {
        let entries = corpus();
        let hits = TagMatcher::default().fuzzy("calmm", &entries).unwrap();
        assert_eq!(hits.iter().map(|c| c.index).collect::<Vec<_>>(), vec![0, 2]);
        assert!(hits.iter().all(|c| c.tier == MatchTier::Fuzzy));
        assert_eq!(hits[0].matched_tag, "calm");
        assert!((hits[0].score - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_fuzzy_picks_best_tag() {
        let entries = vec![entry("A", &["happy"]), entry("B", &["hapy"])];
        // "hapyy" is 1 edit from "hapy" (0.2) and 1 edit from "happy" (0.2);
        // the first-seen tag wins the tie.
        let hits = TagMatcher::default().fuzzy("hapyy", &entries).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].matched_tag, "happy");

        // "hapy" is exact for B, but fuzzy must still prefer distance 0.
        let hits = TagMatcher::default().fuzzy("hapy", &entries).unwrap();
        assert_eq!(hits[0].matched_tag, "hapy");
    }

    #[test]
    fn test_fuzzy_threshold_boundary() {
        let entries = vec![entry("A", &["happy"])];
        let matcher = TagMatcher::default();
        // 2 edits over 5 chars = 0.4: accepted.
        assert_eq!(matcher.fuzzy("hazzy", &entries).unwrap().len(), 1);
        // 3 edits over 5 chars = 0.6: rejected.
        assert!(matcher.fuzzy("hzzzy", &entries).unwrap().is_empty());
    }

    #[test]
    fn test_fuzzy_rejects_short_queries() {
        let entries = vec![entry("A", &["a", "ab"])];
        let matcher = TagMatcher::default();
        assert!(matcher.fuzzy("a", &entries).unwrap().is_empty());
        assert!(matcher.fuzzy(" ?! ", &entries).unwrap().is_empty());
        assert_eq!(matcher.fuzzy("ab", &entries).unwrap().len(), 1);
    }

    #[test]
    fn test_fuzzy_rejects_overlong_query_with_error() {
        let entries = corpus();
        let matcher = TagMatcher {
            max_query_chars: 8,
            ..Default::default()
        };
        let err = matcher.fuzzy("calm calm calm", &entries).unwrap_err();
        assert!(matches!(err, Error::Match(_)));
    }

    #[test]
    fn test_fuzzy_malformed_tag_is_error() {
        let mut raw = entry("A", &[]);
        raw.tags = vec!["   ".into()];
        let err = TagMatcher::default().fuzzy("calm", &[raw]).unwrap_err();
        assert!(matches!(err, Error::Match(_)));
    }

    #[test]
    fn test_match_query_prefers_exact_tier() {
        let entries = vec![entry("A", &["calmm"]), entry("B", &["calm"])];
        let hits = TagMatcher::default().match_query("calm", &entries).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].index, 1);
        assert_eq!(hits[0].tier, MatchTier::Exact);
    }

    #[test]
    fn test_match_query_no_match() {
        let entries = corpus();
        assert!(TagMatcher::default()
            .match_query("xyz123", &entries)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_matcher_from_config() {
        let config = EngineConfig::default().with_fuzzy_threshold(0.1);
        let matcher = TagMatcher::new(&config);
        let entries = corpus();
        assert!(matcher.fuzzy("calmm", &entries).unwrap().is_empty());
    }
}
