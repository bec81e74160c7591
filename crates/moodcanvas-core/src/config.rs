//! Runtime configuration for the mood engine.
//!
//! Every value has a default in [`crate::defaults`] and can be overridden
//! through environment variables. Malformed values are logged and ignored
//! so a typo in the environment never takes the engine down.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::defaults;
use crate::error::{Error, Result};

/// Tunable constants for matching, selection and history retention.
///
/// # Example
/// ```
/// use moodcanvas_core::EngineConfig;
///
/// let config = EngineConfig::default().with_history_cap(50);
/// assert_eq!(config.history_cap, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Maximum records kept by the history ledger.
    pub history_cap: usize,
    /// Maximum normalized edit distance for a fuzzy tag match (0.0 to 1.0).
    pub fuzzy_threshold: f64,
    /// Minimum meaningful characters a query needs to be fuzzy-matched.
    pub min_query_chars: usize,
    /// Maximum query length, in characters, that the fuzzy tier accepts.
    pub max_query_chars: usize,
    /// How many of the most popular entries daily inspiration draws from.
    pub inspiration_top_k: usize,
    /// How many recent history records personalized inspiration consults.
    pub personalized_history_window: usize,
    /// Maximum keywords taken from a source quote.
    pub related_max_tokens: usize,
    /// Minimum keyword length for related-quote search.
    pub related_min_token_len: usize,
    /// Sample size when no related quote shares a keyword.
    pub related_fallback_sample: usize,
    /// Time allowed for the content store to supply the corpus.
    pub corpus_load_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_cap: defaults::HISTORY_CAP,
            fuzzy_threshold: defaults::FUZZY_THRESHOLD,
            min_query_chars: defaults::MIN_QUERY_CHARS,
            max_query_chars: defaults::MAX_QUERY_CHARS,
            inspiration_top_k: defaults::INSPIRATION_TOP_K,
            personalized_history_window: defaults::PERSONALIZED_HISTORY_WINDOW,
            related_max_tokens: defaults::RELATED_MAX_TOKENS,
            related_min_token_len: defaults::RELATED_MIN_TOKEN_LEN,
            related_fallback_sample: defaults::RELATED_FALLBACK_SAMPLE,
            corpus_load_timeout: Duration::from_secs(defaults::CORPUS_LOAD_TIMEOUT_SECS),
        }
    }
}

impl EngineConfig {
    /// Constructs configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MOODCANVAS_HISTORY_CAP` (default: 30)
    /// - `MOODCANVAS_FUZZY_THRESHOLD` (default: 0.4)
    /// - `MOODCANVAS_MIN_QUERY_CHARS` (default: 2)
    /// - `MOODCANVAS_MAX_QUERY_CHARS` (default: 64)
    /// - `MOODCANVAS_INSPIRATION_TOP_K` (default: 5)
    /// - `MOODCANVAS_PERSONALIZED_WINDOW` (default: 10)
    /// - `MOODCANVAS_RELATED_MAX_TOKENS` (default: 3)
    /// - `MOODCANVAS_RELATED_MIN_TOKEN_LEN` (default: 4)
    /// - `MOODCANVAS_RELATED_FALLBACK_SAMPLE` (default: 5)
    /// - `MOODCANVAS_CORPUS_TIMEOUT_SECS` (default: 10)
    pub fn from_env() -> Self {
        Self {
            history_cap: parse_env("MOODCANVAS_HISTORY_CAP", defaults::HISTORY_CAP),
            fuzzy_threshold: parse_env("MOODCANVAS_FUZZY_THRESHOLD", defaults::FUZZY_THRESHOLD),
            min_query_chars: parse_env("MOODCANVAS_MIN_QUERY_CHARS", defaults::MIN_QUERY_CHARS),
            max_query_chars: parse_env("MOODCANVAS_MAX_QUERY_CHARS", defaults::MAX_QUERY_CHARS),
            inspiration_top_k: parse_env(
                "MOODCANVAS_INSPIRATION_TOP_K",
                defaults::INSPIRATION_TOP_K,
            ),
            personalized_history_window: parse_env(
                "MOODCANVAS_PERSONALIZED_WINDOW",
                defaults::PERSONALIZED_HISTORY_WINDOW,
            ),
            related_max_tokens: parse_env(
                "MOODCANVAS_RELATED_MAX_TOKENS",
                defaults::RELATED_MAX_TOKENS,
            ),
            related_min_token_len: parse_env(
                "MOODCANVAS_RELATED_MIN_TOKEN_LEN",
                defaults::RELATED_MIN_TOKEN_LEN,
            ),
            related_fallback_sample: parse_env(
                "MOODCANVAS_RELATED_FALLBACK_SAMPLE",
                defaults::RELATED_FALLBACK_SAMPLE,
            ),
            corpus_load_timeout: Duration::from_secs(parse_env(
                "MOODCANVAS_CORPUS_TIMEOUT_SECS",
                defaults::CORPUS_LOAD_TIMEOUT_SECS,
            )),
        }
    }

    /// Check that the values are usable together.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.fuzzy_threshold) {
            return Err(Error::Config(format!(
                "fuzzy_threshold must be within 0.0..=1.0, got {}",
                self.fuzzy_threshold
            )));
        }
        if self.inspiration_top_k == 0 {
            return Err(Error::Config("inspiration_top_k must be at least 1".into()));
        }
        if self.min_query_chars > self.max_query_chars {
            return Err(Error::Config(format!(
                "min_query_chars ({}) exceeds max_query_chars ({})",
                self.min_query_chars, self.max_query_chars
            )));
        }
        if self.corpus_load_timeout.is_zero() {
            return Err(Error::Config("corpus_load_timeout must be non-zero".into()));
        }
        Ok(())
    }

    /// Set the history ledger cap.
    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history_cap = cap;
        self
    }

    /// Set the fuzzy acceptance threshold.
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.fuzzy_threshold = threshold;
        self
    }

    /// Set how many popular entries inspiration draws from.
    pub fn with_inspiration_top_k(mut self, k: usize) -> Self {
        self.inspiration_top_k = k;
        self
    }

    /// Set the corpus load timeout.
    pub fn with_corpus_load_timeout(mut self, timeout: Duration) -> Self {
        self.corpus_load_timeout = timeout;
        self
    }
}

/// Parses an environment variable, keeping the default when it is missing
/// or malformed.
fn parse_env<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(
                    subsystem = "config",
                    key,
                    value = %raw,
                    "Ignoring malformed environment value"
                );
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Environment variables are process-global, so tests must not run in parallel.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        for key in [
            "MOODCANVAS_HISTORY_CAP",
            "MOODCANVAS_FUZZY_THRESHOLD",
            "MOODCANVAS_MIN_QUERY_CHARS",
            "MOODCANVAS_MAX_QUERY_CHARS",
            "MOODCANVAS_INSPIRATION_TOP_K",
            "MOODCANVAS_PERSONALIZED_WINDOW",
            "MOODCANVAS_RELATED_MAX_TOKENS",
            "MOODCANVAS_RELATED_MIN_TOKEN_LEN",
            "MOODCANVAS_RELATED_FALLBACK_SAMPLE",
            "MOODCANVAS_CORPUS_TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_defaults_match_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.history_cap, 30);
        assert_eq!(config.fuzzy_threshold, 0.4);
        assert_eq!(config.inspiration_top_k, 5);
        assert_eq!(config.related_max_tokens, 3);
        assert_eq!(config.related_min_token_len, 4);
        assert_eq!(config.corpus_load_timeout, Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_env_without_vars_is_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        assert_eq!(EngineConfig::from_env(), EngineConfig::default());
    }

    #[test]
    fn test_from_env_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("MOODCANVAS_HISTORY_CAP", "50");
        env::set_var("MOODCANVAS_FUZZY_THRESHOLD", "0.25");
        env::set_var("MOODCANVAS_CORPUS_TIMEOUT_SECS", " 3 ");
        let config = EngineConfig::from_env();
        clear_env();

        assert_eq!(config.history_cap, 50);
        assert_eq!(config.fuzzy_threshold, 0.25);
        assert_eq!(config.corpus_load_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_env_malformed_uses_default() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("MOODCANVAS_HISTORY_CAP", "lots");
        env::set_var("MOODCANVAS_INSPIRATION_TOP_K", "-1");
        let config = EngineConfig::from_env();
        clear_env();

        assert_eq!(config.history_cap, defaults::HISTORY_CAP);
        assert_eq!(config.inspiration_top_k, defaults::INSPIRATION_TOP_K);
    }

    #[test]
    fn test_validate_rejects_threshold_out_of_range() {
        let config = EngineConfig::default().with_fuzzy_threshold(1.5);
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let config = EngineConfig::default().with_fuzzy_threshold(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let config = EngineConfig::default().with_inspiration_top_k(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_query_bounds() {
        let config = EngineConfig {
            min_query_chars: 10,
            max_query_chars: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_history_cap() {
        let config = EngineConfig::default().with_history_cap(0);
        assert!(config.validate().is_ok());
    }
}
