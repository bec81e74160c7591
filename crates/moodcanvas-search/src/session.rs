//! One user's mood session.
//!
//! A [`MoodSession`] owns everything that used to be ambient state: the
//! current corpus snapshot, the history ledger, the streak counter and the
//! related-quote cache. Collaborators are injected so the same pipeline runs
//! against the seed corpus, a JSON file, or test doubles.
//!
//! Resolution flow:
//!
//! ```text
//! corpus snapshot -> ResolutionEngine -> HistoryRecordInput -> HistoryLedger
//!                                                                  |
//!                                            ok: streak += 1  <----+
//!                                            err: outcome.persistence_error
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use moodcanvas_core::{
    ContentCorpus, ContentEntry, ContentStore, EngineConfig, EntryId, Error, HistoryRecord,
    HistoryRecordInput, HistoryStore, ImageResolver, OwnerScope, PopularityMutator, Result,
    SessionStreakCounter,
};
use moodcanvas_db::HistoryLedger;

use crate::inspiration::InspirationSelector;
use crate::related::{RelatedCycle, RelatedQuoteFinder};
use crate::resolution::{ResolutionEngine, ResolutionTier};

/// Load a corpus snapshot, giving up after `timeout`.
///
/// Store failures surface as [`Error::ContentStore`], a slow store as
/// [`Error::Timeout`], and a store with no valid entries as
/// [`Error::EmptyCorpus`].
pub async fn load_corpus(store: &dyn ContentStore, timeout: Duration) -> Result<ContentCorpus> {
    let start = Instant::now();
    let entries = match tokio::time::timeout(timeout, store.load_entries()).await {
        Ok(Ok(entries)) => entries,
        Ok(Err(e)) => {
            return Err(match e {
                Error::ContentStore(_) => e,
                other => Error::ContentStore(other.to_string()),
            })
        }
        Err(_) => {
            warn!(
                subsystem = "search",
                component = "session",
                op = "load_corpus",
                "Content store exceeded timeout of {:?}",
                timeout
            );
            return Err(Error::Timeout(timeout));
        }
    };

    let corpus = ContentCorpus::new(entries);
    if corpus.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    info!(
        subsystem = "search",
        component = "session",
        op = "load_corpus",
        result_count = corpus.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Corpus loaded"
    );
    Ok(corpus)
}

/// Result of resolving one mood query.
#[derive(Debug)]
pub struct MoodOutcome {
    pub entry: ContentEntry,
    pub tier: ResolutionTier,
    /// Display URL of the entry's artwork.
    pub image_url: String,
    /// The stored history record, absent when persisting it failed.
    pub record: Option<HistoryRecord>,
    /// Streak after this resolution.
    pub streak: u64,
    /// Why the record was not stored. The entry is still valid.
    pub persistence_error: Option<Error>,
}

/// Mood resolution pipeline for one owner scope.
pub struct MoodSession {
    config: EngineConfig,
    engine: ResolutionEngine,
    selector: InspirationSelector,
    finder: RelatedQuoteFinder,
    content_store: Arc<dyn ContentStore>,
    image_resolver: Arc<dyn ImageResolver>,
    popularity: Option<Arc<dyn PopularityMutator>>,
    corpus: RwLock<Option<ContentCorpus>>,
    ledger: Mutex<HistoryLedger>,
    related: Mutex<RelatedCycle>,
    streak: SessionStreakCounter,
}

impl std::fmt::Debug for MoodSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoodSession")
            .field("config", &self.config)
            .field("streak", &self.streak.get())
            .finish_non_exhaustive()
    }
}

impl MoodSession {
    /// Create a session with an empty ledger and no corpus loaded yet.
    ///
    /// Call [`refresh_corpus`](Self::refresh_corpus) before resolving, and
    /// [`load_history`](Self::load_history) to pick up stored history.
    pub fn new(
        config: EngineConfig,
        content_store: Arc<dyn ContentStore>,
        image_resolver: Arc<dyn ImageResolver>,
        history_store: Arc<dyn HistoryStore>,
        owner_scope: OwnerScope,
    ) -> Self {
        let ledger = HistoryLedger::new(history_store, owner_scope, config.history_cap);
        Self {
            engine: ResolutionEngine::new(&config),
            selector: InspirationSelector::new(&config),
            finder: RelatedQuoteFinder::new(&config),
            config,
            content_store,
            image_resolver,
            popularity: None,
            corpus: RwLock::new(None),
            ledger: Mutex::new(ledger),
            related: Mutex::new(RelatedCycle::new()),
            streak: SessionStreakCounter::new(),
        }
    }

    /// Enable the "like" action.
    pub fn with_popularity_mutator(mut self, mutator: Arc<dyn PopularityMutator>) -> Self {
        self.popularity = Some(mutator);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the ledger with the newest stored records for this scope.
    ///
    /// Returns how many records were loaded.
    pub async fn load_history(&self) -> Result<usize> {
        let mut ledger = self.ledger.lock().await;
        let store = ledger.store();
        let scope = ledger.scope().clone();
        let cap = ledger.cap();
        *ledger = HistoryLedger::load(store, scope, cap).await?;
        Ok(ledger.len())
    }

    /// Load a fresh corpus snapshot from the content store.
    ///
    /// On failure the previous snapshot is dropped, so resolution refuses
    /// with [`Error::EmptyCorpus`] instead of serving stale content.
    #[instrument(skip(self), fields(subsystem = "search", component = "session", op = "refresh_corpus"))]
    pub async fn refresh_corpus(&self) -> Result<usize> {
        let loaded = load_corpus(self.content_store.as_ref(), self.config.corpus_load_timeout).await;
        let mut slot = self.corpus.write().await;
        match loaded {
            Ok(corpus) => {
                let len = corpus.len();
                *slot = Some(corpus);
                self.related.lock().await.reset();
                Ok(len)
            }
            Err(e) => {
                warn!(error = %e, "Corpus refresh failed, dropping cached corpus");
                *slot = None;
                Err(e)
            }
        }
    }

    /// The current corpus snapshot.
    pub async fn corpus(&self) -> Result<ContentCorpus> {
        self.corpus.read().await.clone().ok_or(Error::EmptyCorpus)
    }

    /// Resolve a mood query and record it in history.
    pub async fn resolve_mood(&self, query: &str) -> Result<MoodOutcome> {
        self.resolve_mood_with_note(query, None).await
    }

    /// Resolve a mood query, attaching an optional personal note to the
    /// history record.
    ///
    /// Fails only when there is no corpus. A history write failure is
    /// reported in [`MoodOutcome::persistence_error`]; the resolved entry is
    /// kept and the streak is left as it was.
    pub async fn resolve_mood_with_note(
        &self,
        query: &str,
        note: Option<String>,
    ) -> Result<MoodOutcome> {
        let corpus = self.corpus().await?;
        let resolution = self.engine.resolve(query, &corpus)?;
        let image_url = self
            .image_resolver
            .resolve_display_url(&resolution.entry.image_ref);

        let mut input = HistoryRecordInput::for_entry(
            query,
            &resolution.entry,
            image_url.clone(),
            OwnerScope::Local,
        );
        if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
            input = input.with_note(note);
        }

        let appended = self.ledger.lock().await.append(input).await;
        let (record, persistence_error, streak) = match appended {
            Ok(record) => (Some(record), None, self.streak.increment()),
            Err(e) => {
                warn!(
                    subsystem = "search",
                    component = "session",
                    entry_id = %resolution.entry.id,
                    error = %e,
                    "Resolved entry not recorded in history"
                );
                (None, Some(e), self.streak.get())
            }
        };

        debug!(
            subsystem = "search",
            component = "session",
            op = "resolve_mood",
            tier = %resolution.tier,
            entry_id = %resolution.entry.id,
            streak,
            "Mood resolved"
        );
        Ok(MoodOutcome {
            entry: resolution.entry,
            tier: resolution.tier,
            image_url,
            record,
            streak,
            persistence_error,
        })
    }

    /// Popularity-biased pick for when the user has not typed anything.
    pub async fn daily_inspiration(&self) -> Result<ContentEntry> {
        let corpus = self.corpus().await?;
        self.selector
            .pick_inspiration(&corpus)
            .cloned()
            .ok_or(Error::EmptyCorpus)
    }

    /// Pick drawn from the moods in the user's recent history.
    pub async fn personalized_inspiration(&self) -> Result<ContentEntry> {
        let corpus = self.corpus().await?;
        let recent = self.ledger.lock().await.list();
        self.selector
            .pick_personalized(&corpus, &recent)
            .cloned()
            .ok_or(Error::EmptyCorpus)
    }

    /// Entries related to `current`, never including it.
    pub async fn related_to(&self, current: &ContentEntry) -> Result<Vec<ContentEntry>> {
        let corpus = self.corpus().await?;
        let mut cycle = self.related.lock().await;
        cycle.set_source(current, &self.finder, &corpus, &mut rand::thread_rng());
        Ok(cycle.related().to_vec())
    }

    /// Next quote to show after `current`: a random related entry, or
    /// `current` itself when nothing is related.
    ///
    /// The related search runs once per source entry and is reused on
    /// subsequent calls for the same entry.
    pub async fn randomize_related(&self, current: &ContentEntry) -> Result<ContentEntry> {
        let corpus = self.corpus().await?;
        let mut cycle = self.related.lock().await;
        let mut rng = rand::thread_rng();
        cycle.set_source(current, &self.finder, &corpus, &mut rng);
        Ok(cycle.next(current, &mut rng).clone())
    }

    /// Like an entry, returning its new popularity.
    ///
    /// The change is visible to inspiration after the next corpus refresh.
    pub async fn like(&self, entry_id: EntryId) -> Result<u64> {
        let mutator = self
            .popularity
            .as_ref()
            .ok_or_else(|| Error::Config("likes are not enabled for this session".into()))?;
        let popularity = mutator.increment_popularity(entry_id).await?;
        info!(
            subsystem = "search",
            component = "session",
            op = "like",
            entry_id = %entry_id,
            popularity,
            "Entry liked"
        );
        Ok(popularity)
    }

    /// History records, newest first.
    pub async fn history(&self) -> Vec<HistoryRecord> {
        self.ledger.lock().await.list()
    }

    /// Clear history. The streak is unaffected.
    pub async fn clear_history(&self) -> Result<()> {
        self.ledger.lock().await.clear().await
    }

    /// Successful resolutions in this session.
    pub fn streak(&self) -> u64 {
        self.streak.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use moodcanvas_db::test_fixtures::{calm_happy_corpus, entry, popular_entry};
    use moodcanvas_db::{MemoryContentStore, MemoryHistoryStore, PublicUrlResolver};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FailingStore;

    #[async_trait]
    impl ContentStore for FailingStore {
        async fn load_entries(&self) -> Result<Vec<ContentEntry>> {
            Err(Error::NotFound("content table".into()))
        }
    }

    struct FlakyStore {
        down: AtomicBool,
    }

    #[async_trait]
    impl ContentStore for FlakyStore {
        async fn load_entries(&self) -> Result<Vec<ContentEntry>> {
            if self.down.load(Ordering::SeqCst) {
                return Err(Error::ContentStore("connection refused".into()));
            }
            Ok(vec![entry("A", &["calm"])])
        }
    }

    struct SlowStore;

    #[async_trait]
    impl ContentStore for SlowStore {
        async fn load_entries(&self) -> Result<Vec<ContentEntry>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![entry("late", &["calm"])])
        }
    }

    fn session_over(entries: Vec<ContentEntry>) -> (MoodSession, Arc<MemoryHistoryStore>) {
        let history = Arc::new(MemoryHistoryStore::new());
        let session = MoodSession::new(
            EngineConfig::default(),
            Arc::new(MemoryContentStore::new(entries)),
            Arc::new(PublicUrlResolver::new("https://cdn.test", "art")),
            history.clone(),
            OwnerScope::Local,
        );
        (session, history)
    }

    #[tokio::test]
    async fn test_load_corpus_maps_store_failure() {
        let err = load_corpus(&FailingStore, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, Error::ContentStore(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_corpus_times_out() {
        let err = load_corpus(&SlowStore, Duration::from_secs(2)).await.unwrap_err();
        assert!(matches!(err, Error::Timeout(d) if d == Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_load_corpus_rejects_empty_store() {
        let store = MemoryContentStore::new(Vec::new());
        let err = load_corpus(&store, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[tokio::test]
    async fn test_resolve_before_refresh_refuses() {
        let (session, _) = session_over(calm_happy_corpus().entries().to_vec());
        let err = session.resolve_mood("calm").await.unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
        assert_eq!(session.streak(), 0);
    }

    #[tokio::test]
    async fn test_resolve_records_history_and_streak() {
        let (session, store) = session_over(calm_happy_corpus().entries().to_vec());
        session.refresh_corpus().await.unwrap();

        let outcome = session.resolve_mood(" calm ").await.unwrap();
        assert_eq!(outcome.entry.quote, "A");
        assert_eq!(outcome.tier, ResolutionTier::Exact);
        assert_eq!(outcome.streak, 1);
        assert!(outcome.persistence_error.is_none());
        assert_eq!(outcome.image_url, "https://cdn.test/storage/v1/object/public/art/test/1.jpg");

        let record = outcome.record.unwrap();
        assert_eq!(record.query_text, " calm ");
        assert_eq!(record.resolved_image_url, outcome.image_url);
        assert_eq!(session.history().await, vec![record]);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_note_is_recorded() {
        let (session, _) = session_over(calm_happy_corpus().entries().to_vec());
        session.refresh_corpus().await.unwrap();

        let outcome = session
            .resolve_mood_with_note("happy", Some("sunny walk".into()))
            .await
            .unwrap();
        assert_eq!(
            outcome.record.unwrap().personal_note.as_deref(),
            Some("sunny walk")
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_drops_corpus() {
        let content = Arc::new(FlakyStore {
            down: AtomicBool::new(false),
        });
        let session = MoodSession::new(
            EngineConfig::default(),
            content.clone(),
            Arc::new(PublicUrlResolver::new("https://cdn.test", "art")),
            Arc::new(MemoryHistoryStore::new()),
            OwnerScope::Local,
        );
        assert_eq!(session.refresh_corpus().await.unwrap(), 1);
        assert!(session.resolve_mood("calm").await.is_ok());

        content.down.store(true, Ordering::SeqCst);
        assert!(matches!(
            session.refresh_corpus().await.unwrap_err(),
            Error::ContentStore(_)
        ));
        assert!(matches!(
            session.resolve_mood("calm").await.unwrap_err(),
            Error::EmptyCorpus
        ));
        assert!(matches!(
            session.daily_inspiration().await.unwrap_err(),
            Error::EmptyCorpus
        ));
        assert_eq!(session.streak(), 1);
    }

    #[tokio::test]
    async fn test_like_requires_mutator() {
        let (session, _) = session_over(vec![entry("A", &["calm"])]);
        let err = session.like(uuid::Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_like_feeds_inspiration_after_refresh() {
        let entries = vec![entry("A", &["calm"]), entry("B", &["happy"])];
        let liked = entries[1].id;
        let content = Arc::new(MemoryContentStore::new(entries));
        let session = MoodSession::new(
            EngineConfig::default(),
            content.clone(),
            Arc::new(PublicUrlResolver::new("https://cdn.test", "art")),
            Arc::new(MemoryHistoryStore::new()),
            OwnerScope::Local,
        )
        .with_popularity_mutator(content);

        assert_eq!(session.like(liked).await.unwrap(), 1);
        session.refresh_corpus().await.unwrap();
        for _ in 0..20 {
            assert_eq!(session.daily_inspiration().await.unwrap().id, liked);
        }
    }

    #[tokio::test]
    async fn test_personalized_uses_session_history() {
        let (session, _) = session_over(vec![
            popular_entry("popular", &["happy"], 40),
            entry("calm quote", &["calm"]),
        ]);
        session.refresh_corpus().await.unwrap();
        session.resolve_mood("calm").await.unwrap();

        for _ in 0..20 {
            assert_eq!(
                session.personalized_inspiration().await.unwrap().quote,
                "calm quote"
            );
        }
    }

    #[tokio::test]
    async fn test_randomize_related_never_returns_other_source() {
        let (session, _) = session_over(vec![
            entry("The quiet lake at dawn", &["calm"]),
            entry("A quiet mind", &["calm"]),
            entry("Nothing alike", &["happy"]),
        ]);
        session.refresh_corpus().await.unwrap();
        let corpus = session.corpus().await.unwrap();
        let source = corpus.entries()[0].clone();

        for _ in 0..10 {
            let next = session.randomize_related(&source).await.unwrap();
            assert_eq!(next.quote, "A quiet mind");
        }
        let related = session.related_to(&source).await.unwrap();
        assert_eq!(related.len(), 1);
    }

    #[tokio::test]
    async fn test_load_history_hydrates_from_store() {
        let (writer, store) = session_over(calm_happy_corpus().entries().to_vec());
        writer.refresh_corpus().await.unwrap();
        writer.resolve_mood("calm").await.unwrap();
        writer.resolve_mood("happy").await.unwrap();

        let reader = MoodSession::new(
            EngineConfig::default(),
            Arc::new(MemoryContentStore::new(Vec::new())),
            Arc::new(PublicUrlResolver::new("https://cdn.test", "art")),
            store,
            OwnerScope::Local,
        );
        assert_eq!(reader.load_history().await.unwrap(), 2);
        assert_eq!(reader.history().await[0].query_text, "happy");
        assert_eq!(reader.streak(), 0);
    }
}
