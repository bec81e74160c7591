//! Data models for moodcanvas.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::defaults::ANONYMOUS_AUTHOR;
use crate::error::{Error, Result};
use crate::tags::normalize_tags;

/// Identifier of a curated content entry.
pub type EntryId = Uuid;

// =============================================================================
// CONTENT
// =============================================================================

/// One curated piece of content: a quote with its author, mood tags, artwork
/// reference and color theme.
///
/// The engine only ever reads entries. `popularity` is raised by an external
/// "like" collaborator and observed on the next corpus load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: EntryId,
    pub quote: String,
    #[serde(default = "default_author")]
    pub author: String,
    /// Normalized (trimmed, lower-cased, deduplicated) mood tags.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: Vec<String>,
    /// Opaque artwork reference (URL or storage-relative path).
    pub image_ref: String,
    /// Ordered color tokens for presentation.
    #[serde(default)]
    pub theme: Vec<String>,
    #[serde(default)]
    pub popularity: u64,
}

fn default_author() -> String {
    ANONYMOUS_AUTHOR.to_string()
}

fn deserialize_tags<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_tags(raw))
}

impl ContentEntry {
    /// Create an entry with a fresh id, no tags, no theme and zero popularity.
    pub fn new(
        quote: impl Into<String>,
        author: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), quote, author, image_ref)
    }

    /// Create an entry with a known id.
    pub fn with_id(
        id: EntryId,
        quote: impl Into<String>,
        author: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        let author = author.into();
        Self {
            id,
            quote: quote.into(),
            author: if author.trim().is_empty() {
                default_author()
            } else {
                author
            },
            tags: Vec::new(),
            image_ref: image_ref.into(),
            theme: Vec::new(),
            popularity: 0,
        }
    }

    /// Replace the tags, normalizing them.
    pub fn tagged<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Replace the color theme.
    pub fn themed<I, S>(mut self, theme: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.theme = theme.into_iter().map(Into::into).collect();
        self
    }

    /// Set the popularity counter.
    pub fn with_popularity(mut self, popularity: u64) -> Self {
        self.popularity = popularity;
        self
    }

    /// Whether any tag equals `normalized_tag`.
    ///
    /// The argument must already be normalized.
    pub fn has_tag(&self, normalized_tag: &str) -> bool {
        self.tags.iter().any(|t| t == normalized_tag)
    }

    /// Check the entry is usable: the quote must not be blank.
    pub fn validate(&self) -> Result<()> {
        if self.quote.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "entry {} has an empty quote",
                self.id
            )));
        }
        Ok(())
    }
}

// =============================================================================
// HISTORY
// =============================================================================

/// Who a history record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum OwnerScope {
    /// Anonymous visitor; history stays on the device.
    #[default]
    Local,
    /// Signed-in user.
    User(Uuid),
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// One stored resolution. Never mutated after insertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    /// Raw user input, possibly empty.
    pub query_text: String,
    pub resolved_entry_id: EntryId,
    pub resolved_image_url: String,
    pub resolved_quote: String,
    pub resolved_author: String,
    pub theme: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_note: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub owner_scope: OwnerScope,
}

/// A history record before the ledger stores it.
///
/// `id` and `created_at` are assigned on append when absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoryRecordInput {
    pub id: Option<Uuid>,
    pub query_text: String,
    pub resolved_entry_id: EntryId,
    pub resolved_image_url: String,
    pub resolved_quote: String,
    pub resolved_author: String,
    pub theme: Vec<String>,
    pub personal_note: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub owner_scope: OwnerScope,
}

impl HistoryRecordInput {
    /// Build the input for a resolved entry.
    ///
    /// `display_url` comes from the image resolver; the engine never derives
    /// it from `image_ref` itself.
    pub fn for_entry(
        query_text: impl Into<String>,
        entry: &ContentEntry,
        display_url: impl Into<String>,
        owner_scope: OwnerScope,
    ) -> Self {
        Self {
            id: None,
            query_text: query_text.into(),
            resolved_entry_id: entry.id,
            resolved_image_url: display_url.into(),
            resolved_quote: entry.quote.clone(),
            resolved_author: entry.author.clone(),
            theme: entry.theme.clone(),
            personal_note: None,
            created_at: None,
            owner_scope,
        }
    }

    /// Attach a personal note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.personal_note = Some(note.into());
        self
    }

    /// Finalize into a record, assigning a time-ordered id and the current
    /// time where missing.
    pub fn into_record(self) -> HistoryRecord {
        HistoryRecord {
            id: self.id.unwrap_or_else(Uuid::now_v7),
            query_text: self.query_text,
            resolved_entry_id: self.resolved_entry_id,
            resolved_image_url: self.resolved_image_url,
            resolved_quote: self.resolved_quote,
            resolved_author: self.resolved_author,
            theme: self.theme,
            personal_note: self.personal_note,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            owner_scope: self.owner_scope,
        }
    }
}
