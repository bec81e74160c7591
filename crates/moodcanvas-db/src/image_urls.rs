//! Display URL resolution for artwork references.

use moodcanvas_core::ImageResolver;

/// Resolves storage-relative artwork paths against a public storage bucket.
///
/// Absolute `http://` and `https://` references are already displayable and
/// pass through unchanged. Relative paths become
/// `{base_url}/storage/v1/object/public/{bucket}/{path}`.
///
/// # Example
/// ```
/// use moodcanvas_db::PublicUrlResolver;
/// use moodcanvas_core::ImageResolver;
///
/// let resolver = PublicUrlResolver::new("https://cdn.example.com/", "mood_images");
/// assert_eq!(
///     resolver.resolve_display_url("calm/lake.jpg"),
///     "https://cdn.example.com/storage/v1/object/public/mood_images/calm/lake.jpg"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct PublicUrlResolver {
    base_url: String,
    bucket: String,
}

impl PublicUrlResolver {
    pub fn new(base_url: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into().trim_matches('/').to_string(),
        }
    }
}

impl ImageResolver for PublicUrlResolver {
    fn resolve_display_url(&self, image_ref: &str) -> String {
        let image_ref = image_ref.trim();
        if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            return image_ref.to_string();
        }
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.bucket,
            image_ref.trim_start_matches('/')
        )
    }
}
