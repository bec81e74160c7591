//! String similarity kernels for fuzzy tag matching.

use moodcanvas_core::{Error, Result};

/// Levenshtein edit distance between two strings, counted in characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single rolling row: row[j] is the distance between a[..i] and b[..j].
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Edit distance scaled to 0.0 (identical) through 1.0 (nothing in common).
///
/// The distance is divided by the longer string's length. Both inputs must
/// be non-empty.
pub fn normalized_distance(a: &str, b: &str) -> Result<f64> {
    let longest = a.chars().count().max(b.chars().count());
    if a.is_empty() || b.is_empty() {
        return Err(Error::Match(format!(
            "cannot compare empty string (lengths {} and {})",
            a.len(),
            b.len()
        )));
    }
    Ok(levenshtein(a, b) as f64 / longest as f64)
}
