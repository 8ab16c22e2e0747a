//! Verse pagination for song lyrics.
//!
//! Lyrics are stored as one text blob with verses separated by `\n`.

/// Cut a verse window out of `text`.
///
/// An `offset` at or past the last verse yields an empty string. A
/// non-positive `limit` means "to the end", a negative `offset` starts at
/// the first verse. The window is rejoined with `\n`.
pub fn paginate_verses(text: &str, offset: i64, limit: i64) -> String {
    let verses: Vec<&str> = text.split('\n').collect();
    let count = verses.len() as i64;

    if offset >= count {
        return String::new();
    }

    let limit = if limit <= 0 { count } else { limit };
    let offset = offset.max(0);

    let end = offset.saturating_add(limit).min(count);

    verses[offset as usize..end as usize].join("\n")
}
