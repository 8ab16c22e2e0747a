//! Database row types for PostgreSQL.
//!
//! These types map directly to database rows and convert into the API
//! response types in models/song.rs.

use chrono::NaiveDate;
use sqlx::FromRow;

use crate::models::song::{format_release_date, Patch, SongEntry};

/// Joined library row: group columns plus the song columns of the LEFT
/// JOIN, which are NULL for groups without songs.
#[derive(Debug, Clone, FromRow)]
pub struct LibraryRow {
    pub group_id: i64,
    pub group_name: String,
    pub song_id: Option<i64>,
    pub song_name: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub song_text: Option<String>,
    pub link: Option<String>,
}

impl LibraryRow {
    /// Song entry for this row, or `None` when the join produced no song.
    pub fn song_entry(&self) -> Option<SongEntry> {
        let song_id = self.song_id?;

        Some(SongEntry {
            song_id,
            song_name: self.song_name.clone().unwrap_or_default(),
            release_date: self.release_date.map(format_release_date),
            song_text: self.song_text.clone(),
            link: self.link.clone(),
        })
    }
}

/// New song to insert.
#[derive(Debug, Clone)]
pub struct NewSong {
    pub song: String,
    pub release_date: Option<NaiveDate>,
    pub song_text: Option<String>,
    pub link: Option<String>,
    pub group_id: i64,
}

/// Field changes for a partial song update.
#[derive(Debug, Clone, Default)]
pub struct SongPatch {
    pub song_name: Patch<String>,
    pub release_date: Patch<NaiveDate>,
    pub song_text: Patch<String>,
    pub link: Patch<String>,
}

impl SongPatch {
    /// True when no field carries a change.
    pub fn is_empty(&self) -> bool {
        self.song_name.is_unchanged()
            && self.release_date.is_unchanged()
            && self.song_text.is_unchanged()
            && self.link.is_unchanged()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_entry_none_without_song_columns() {
        let row = LibraryRow {
            group_id: 1,
            group_name: "Muse".to_string(),
            song_id: None,
            song_name: None,
            release_date: None,
            song_text: None,
            link: None,
        };

        assert!(row.song_entry().is_none());
    }

    #[test]
    fn test_song_entry_formats_release_date() {
        let row = LibraryRow {
            group_id: 1,
            group_name: "Muse".to_string(),
            song_id: Some(7),
            song_name: Some("Supermassive Black Hole".to_string()),
            release_date: NaiveDate::from_ymd_opt(2006, 7, 16),
            song_text: Some("Ooh baby, don't you know I suffer?".to_string()),
            link: Some("https://example.com/watch".to_string()),
        };

        let entry = row.song_entry().unwrap();
        assert_eq!(entry.song_id, 7);
        assert_eq!(entry.release_date.as_deref(), Some("16.07.2006"));
    }

    #[test]
    fn test_song_patch_is_empty() {
        assert!(SongPatch::default().is_empty());

        let patch = SongPatch {
            link: Patch::Clear,
            ..SongPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
