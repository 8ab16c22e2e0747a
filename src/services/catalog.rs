//! Catalog use cases.
//!
//! One method per endpoint. Route handlers stay thin; the decisions about
//! when to call the info provider, how to normalize inputs and which
//! taxonomy error to raise all live here.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::db::models::{NewSong, SongPatch};
use crate::db::repository::library::{self, LibraryFilters};
use crate::db::repository::{groups, songs};
use crate::error::{ApiError, ApiResult};
use crate::models::song::{parse_release_date, GroupEntry, Patch, SongUpdateRequest};
use crate::services::link_check::LinkChecker;
use crate::services::lyrics::paginate_verses;
use crate::services::music_info::MusicInfoClient;

/// The catalog service, shared across handlers through `AppState`.
pub struct CatalogService {
    pool: PgPool,
    music_info: MusicInfoClient,
    link_checker: LinkChecker,
}

impl CatalogService {
    pub fn new(pool: PgPool, music_info: MusicInfoClient, link_checker: LinkChecker) -> Self {
        Self {
            pool,
            music_info,
            link_checker,
        }
    }

    /// Save a song, enriching it through the info provider.
    ///
    /// An already known (group, song) pair short-circuits to its existing
    /// ids without touching the provider. The group row is only created
    /// after enrichment succeeds, so a failed lookup leaves nothing behind.
    pub async fn save_song(&self, group: &str, song: &str) -> ApiResult<(i64, i64)> {
        let existing_group = groups::find_by_name(&self.pool, group).await?;

        if let Some(group_id) = existing_group {
            debug!("group '{}' already exists (id {})", group, group_id);

            if let Some(song_id) = songs::find_by_name(&self.pool, song, group_id).await? {
                debug!("song '{}' already exists (id {}), returning ids", song, song_id);
                return Ok((group_id, song_id));
            }
        }

        let details = self.music_info.get_song_info(group, song).await?;

        let group_id = match existing_group {
            Some(id) => id,
            None => {
                let id = groups::save(&self.pool, group).await?;
                debug!("group '{}' saved (id {})", group, id);
                id
            }
        };

        let new_song = NewSong {
            song: song.to_string(),
            release_date: parse_provider_date(&details.release_date),
            song_text: Some(details.text),
            link: Some(details.link),
            group_id,
        };

        let song_id = songs::save(&self.pool, &new_song).await?;

        debug!("song '{}' saved (group {}, song {})", song, group_id, song_id);

        Ok((group_id, song_id))
    }

    /// List the library. An empty result is reported as `NothingFound`.
    pub async fn get_library(&self, filters: &LibraryFilters) -> ApiResult<Vec<GroupEntry>> {
        let entries = library::fetch(&self.pool, filters).await?;

        if entries.is_empty() {
            return Err(ApiError::NothingFound);
        }

        Ok(entries)
    }

    /// Fetch lyrics, optionally narrowed to a verse window. Offset and
    /// limit both zero return the stored text untouched.
    pub async fn get_song_text(
        &self,
        song_id: i64,
        offset: i64,
        limit: i64,
    ) -> ApiResult<(String, String)> {
        let (song_name, song_text) = songs::get_text(&self.pool, song_id)
            .await?
            .ok_or(ApiError::SongNotFound)?;

        if offset == 0 && limit == 0 {
            return Ok((song_name, song_text));
        }

        let page = paginate_verses(&song_text, offset, limit);

        Ok((song_name, page))
    }

    /// Apply a partial update. Absent fields stay untouched; null or empty
    /// fields clear their column. Returns the changes that were applied.
    pub async fn update_song(
        &self,
        song_id: i64,
        req: SongUpdateRequest,
    ) -> ApiResult<SongPatch> {
        let song_name = match req.song_name.empty_as_clear() {
            Patch::Clear => {
                return Err(ApiError::InvalidInput(
                    "song name cannot be empty".to_string(),
                ))
            }
            other => other,
        };

        let release_date = match req.release_date.empty_as_clear() {
            Patch::Set(raw) => match parse_release_date(&raw) {
                Ok(date) => Patch::Set(date),
                Err(_) => {
                    return Err(ApiError::InvalidInput(
                        "release date is invalid, correct format: DD.MM.YYYY".to_string(),
                    ))
                }
            },
            Patch::Clear => Patch::Clear,
            Patch::Unchanged => Patch::Unchanged,
        };

        let link = req.link.empty_as_clear();
        if let Patch::Set(link_value) = &link {
            if !self.link_checker.validate(link_value).await {
                return Err(ApiError::InvalidInput("link is invalid".to_string()));
            }
        }

        let patch = SongPatch {
            song_name,
            release_date,
            song_text: req.song_text.empty_as_clear(),
            link,
        };

        if patch.is_empty() {
            return Err(ApiError::NoFieldsToUpdate);
        }

        // Renaming a song onto a name its group already holds trips the
        // (song, group_id) uniqueness.
        let updated = songs::update(&self.pool, song_id, &patch)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    ApiError::Conflict("song already exists in this group".to_string())
                }
                _ => ApiError::Database(err),
            })?;

        if updated == 0 {
            return Err(ApiError::SongNotFound);
        }

        debug!("song {} updated", song_id);

        Ok(patch)
    }

    /// Delete a song. Repeating the call reports not found.
    pub async fn delete_song(&self, song_id: i64) -> ApiResult<()> {
        let deleted = songs::delete(&self.pool, song_id).await?;

        if deleted == 0 {
            return Err(ApiError::SongNotFound);
        }

        debug!("song {} deleted", song_id);

        Ok(())
    }
}

/// Parse the provider's release date. An unparseable date is logged and
/// stored as NULL instead of failing the save.
fn parse_provider_date(raw: &str) -> Option<NaiveDate> {
    match parse_release_date(raw) {
        Ok(date) => Some(date),
        Err(err) => {
            warn!("unparseable release date '{}' from provider: {}", raw, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_provider_date_valid() {
        let date = parse_provider_date("16.07.2006").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2006, 7, 16).unwrap());
    }

    #[test]
    fn test_parse_provider_date_tolerates_garbage() {
        assert!(parse_provider_date("July 16, 2006").is_none());
        assert!(parse_provider_date("").is_none());
    }
}
