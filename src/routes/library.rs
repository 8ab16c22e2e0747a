//! Library listing endpoint.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::repository::library::LibraryFilters;
use crate::error::{ApiError, ApiResult};
use crate::models::song::{parse_release_date, GroupEntry};
use crate::AppState;

/// Raw query parameters of the listing.
#[derive(Debug, Default, Deserialize)]
pub struct LibraryQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub group_id: Option<i64>,
    pub group: Option<String>,
    pub song_id: Option<i64>,
    pub song: Option<String>,
    pub release_date: Option<String>,
    pub song_text: Option<String>,
    pub link: Option<String>,
}

impl LibraryQuery {
    /// Normalize into store filters. Empty strings and non-positive
    /// offset/limit count as "not specified"; the date filter must parse.
    fn into_filters(self) -> Result<LibraryFilters, ApiError> {
        let release_date = match self.release_date.filter(|s| !s.is_empty()) {
            Some(raw) => match parse_release_date(&raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    return Err(ApiError::InvalidInput(
                        "release date is invalid".to_string(),
                    ))
                }
            },
            None => None,
        };

        Ok(LibraryFilters {
            offset: self.offset.filter(|&v| v > 0),
            limit: self.limit.filter(|&v| v > 0),
            group_id: self.group_id,
            group_name: self.group.filter(|s| !s.is_empty()),
            song_id: self.song_id,
            song_name: self.song.filter(|s| !s.is_empty()),
            release_date,
            song_text: self.song_text.filter(|s| !s.is_empty()),
            link: self.link.filter(|s| !s.is_empty()),
        })
    }
}

/// Response wrapping the listing.
#[derive(Debug, Serialize)]
pub struct LibraryResponse {
    pub library: Vec<GroupEntry>,
}

/// GET /library - List groups with their songs
pub async fn get_library(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LibraryQuery>,
) -> ApiResult<Json<LibraryResponse>> {
    let filters = query.into_filters()?;

    let library = state.catalog.get_library(&filters).await?;

    Ok(Json(LibraryResponse { library }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_offset_and_limit_are_disabled() {
        let query = LibraryQuery {
            offset: Some(-3),
            limit: Some(0),
            ..LibraryQuery::default()
        };

        let filters = query.into_filters().unwrap();
        assert_eq!(filters.offset, None);
        assert_eq!(filters.limit, None);
    }

    #[test]
    fn test_positive_offset_and_limit_pass_through() {
        let query = LibraryQuery {
            offset: Some(10),
            limit: Some(5),
            ..LibraryQuery::default()
        };

        let filters = query.into_filters().unwrap();
        assert_eq!(filters.offset, Some(10));
        assert_eq!(filters.limit, Some(5));
    }

    #[test]
    fn test_empty_strings_are_not_filters() {
        let query = LibraryQuery {
            group: Some(String::new()),
            song: Some(String::new()),
            release_date: Some(String::new()),
            ..LibraryQuery::default()
        };

        let filters = query.into_filters().unwrap();
        assert_eq!(filters.group_name, None);
        assert_eq!(filters.song_name, None);
        assert_eq!(filters.release_date, None);
    }

    #[test]
    fn test_release_date_filter_parses() {
        let query = LibraryQuery {
            release_date: Some("16.07.2006".to_string()),
            ..LibraryQuery::default()
        };

        let filters = query.into_filters().unwrap();
        assert!(filters.release_date.is_some());
    }

    #[test]
    fn test_bad_release_date_filter_is_invalid_input() {
        let query = LibraryQuery {
            release_date: Some("2006-07-16".to_string()),
            ..LibraryQuery::default()
        };

        assert!(matches!(
            query.into_filters(),
            Err(ApiError::InvalidInput(_))
        ));
    }
}
