//! Song endpoints.
//!
//! Save, lyrics retrieval, partial update and delete. All heavy lifting
//! happens in the catalog service; handlers translate between HTTP and
//! service calls.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::models::song::{format_release_date, SongUpdateRequest, UpdateInfo};
use crate::AppState;

/// Request to save a song.
#[derive(Debug, Deserialize)]
pub struct SaveSongRequest {
    pub group: String,
    pub song: String,
}

/// Response with the stored identifiers.
#[derive(Debug, Serialize)]
pub struct SaveSongResponse {
    pub group_id: i64,
    pub song_id: i64,
}

/// POST /song - Save a song, enriching it via the info provider
pub async fn save_song(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveSongRequest>,
) -> ApiResult<Json<SaveSongResponse>> {
    if req.group.is_empty() || req.song.is_empty() {
        return Err(ApiError::InvalidInput(
            "group and song are required".to_string(),
        ));
    }

    let (group_id, song_id) = state.catalog.save_song(&req.group, &req.song).await?;

    Ok(Json(SaveSongResponse { group_id, song_id }))
}

/// Verse window for lyrics. Both default to zero, which means the whole
/// text.
#[derive(Debug, Deserialize)]
pub struct VerseQuery {
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub limit: i64,
}

/// Response carrying lyrics.
#[derive(Debug, Serialize)]
pub struct SongTextResponse {
    pub song_id: i64,
    pub song_name: String,
    pub song_text: String,
}

/// GET /song/:id/text - Get lyrics, paginated by verse
pub async fn get_song_text(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(query): Query<VerseQuery>,
) -> ApiResult<Json<SongTextResponse>> {
    let (song_name, song_text) = state
        .catalog
        .get_song_text(id, query.offset, query.limit)
        .await?;

    Ok(Json(SongTextResponse {
        song_id: id,
        song_name,
        song_text,
    }))
}

/// Response echoing the applied changes.
#[derive(Debug, Serialize)]
pub struct SongUpdateResponse {
    pub song_id: i64,
    pub update_info: UpdateInfo,
}

/// PATCH /song/:id - Partially update a song
pub async fn update_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<SongUpdateRequest>,
) -> ApiResult<Json<SongUpdateResponse>> {
    let patch = state.catalog.update_song(id, req).await?;

    let update_info = UpdateInfo {
        song_name: patch.song_name,
        release_date: patch.release_date.map(format_release_date),
        song_text: patch.song_text,
        link: patch.link,
    };

    Ok(Json(SongUpdateResponse {
        song_id: id,
        update_info,
    }))
}

/// DELETE /song/:id - Delete a song
pub async fn delete_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<serde_json::Value>> {
    state.catalog.delete_song(id).await?;

    Ok(Json(serde_json::json!({
        "message": "song deleted",
        "song_id": id
    })))
}
