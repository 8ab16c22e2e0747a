//! Songs repository

use sqlx::PgPool;

use crate::db::models::{NewSong, SongPatch};

/// Look up a song id by name within a group
pub async fn find_by_name(
    pool: &PgPool,
    song_name: &str,
    group_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM songs WHERE song = $1 AND group_id = $2")
            .bind(song_name)
            .bind(group_id)
            .fetch_optional(pool)
            .await?;

    Ok(row.map(|r| r.0))
}

/// Insert a song, converging on the existing row when the (song, group)
/// pair already exists
pub async fn save(pool: &PgPool, song: &NewSong) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO songs (song, release_date, song_text, link, group_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (song, group_id) DO UPDATE SET song = EXCLUDED.song
        RETURNING id
        "#,
    )
    .bind(&song.song)
    .bind(song.release_date)
    .bind(&song.song_text)
    .bind(&song.link)
    .bind(song.group_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Delete a song by id, returning the number of rows removed
pub async fn delete(pool: &PgPool, song_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM songs WHERE id = $1")
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Fetch a song's name and lyrics. NULL lyrics read as an empty string.
pub async fn get_text(
    pool: &PgPool,
    song_id: i64,
) -> Result<Option<(String, String)>, sqlx::Error> {
    sqlx::query_as("SELECT song, COALESCE(song_text, '') FROM songs WHERE id = $1")
        .bind(song_id)
        .fetch_optional(pool)
        .await
}

/// Apply a partial update, returning the number of rows touched.
///
/// The SET clause holds exactly the changed fields; a cleared field binds
/// NULL. An empty patch touches nothing and reports zero rows.
pub async fn update(pool: &PgPool, song_id: i64, patch: &SongPatch) -> Result<u64, sqlx::Error> {
    let sql = match build_update_sql(patch) {
        Some(sql) => sql,
        None => return Ok(0),
    };

    let mut query = sqlx::query(&sql);

    // Bind order must match the SET clause order in build_update_sql.
    if !patch.song_name.is_unchanged() {
        query = query.bind(patch.song_name.to_option());
    }
    if !patch.release_date.is_unchanged() {
        query = query.bind(patch.release_date.to_option());
    }
    if !patch.song_text.is_unchanged() {
        query = query.bind(patch.song_text.to_option());
    }
    if !patch.link.is_unchanged() {
        query = query.bind(patch.link.to_option());
    }

    let result = query.bind(song_id).execute(pool).await?;

    Ok(result.rows_affected())
}

/// Render the UPDATE statement for the changed patch fields, with the
/// WHERE id bind last. Returns `None` when nothing changed.
fn build_update_sql(patch: &SongPatch) -> Option<String> {
    let mut sets: Vec<String> = Vec::new();
    let mut bind_idx = 1;

    if !patch.song_name.is_unchanged() {
        sets.push(format!("song = ${bind_idx}"));
        bind_idx += 1;
    }
    if !patch.release_date.is_unchanged() {
        sets.push(format!("release_date = ${bind_idx}"));
        bind_idx += 1;
    }
    if !patch.song_text.is_unchanged() {
        sets.push(format!("song_text = ${bind_idx}"));
        bind_idx += 1;
    }
    if !patch.link.is_unchanged() {
        sets.push(format!("link = ${bind_idx}"));
        bind_idx += 1;
    }

    if sets.is_empty() {
        return None;
    }

    Some(format!(
        "UPDATE songs SET {} WHERE id = ${}",
        sets.join(", "),
        bind_idx
    ))
}
