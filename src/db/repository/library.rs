//! Library listing repository.
//!
//! The listing is a single LEFT JOIN query so groups without songs still
//! appear. Filter predicates are appended as numbered binds in a fixed
//! order, then the joined rows are folded into one entry per group.

use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::db::models::LibraryRow;
use crate::models::song::GroupEntry;

/// Optional filters for the library listing. `None` leaves a filter out.
#[derive(Debug, Clone, Default)]
pub struct LibraryFilters {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub group_id: Option<i64>,
    pub group_name: Option<String>,
    pub song_id: Option<i64>,
    pub song_name: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub song_text: Option<String>,
    pub link: Option<String>,
}

/// Run the listing query and fold the rows into one entry per group, in
/// the order groups first appear.
pub async fn fetch(
    pool: &PgPool,
    filters: &LibraryFilters,
) -> Result<Vec<GroupEntry>, sqlx::Error> {
    let sql = build_query(filters);

    let mut query = sqlx::query_as::<_, LibraryRow>(&sql);

    // Bind order must match the predicate order in build_query.
    if let Some(group_name) = &filters.group_name {
        query = query.bind(group_name);
    }
    if let Some(group_id) = filters.group_id {
        query = query.bind(group_id);
    }
    if let Some(song_name) = &filters.song_name {
        query = query.bind(song_name);
    }
    if let Some(song_id) = filters.song_id {
        query = query.bind(song_id);
    }
    if let Some(release_date) = filters.release_date {
        query = query.bind(release_date);
    }
    if let Some(song_text) = &filters.song_text {
        query = query.bind(song_text);
    }
    if let Some(link) = &filters.link {
        query = query.bind(link);
    }
    if let Some(offset) = filters.offset {
        query = query.bind(offset);
    }
    if let Some(limit) = filters.limit {
        query = query.bind(limit);
    }

    let rows = query.fetch_all(pool).await?;

    Ok(fold_rows(rows))
}

/// Assemble the listing SQL for the given filters.
fn build_query(filters: &LibraryFilters) -> String {
    let mut sql = String::from(
        "SELECT g.id AS group_id, g.group_name, s.id AS song_id, \
         s.song AS song_name, s.release_date, s.song_text, s.link \
         FROM groups g LEFT JOIN songs s ON g.id = s.group_id",
    );

    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1;

    if filters.group_name.is_some() {
        conditions.push(format!("g.group_name = ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.group_id.is_some() {
        conditions.push(format!("g.id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.song_name.is_some() {
        conditions.push(format!("s.song = ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.song_id.is_some() {
        conditions.push(format!("s.id = ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.release_date.is_some() {
        conditions.push(format!("s.release_date = ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.song_text.is_some() {
        conditions.push(format!("s.song_text = ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.link.is_some() {
        conditions.push(format!("s.link = ${bind_idx}"));
        bind_idx += 1;
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY g.id");

    if filters.offset.is_some() {
        sql.push_str(&format!(" OFFSET ${bind_idx}"));
        bind_idx += 1;
    }
    if filters.limit.is_some() {
        sql.push_str(&format!(" LIMIT ${bind_idx}"));
    }

    sql
}

/// Group joined rows by group id, keeping the order rows came back in.
/// Song columns that are NULL (a group without songs) attach no entry.
fn fold_rows(rows: Vec<LibraryRow>) -> Vec<GroupEntry> {
    let mut entries: Vec<GroupEntry> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();

    for row in rows {
        let position = match index.get(&row.group_id) {
            Some(&position) => position,
            None => {
                index.insert(row.group_id, entries.len());
                entries.push(GroupEntry {
                    group_id: row.group_id,
                    group_name: row.group_name.clone(),
                    song_info: Vec::new(),
                });
                entries.len() - 1
            }
        };

        if let Some(song) = row.song_entry() {
            entries[position].song_info.push(song);
        }
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group_id: i64, group_name: &str, song_id: Option<i64>) -> LibraryRow {
        LibraryRow {
            group_id,
            group_name: group_name.to_string(),
            song_id,
            song_name: song_id.map(|id| format!("song-{id}")),
            release_date: None,
            song_text: None,
            link: None,
        }
    }

    #[test]
    fn test_build_query_without_filters() {
        let sql = build_query(&LibraryFilters::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with("ORDER BY g.id"));
    }

    #[test]
    fn test_build_query_numbers_predicates_in_fixed_order() {
        let filters = LibraryFilters {
            offset: Some(10),
            limit: Some(5),
            group_id: Some(2),
            group_name: Some("Muse".to_string()),
            song_id: Some(7),
            song_name: Some("Hysteria".to_string()),
            release_date: NaiveDate::from_ymd_opt(2003, 12, 1),
            song_text: Some("text".to_string()),
            link: Some("https://example.com".to_string()),
        };

        let sql = build_query(&filters);
        assert!(sql.contains(
            "WHERE g.group_name = $1 AND g.id = $2 AND s.song = $3 AND s.id = $4 \
             AND s.release_date = $5 AND s.song_text = $6 AND s.link = $7"
        ));
        assert!(sql.ends_with("ORDER BY g.id OFFSET $8 LIMIT $9"));
    }

    #[test]
    fn test_build_query_partial_filters_renumber() {
        let filters = LibraryFilters {
            song_name: Some("Hysteria".to_string()),
            limit: Some(3),
            ..LibraryFilters::default()
        };

        let sql = build_query(&filters);
        assert!(sql.contains("WHERE s.song = $1"));
        assert!(sql.ends_with("ORDER BY g.id LIMIT $2"));
    }

    #[test]
    fn test_fold_rows_keeps_first_seen_order() {
        let rows = vec![
            row(3, "Muse", Some(1)),
            row(3, "Muse", Some(2)),
            row(5, "Nirvana", Some(9)),
        ];

        let entries = fold_rows(rows);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].group_id, 3);
        assert_eq!(entries[0].song_info.len(), 2);
        assert_eq!(entries[1].group_id, 5);
        assert_eq!(entries[1].song_info.len(), 1);
    }

    #[test]
    fn test_fold_rows_group_without_songs() {
        let entries = fold_rows(vec![row(4, "Empty Group", None)]);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].song_info.is_empty());
    }
}
