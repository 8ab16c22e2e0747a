//! Groups repository

use sqlx::PgPool;

/// Look up a group id by name
pub async fn find_by_name(pool: &PgPool, group_name: &str) -> Result<Option<i64>, sqlx::Error> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM groups WHERE group_name = $1")
        .bind(group_name)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.0))
}

/// Insert a group, converging on the existing row when the name is taken.
/// Two racing saves of the same name both get the same id back.
pub async fn save(pool: &PgPool, group_name: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        INSERT INTO groups (group_name)
        VALUES ($1)
        ON CONFLICT (group_name) DO UPDATE SET group_name = EXCLUDED.group_name
        RETURNING id
        "#,
    )
    .bind(group_name)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
