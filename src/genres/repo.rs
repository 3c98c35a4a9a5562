use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ListGenresParams;

#[derive(Debug, Clone, FromRow)]
pub struct Genre {
    pub id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

const GENRE_COLUMNS: &str = "id, name, created_at, updated_at, deleted_at";

pub async fn find_live_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>(&format!(
        "SELECT {GENRE_COLUMNS} FROM genres WHERE id = $1 AND deleted_at IS NULL"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(genre)
}

/// Case-insensitive name lookup among live rows, optionally excluding one id
/// (the row being renamed).
pub async fn find_live_by_name(
    db: &PgPool,
    name: &str,
    exclude: Option<Uuid>,
) -> anyhow::Result<Option<Genre>> {
    let genre = sqlx::query_as::<_, Genre>(&format!(
        r#"
        SELECT {GENRE_COLUMNS}
        FROM genres
        WHERE LOWER(name) = LOWER($1)
          AND deleted_at IS NULL
          AND ($2::uuid IS NULL OR id <> $2)
        "#
    ))
    .bind(name)
    .bind(exclude)
    .fetch_optional(db)
    .await?;
    Ok(genre)
}

pub async fn create(db: &PgPool, name: &str) -> anyhow::Result<Genre> {
    let genre = sqlx::query_as::<_, Genre>(&format!(
        "INSERT INTO genres (name) VALUES ($1) RETURNING {GENRE_COLUMNS}"
    ))
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(genre)
}

pub async fn list(db: &PgPool, params: &ListGenresParams) -> anyhow::Result<(Vec<Genre>, i64)> {
    let sql = format!(
        r#"
        SELECT {GENRE_COLUMNS}
        FROM genres
        WHERE deleted_at IS NULL
          AND name ILIKE '%' || $1 || '%'
        ORDER BY name {}
        LIMIT $2 OFFSET $3
        "#,
        params.order_by_name.as_sql()
    );
    let genres = sqlx::query_as::<_, Genre>(&sql)
        .bind(&params.search)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM genres
        WHERE deleted_at IS NULL
          AND name ILIKE '%' || $1 || '%'
        "#,
    )
    .bind(&params.search)
    .fetch_one(db)
    .await?;

    Ok((genres, total))
}

pub async fn rename(db: &PgPool, id: Uuid, name: &str) -> anyhow::Result<Genre> {
    let genre = sqlx::query_as::<_, Genre>(&format!(
        r#"
        UPDATE genres
        SET name = $2, updated_at = now()
        WHERE id = $1
        RETURNING {GENRE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .fetch_one(db)
    .await?;
    Ok(genre)
}

pub async fn soft_delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE genres SET deleted_at = now() WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
