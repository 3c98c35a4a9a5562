use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::ListBooksParams;

#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub writer: String,
    pub publisher: String,
    pub publication_year: i32,
    pub description: Option<String>,
    pub price: i64,
    pub stock_quantity: i32,
    pub genre_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

/// Book joined with its genre name, as the list/detail endpoints render it.
#[derive(Debug, Clone, FromRow)]
pub struct BookWithGenre {
    pub id: Uuid,
    pub title: String,
    pub writer: String,
    pub publisher: String,
    pub publication_year: i32,
    pub description: Option<String>,
    pub price: i64,
    pub stock_quantity: i32,
    pub genre: String,
}

const BOOK_COLUMNS: &str = "id, title, writer, publisher, publication_year, description, \
     price, stock_quantity, genre_id, created_at, updated_at, deleted_at";

const JOINED_COLUMNS: &str = "b.id, b.title, b.writer, b.publisher, b.publication_year, \
     b.description, b.price, b.stock_quantity, g.name AS genre";

pub struct NewBook<'a> {
    pub title: &'a str,
    pub writer: &'a str,
    pub publisher: &'a str,
    pub publication_year: i32,
    pub description: Option<&'a str>,
    pub price: i64,
    pub stock_quantity: i32,
    pub genre_id: Uuid,
}

pub async fn find_live_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<BookWithGenre>> {
    let book = sqlx::query_as::<_, BookWithGenre>(&format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM books b
        JOIN genres g ON g.id = b.genre_id
        WHERE b.id = $1 AND b.deleted_at IS NULL
        "#
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(book)
}

/// Case-insensitive title lookup among live rows.
pub async fn find_live_by_title(db: &PgPool, title: &str) -> anyhow::Result<Option<Book>> {
    let book = sqlx::query_as::<_, Book>(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE LOWER(title) = LOWER($1) AND deleted_at IS NULL"
    ))
    .bind(title)
    .fetch_optional(db)
    .await?;
    Ok(book)
}

pub async fn create(db: &PgPool, new: &NewBook<'_>) -> anyhow::Result<Book> {
    let book = sqlx::query_as::<_, Book>(&format!(
        r#"
        INSERT INTO books
            (title, writer, publisher, publication_year, description, price, stock_quantity, genre_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING {BOOK_COLUMNS}
        "#
    ))
    .bind(new.title)
    .bind(new.writer)
    .bind(new.publisher)
    .bind(new.publication_year)
    .bind(new.description)
    .bind(new.price)
    .bind(new.stock_quantity)
    .bind(new.genre_id)
    .fetch_one(db)
    .await?;
    Ok(book)
}

/// Paged listing over all live books; search matches title, writer or
/// publisher (empty search matches everything).
pub async fn list(
    db: &PgPool,
    params: &ListBooksParams,
) -> anyhow::Result<(Vec<BookWithGenre>, i64)> {
    let sql = format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM books b
        JOIN genres g ON g.id = b.genre_id
        WHERE b.deleted_at IS NULL
          AND (b.title ILIKE '%' || $1 || '%'
            OR b.writer ILIKE '%' || $1 || '%'
            OR b.publisher ILIKE '%' || $1 || '%')
        ORDER BY b.title {}, b.publication_year {}
        LIMIT $2 OFFSET $3
        "#,
        params.order_by_title.as_sql(),
        params.order_by_publish_date.as_sql()
    );
    let books = sqlx::query_as::<_, BookWithGenre>(&sql)
        .bind(&params.search)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM books b
        WHERE b.deleted_at IS NULL
          AND (b.title ILIKE '%' || $1 || '%'
            OR b.writer ILIKE '%' || $1 || '%'
            OR b.publisher ILIKE '%' || $1 || '%')
        "#,
    )
    .bind(&params.search)
    .fetch_one(db)
    .await?;

    Ok((books, total))
}

/// Paged listing restricted to one genre; search matches title or writer.
pub async fn list_by_genre(
    db: &PgPool,
    genre_id: Uuid,
    params: &ListBooksParams,
) -> anyhow::Result<(Vec<BookWithGenre>, i64)> {
    let sql = format!(
        r#"
        SELECT {JOINED_COLUMNS}
        FROM books b
        JOIN genres g ON g.id = b.genre_id
        WHERE b.genre_id = $1
          AND b.deleted_at IS NULL
          AND (b.title ILIKE '%' || $2 || '%'
            OR b.writer ILIKE '%' || $2 || '%')
        ORDER BY b.title {}, b.publication_year {}
        LIMIT $3 OFFSET $4
        "#,
        params.order_by_title.as_sql(),
        params.order_by_publish_date.as_sql()
    );
    let books = sqlx::query_as::<_, BookWithGenre>(&sql)
        .bind(genre_id)
        .bind(&params.search)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(db)
        .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM books b
        WHERE b.genre_id = $1
          AND b.deleted_at IS NULL
          AND (b.title ILIKE '%' || $2 || '%'
            OR b.writer ILIKE '%' || $2 || '%')
        "#,
    )
    .bind(genre_id)
    .bind(&params.search)
    .fetch_one(db)
    .await?;

    Ok((books, total))
}

/// Applies the PATCH allow-list; absent fields keep their current value.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    description: Option<&str>,
    price: Option<i64>,
    stock_quantity: Option<i32>,
) -> anyhow::Result<Book> {
    let book = sqlx::query_as::<_, Book>(&format!(
        r#"
        UPDATE books
        SET description = COALESCE($2, description),
            price = COALESCE($3, price),
            stock_quantity = COALESCE($4, stock_quantity),
            updated_at = now()
        WHERE id = $1
        RETURNING {BOOK_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(description)
    .bind(price)
    .bind(stock_quantity)
    .fetch_one(db)
    .await?;
    Ok(book)
}

pub async fn soft_delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
    sqlx::query("UPDATE books SET deleted_at = now() WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
