use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::dto::OrderItemRequest;
use super::stats::GenreSales;

/// Checkout failures surfaced to the caller before anything is committed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("User not found")]
    UserNotFound,
    #[error("Book {0} not found")]
    BookNotFound(Uuid),
    #[error("Quantity must be greater than zero")]
    InvalidQuantity,
    #[error("Insufficient stock for {0}")]
    InsufficientStock(String),
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

#[derive(Debug)]
pub struct CheckoutOutcome {
    pub order_id: Uuid,
    pub total_quantity: i64,
    pub total_price: i64,
}

#[derive(Debug, FromRow)]
struct LockedBook {
    id: Uuid,
    title: String,
    price: i64,
    stock_quantity: i32,
}

/// Records an order with its line items and decrements stock, all inside one
/// database transaction. Each book row is taken `FOR UPDATE` before its stock
/// is read, so two concurrent purchases of the same book serialize and the
/// decrement can never drive stock below zero; any validation failure rolls
/// the whole order back.
pub async fn create_order(
    db: &PgPool,
    user_id: Uuid,
    items: &[OrderItemRequest],
) -> Result<CheckoutOutcome, CheckoutError> {
    let mut tx = db.begin().await?;

    let user = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
    if user.is_none() {
        return Err(CheckoutError::UserNotFound);
    }

    let mut total_quantity: i64 = 0;
    let mut total_price: i64 = 0;
    let mut lines: Vec<(LockedBook, i32)> = Vec::with_capacity(items.len());

    for item in items {
        if item.quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let book = sqlx::query_as::<_, LockedBook>(
            r#"
            SELECT id, title, price, stock_quantity
            FROM books
            WHERE id = $1 AND deleted_at IS NULL
            FOR UPDATE
            "#,
        )
        .bind(item.book_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CheckoutError::BookNotFound(item.book_id))?;

        if book.stock_quantity < item.quantity {
            return Err(CheckoutError::InsufficientStock(book.title));
        }

        total_quantity += i64::from(item.quantity);
        total_price += book.price * i64::from(item.quantity);
        lines.push((book, item.quantity));
    }

    let order_id =
        sqlx::query_scalar::<_, Uuid>("INSERT INTO orders (user_id) VALUES ($1) RETURNING id")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

    for (position, (book, quantity)) in lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO order_items (order_id, book_id, quantity, position)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order_id)
        .bind(book.id)
        .bind(*quantity)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;

        // The per-line check above already passed under the row lock; the
        // predicate here still guards against a repeated book id whose
        // combined quantity overdraws the stock.
        let updated = sqlx::query(
            r#"
            UPDATE books
            SET stock_quantity = stock_quantity - $2, updated_at = now()
            WHERE id = $1 AND stock_quantity >= $2
            "#,
        )
        .bind(book.id)
        .bind(*quantity)
        .execute(&mut *tx)
        .await?;
        if updated.rows_affected() == 0 {
            return Err(CheckoutError::InsufficientStock(book.title.clone()));
        }
    }

    tx.commit().await?;

    info!(order_id = %order_id, user_id = %user_id, total_quantity, total_price, "order committed");
    Ok(CheckoutOutcome {
        order_id,
        total_quantity,
        total_price,
    })
}

#[derive(Debug, FromRow)]
pub struct OrderSummary {
    pub id: Uuid,
    pub total_quantity: i64,
    pub total_price: i64,
}

pub async fn list_orders(db: &PgPool) -> anyhow::Result<Vec<OrderSummary>> {
    let orders = sqlx::query_as::<_, OrderSummary>(
        r#"
        SELECT o.id,
               COALESCE(SUM(oi.quantity), 0)::BIGINT AS total_quantity,
               COALESCE(SUM(oi.quantity::BIGINT * b.price), 0)::BIGINT AS total_price
        FROM orders o
        LEFT JOIN order_items oi ON oi.order_id = o.id
        LEFT JOIN books b ON b.id = oi.book_id
        GROUP BY o.id, o.created_at
        ORDER BY o.created_at
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(orders)
}

#[derive(Debug, FromRow)]
pub struct OrderLine {
    pub book_id: Uuid,
    pub book_title: String,
    pub quantity: i32,
    pub subtotal_price: i64,
}

/// Line items for one order, in the order they were purchased. Books are
/// joined without the soft-delete filter: history keeps referencing books
/// that were removed from the catalog later.
pub async fn find_order_lines(db: &PgPool, order_id: Uuid) -> anyhow::Result<Option<Vec<OrderLine>>> {
    let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM orders WHERE id = $1")
        .bind(order_id)
        .fetch_optional(db)
        .await?;
    if exists.is_none() {
        return Ok(None);
    }

    let lines = sqlx::query_as::<_, OrderLine>(
        r#"
        SELECT oi.book_id,
               b.title AS book_title,
               oi.quantity,
               (oi.quantity::BIGINT * b.price) AS subtotal_price
        FROM order_items oi
        JOIN books b ON b.id = oi.book_id
        WHERE oi.order_id = $1
        ORDER BY oi.position
        "#,
    )
    .bind(order_id)
    .fetch_all(db)
    .await?;
    Ok(Some(lines))
}

/// Total amount of every order, for the statistics average.
pub async fn order_amounts(db: &PgPool) -> anyhow::Result<Vec<i64>> {
    let amounts = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COALESCE(SUM(oi.quantity::BIGINT * b.price), 0)::BIGINT
        FROM orders o
        LEFT JOIN order_items oi ON oi.order_id = o.id
        LEFT JOIN books b ON b.id = oi.book_id
        GROUP BY o.id
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(amounts)
}

/// Units sold per live genre, in genre creation order (the traversal order
/// used for tie-breaking).
pub async fn genre_unit_sales(db: &PgPool) -> anyhow::Result<Vec<GenreSales>> {
    let sales = sqlx::query_as::<_, GenreSales>(
        r#"
        SELECT g.name, COALESCE(SUM(oi.quantity), 0)::BIGINT AS units
        FROM genres g
        LEFT JOIN books b ON b.genre_id = g.id
        LEFT JOIN order_items oi ON oi.book_id = b.id
        WHERE g.deleted_at IS NULL
        GROUP BY g.id, g.name, g.created_at
        ORDER BY g.created_at
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(sales)
}
