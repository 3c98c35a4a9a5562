use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    books::{
        dto::{BookItem, CreateBookRequest, CreatedBook, ListBooksParams, UpdateBookRequest, UpdatedBook},
        repo,
        repo::BookWithGenre,
    },
    genres,
    response::{ApiError, ApiResponse, Meta},
    state::AppState,
};

pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/books", post(create_book).get(list_books))
        .route("/books/genre/:id", get(list_books_by_genre))
        .route(
            "/books/:id",
            get(get_book).patch(update_book).delete(delete_book),
        )
}

fn to_item(book: BookWithGenre) -> BookItem {
    BookItem {
        id: book.id,
        title: book.title,
        writer: book.writer,
        publisher: book.publisher,
        description: book.description,
        publication_year: book.publication_year,
        price: book.price,
        stock_quantity: book.stock_quantity,
        genre: book.genre,
    }
}

#[instrument(skip(state, payload))]
pub async fn create_book(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<CreateBookRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedBook>>), ApiError> {
    let missing = ApiError::Validation("All fields are required except description".into());

    let title = payload.title.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let writer = payload.writer.as_deref().map(str::trim).filter(|w| !w.is_empty());
    let publisher = payload.publisher.as_deref().map(str::trim).filter(|p| !p.is_empty());

    let (Some(title), Some(writer), Some(publisher)) = (title, writer, publisher) else {
        return Err(missing);
    };
    let (Some(publication_year), Some(price), Some(stock_quantity), Some(genre_id)) = (
        payload.publication_year,
        payload.price,
        payload.stock_quantity,
        payload.genre_id,
    ) else {
        return Err(missing);
    };

    if price < 0 || stock_quantity < 0 {
        return Err(ApiError::Validation(
            "Price and stock quantity must not be negative".into(),
        ));
    }

    if repo::find_live_by_title(&state.db, title).await?.is_some() {
        warn!(title, "duplicate book title");
        return Err(ApiError::Validation("Book title already exists".into()));
    }

    if genres::repo::find_live_by_id(&state.db, genre_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Genre not found".into()));
    }

    let book = repo::create(
        &state.db,
        &repo::NewBook {
            title,
            writer,
            publisher,
            publication_year,
            description: payload.description.as_deref(),
            price,
            stock_quantity,
            genre_id,
        },
    )
    .await?;

    info!(book_id = %book.id, title = %book.title, "book created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Book added successfully",
            CreatedBook {
                id: book.id,
                title: book.title,
                created_at: book.created_at,
            },
        )),
    ))
}

#[instrument(skip(state))]
pub async fn list_books(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<ApiResponse<Vec<BookItem>>>, ApiError> {
    let (books, total) = repo::list(&state.db, &params).await?;
    let items = books.into_iter().map(to_item).collect();

    Ok(Json(
        ApiResponse::new("Get all book successfully", items)
            .with_meta(Meta::build(params.page, params.limit, total)),
    ))
}

#[instrument(skip(state))]
pub async fn list_books_by_genre(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<ApiResponse<Vec<BookItem>>>, ApiError> {
    if genres::repo::find_live_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Genre not found".into()));
    }

    let (books, total) = repo::list_by_genre(&state.db, id, &params).await?;
    let items = books.into_iter().map(to_item).collect();

    Ok(Json(
        ApiResponse::new("Get all book by genre successfully", items)
            .with_meta(Meta::build(params.page, params.limit, total)),
    ))
}

#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookItem>>, ApiError> {
    let book = repo::find_live_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Book not found".into()))?;

    Ok(Json(ApiResponse::new(
        "Get book detail successfully",
        to_item(book),
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_book(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookRequest>,
) -> Result<Json<ApiResponse<UpdatedBook>>, ApiError> {
    if repo::find_live_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    if payload.price.is_some_and(|p| p < 0)
        || payload.stock_quantity.is_some_and(|q| q < 0)
    {
        return Err(ApiError::Validation(
            "Price and stock quantity must not be negative".into(),
        ));
    }

    let book = repo::update(
        &state.db,
        id,
        payload.description.as_deref(),
        payload.price,
        payload.stock_quantity,
    )
    .await?;

    info!(book_id = %book.id, "book updated");
    Ok(Json(ApiResponse::new(
        "Book updated successfully",
        UpdatedBook {
            id: book.id,
            title: book.title,
            updated_at: book.updated_at,
        },
    )))
}

#[instrument(skip(state))]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if repo::find_live_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Book not found".into()));
    }

    repo::soft_delete(&state.db, id).await?;

    info!(book_id = %id, "book soft-deleted");
    Ok(Json(ApiResponse::message("Book removed successfully")))
}
