use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    genres::{
        dto::{CreatedGenre, GenreItem, GenreRequest, ListGenresParams, UpdatedGenre},
        repo,
    },
    response::{ApiError, ApiResponse, Meta},
    state::AppState,
};

pub fn genre_routes() -> Router<AppState> {
    // Listing and detail are public; mutations require auth.
    Router::new()
        .route("/genre", post(create_genre).get(list_genres))
        .route(
            "/genre/:id",
            get(get_genre).patch(update_genre).delete(delete_genre),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(payload): Json<GenreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedGenre>>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Genre name is required".into()));
    }

    if repo::find_live_by_name(&state.db, name, None).await?.is_some() {
        return Err(ApiError::Validation("Genre already exists".into()));
    }

    let genre = repo::create(&state.db, name).await?;

    info!(genre_id = %genre.id, name = %genre.name, "genre created");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "Genre created successfully",
            CreatedGenre {
                id: genre.id,
                name: genre.name,
                created_at: genre.created_at,
            },
        )),
    ))
}

#[instrument(skip(state))]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(params): Query<ListGenresParams>,
) -> Result<Json<ApiResponse<Vec<GenreItem>>>, ApiError> {
    let (genres, total) = repo::list(&state.db, &params).await?;

    let items = genres
        .into_iter()
        .map(|g| GenreItem {
            id: g.id,
            name: g.name,
        })
        .collect();

    Ok(Json(
        ApiResponse::new("Get all genre successfully", items)
            .with_meta(Meta::build(params.page, params.limit, total)),
    ))
}

#[instrument(skip(state))]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<GenreItem>>, ApiError> {
    let genre = repo::find_live_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Genre not found".into()))?;

    Ok(Json(ApiResponse::new(
        "Get genre detail successfully",
        GenreItem {
            id: genre.id,
            name: genre.name,
        },
    )))
}

#[instrument(skip(state, payload))]
pub async fn update_genre(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenreRequest>,
) -> Result<Json<ApiResponse<UpdatedGenre>>, ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Genre name is required".into()));
    }

    if repo::find_live_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Genre not found".into()));
    }

    if repo::find_live_by_name(&state.db, name, Some(id))
        .await?
        .is_some()
    {
        return Err(ApiError::Validation("Genre name already exists".into()));
    }

    let genre = repo::rename(&state.db, id, name).await?;

    info!(genre_id = %genre.id, name = %genre.name, "genre renamed");
    Ok(Json(ApiResponse::new(
        "Genre updated successfully",
        UpdatedGenre {
            id: genre.id,
            name: genre.name,
            updated_at: genre.updated_at,
        },
    )))
}

#[instrument(skip(state))]
pub async fn delete_genre(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if repo::find_live_by_id(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Genre not found".into()));
    }

    repo::soft_delete(&state.db, id).await?;

    info!(genre_id = %id, "genre soft-deleted");
    Ok(Json(ApiResponse::message("Genre removed successfully")))
}
