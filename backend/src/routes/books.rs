//! Book routes
//!
//! All routes require a valid token. Update and delete are additionally
//! restricted to the book's owner by `BookService`.

use super::path_id;
use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::services::BookInput;
use crate::state::AppState;
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookshelf_shared::{BookResponse, CreateBookRequest, UpdateBookRequest};
use uuid::Uuid;
use validator::Validate;

/// Create book routes
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/:id", get(get_book).put(update_book).delete(delete_book))
}

/// GET /api/v1/books - List all books
async fn list_books(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<Json<Vec<BookResponse>>> {
    let books = state.books().all().await?;
    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// POST /api/v1/books - Create a book owned by the caller
async fn create_book(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateBookRequest>,
) -> ApiResult<(StatusCode, Json<BookResponse>)> {
    req.validate()?;

    let book = state
        .books()
        .insert(auth.user_id, BookInput::from(req))
        .await?;
    Ok((StatusCode::CREATED, Json(book.into())))
}

/// GET /api/v1/books/:id - Get a single book
async fn get_book(
    State(state): State<AppState>,
    _auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<BookResponse>> {
    let id = path_id(path)?;
    let book = state.books().find_by_id(id).await?;
    Ok(Json(book.into()))
}

/// PUT /api/v1/books/:id - Update a book (owner only)
async fn update_book(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
    Json(req): Json<UpdateBookRequest>,
) -> ApiResult<Json<BookResponse>> {
    let id = path_id(path)?;

    // Validated by the service after the ownership check
    let book = state
        .books()
        .update(auth.user_id, id, BookInput::from(req))
        .await?;
    Ok(Json(book.into()))
}

/// DELETE /api/v1/books/:id - Delete a book (owner only)
async fn delete_book(
    State(state): State<AppState>,
    auth: AuthUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = path_id(path)?;
    state.books().delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
