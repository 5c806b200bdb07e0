use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use crate::application::{DeleteMediaUseCase, ListAlbumsUseCase, ListMediaUseCase};
use crate::domain::{DomainError, MediaKind};

// App State
#[derive(Clone)]
pub struct AppState {
    pub albums_use_case: Arc<ListAlbumsUseCase>,
    pub list_use_case: Arc<ListMediaUseCase>,
    pub delete_use_case: Arc<DeleteMediaUseCase>,
    pub default_page_size: usize,
}

#[derive(Deserialize)]
pub struct Pagination {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

async fn list_albums_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DomainError> {
    let snapshot = state.albums_use_case.execute().await?;
    Ok(Json(snapshot))
}

async fn refresh_albums_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DomainError> {
    let snapshot = state.albums_use_case.refresh().await?;
    Ok(Json(snapshot))
}

async fn list_album_media_handler(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, DomainError> {
    let page = pagination.page.unwrap_or(1);
    let limit = pagination.limit.unwrap_or(state.default_page_size);

    let results = state.list_use_case.execute(&group_id, page, limit).await?;
    Ok(Json(results))
}

async fn delete_handler(
    State(state): State<AppState>,
    Path((kind, id)): Path<(MediaKind, i64)>,
) -> Result<impl IntoResponse, DomainError> {
    state.delete_use_case.execute(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Error handling
impl IntoResponse for DomainError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            DomainError::Cancelled | DomainError::Unsupported(_) => {}
            DomainError::SourceUnavailable { kind, reason } => {
                error!("Media index unavailable ({}): {}", kind, reason)
            }
            DomainError::MalformedRow(e) => error!("Malformed row: {}", e),
            DomainError::Database(e) => error!("Database Error: {}", e),
            DomainError::Io(e) => error!("IO Error: {}", e),
        }

        let (status, body) = match self {
            DomainError::Unsupported(what) => (
                StatusCode::NOT_IMPLEMENTED,
                json!({ "error": format!("{} is not supported", what), "supported": false }),
            ),
            DomainError::Cancelled => (
                StatusCode::CONFLICT,
                json!({ "error": "Request superseded by a newer scan", "retryable": true }),
            ),
            DomainError::SourceUnavailable { .. } => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "Media index unavailable", "retryable": true }),
            ),
            DomainError::MalformedRow(_) | DomainError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Media index error", "retryable": true }),
            ),
            DomainError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "IO error" })),
        };

        (status, Json(body)).into_response()
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/albums", get(list_albums_handler))
        .route("/albums/refresh", post(refresh_albums_handler))
        .route("/albums/{group_id}/media", get(list_album_media_handler))
        .route("/media/{kind}/{id}", delete(delete_handler))
        .with_state(state)
}
