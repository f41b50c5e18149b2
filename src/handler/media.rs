use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{service::uploads::UploadError, state::AppState};

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub name: String,
}

/// Shape the gallery frontend reads back from the media API.
#[derive(Serialize)]
pub struct MediaItem {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
    pub original_name: String,
    pub file_size: u64,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/media/:category/:tab", post(upload))
        .with_state(state)
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            message: message.into(),
        }),
    )
        .into_response()
}

fn media_kind(tab: &str) -> Option<&'static str> {
    match tab {
        "photos" => Some("photo"),
        "videos" => Some("video"),
        _ => None,
    }
}

fn is_single_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && !value.contains(|c: char| c == '/' || c == '\\')
}

async fn upload(
    State(state): State<Arc<AppState>>,
    Path((category, tab)): Path<(String, String)>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Response {
    let Some(kind) = media_kind(&tab) else {
        return error(StatusCode::BAD_REQUEST, format!("unknown media tab {:?}", tab));
    };
    if !is_single_segment(&category) || !is_single_segment(&query.name) {
        return error(StatusCode::BAD_REQUEST, "invalid category or file name");
    }

    let relative = format!("{}/{}/{}", category, tab, query.name);
    match state.uploads().save(&relative, &body).await {
        Ok(_) => (
            StatusCode::CREATED,
            Json(MediaItem {
                kind,
                url: format!("/uploads/{}", relative),
                original_name: query.name,
                file_size: body.len() as u64,
            }),
        )
            .into_response(),
        Err(err @ UploadError::TooLarge { .. }) => {
            error(StatusCode::PAYLOAD_TOO_LARGE, err.to_string())
        }
        Err(err @ UploadError::InvalidName(_)) => error(StatusCode::BAD_REQUEST, err.to_string()),
        Err(UploadError::Io(err)) => {
            tracing::error!("upload {} failed: {}", relative, err);
            error(StatusCode::INTERNAL_SERVER_ERROR, "upload failed")
        }
    }
}
