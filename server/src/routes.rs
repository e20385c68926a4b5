//! Request handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
}

/// Reply to `POST /chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// Reply to `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
}

/// Answer a chat query from the knowledge base.
pub async fn chat(
    State(state): State<AppState>,
    request: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(request) = request?;
    let reply = state.service.answer(&request.query).await?;
    Ok(Json(ChatResponse {
        answer: reply.answer,
    }))
}

/// Merge an uploaded `.json` or `.csv` FAQ file into the knowledge base.
///
/// Expects a multipart form with a `file` field.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("Uploaded file has no file name."))?;
        let bytes = field.bytes().await?;

        let report = state
            .service
            .ingest_file(&filename, &bytes)
            .await
            .map_err(ApiError::upload)?;

        info!("Merged {} FAQs from {filename}", report.added);
        return Ok(Json(UploadResponse {
            message: format!(
                "Successfully added {} new FAQs from {filename}.",
                report.added
            ),
        }));
    }

    Err(ApiError::bad_request("Missing 'file' field in upload."))
}
