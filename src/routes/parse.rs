//! PDF parse endpoints
//!
//! - POST /parse - run a PDF through GROBID and store the TEI XML
//! - GET /parse/:id - read a stored extraction back

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::pipeline::{ParseRequestBody, ParseResponse, StoredExtraction};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/parse", post(parse_pdf))
        .route("/parse/:id", get(get_extraction))
}

async fn parse_pdf(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ParseRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ParseResponse>)> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = body.validate()?;

    let response = state.pipeline().parse(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_extraction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredExtraction>> {
    let stored = state.pipeline().load(&id).await?;
    Ok(Json(stored))
}
