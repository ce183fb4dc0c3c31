//! Section catalog endpoint.

use std::time::Instant;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use noticeboard_core::catalog;
use noticeboard_core::repository::record::RecordRepository;
use noticeboard_types::section::SectionKey;

use crate::http::error::AppError;
use crate::http::extractors::auth::Authenticated;
use crate::http::response::ApiResponse;
use crate::http::server::ServerState;

#[derive(Debug, Serialize)]
pub struct SectionEntry {
    pub key: SectionKey,
    pub label: &'static str,
    pub records: u64,
}

/// GET /api/v1/sections - Catalog with record counts, in menu order.
pub async fn list_sections(
    State(state): State<ServerState>,
    _auth: Authenticated,
) -> Result<Json<ApiResponse<Vec<SectionEntry>>>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let mut entries = Vec::with_capacity(SectionKey::ALL.len());
    for (key, label) in catalog::sections() {
        entries.push(SectionEntry {
            key,
            label,
            records: state.app.records.count(key).await?,
        });
    }

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(
        ApiResponse::success(entries, request_id, elapsed).with_link("self", "/api/v1/sections"),
    ))
}
