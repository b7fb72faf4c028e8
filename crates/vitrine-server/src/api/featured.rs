use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Extension, Json,
};
use serde::Deserialize;
use vitrine_catalog::clamp_count;
use vitrine_core::FeaturedPayload;

use crate::middleware::RequestId;

use super::{map_catalog_error, map_join_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct FeaturedQuery {
    pub market: Option<String>,
    pub city: Option<String>,
    pub count: Option<String>,
}

/// Unparseable counts fall back to the default like absent ones.
fn parse_count(raw: Option<&str>) -> usize {
    clamp_count(raw.and_then(|c| c.trim().parse::<i64>().ok()))
}

pub(super) async fn get_featured(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<FeaturedPayload>>, ApiError> {
    let service = Arc::clone(&state.catalog);
    let count = parse_count(query.count.as_deref());
    let base_url = request_base_url(&headers);

    let payload = tokio::task::spawn_blocking(move || {
        service.featured(
            query.market.as_deref(),
            query.city.as_deref().unwrap_or_default(),
            count,
            base_url.as_deref(),
        )
    })
    .await
    .map_err(|e| map_join_error(req_id.0.clone(), &e))?
    .map_err(|e| map_catalog_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: payload,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// `scheme://host` of the incoming request. The scheme comes from the first
/// `X-Forwarded-Proto` value, defaulting to `http`.
fn request_base_url(headers: &HeaderMap) -> Option<String> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|h| !h.is_empty())?;

    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("http");

    Some(format!("{scheme}://{host}"))
}
