use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use vitrine_core::CatalogPayload;

use crate::middleware::RequestId;

use super::{map_catalog_error, map_join_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    pub market: Option<String>,
    pub city: Option<String>,
}

pub(super) async fn get_catalog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogPayload>>, ApiError> {
    let service = Arc::clone(&state.catalog);
    let payload = tokio::task::spawn_blocking(move || {
        service.catalog(
            query.market.as_deref(),
            query.city.as_deref().unwrap_or_default(),
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
