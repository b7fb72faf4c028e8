mod catalog;
mod featured;
mod subscribe;

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};
use vitrine_catalog::{CatalogError, CatalogService};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};
use crate::notify::WebhookNotifier;
use crate::subscriptions::SubscriptionStore;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub subscriptions: SubscriptionStore,
    pub notifier: Option<WebhookNotifier>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    workbook: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Logs the full error for operators and returns it under its stable code.
pub(super) fn map_catalog_error(request_id: String, error: &CatalogError) -> ApiError {
    tracing::error!(error = %error, code = error.code(), "catalog build failed");
    ApiError::new(request_id, error.code(), error.to_string())
}

pub(super) fn map_join_error(request_id: String, error: &tokio::task::JoinError) -> ApiError {
    tracing::error!(error = %error, "blocking task failed");
    ApiError::new(
        request_id,
        "internal_error",
        "request could not be completed",
    )
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, REQUEST_ID_HEADER])
        .expose_headers([REQUEST_ID_HEADER])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/catalog", get(catalog::get_catalog))
        .route("/api/v1/featured", get(featured::get_featured))
        .route("/api/v1/subscribe", post(subscribe::create_subscription))
}

pub fn build_app(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .merge(api_router())
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    if state.catalog.source_available() {
        (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    workbook: "ok",
                },
                meta,
            }),
        )
    } else {
        tracing::warn!(
            path = %state.catalog.workbook_path.display(),
            "health check: workbook missing"
        );
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                data: HealthData {
                    status: "degraded",
                    workbook: "missing",
                },
                meta,
            }),
        )
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
