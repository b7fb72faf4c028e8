use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;
use crate::subscriptions::Subscription;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SubscribeRequest {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub interest: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SubscribeData {
    status: &'static str,
    email: String,
}

pub(super) async fn create_subscription(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<SubscribeData>>), ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "bad_request", rejection.body_text())
    })?;
    let email = body.email.trim().to_lowercase();
    if !is_plausible_email(&email) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "email must be a valid address",
        ));
    }

    let subscription = Subscription {
        created_at: Utc::now(),
        email,
        name: non_blank(body.name),
        phone: non_blank(body.phone),
        interest: non_blank(body.interest),
    };

    let store = state.subscriptions.clone();
    let record = subscription.clone();
    tokio::task::spawn_blocking(move || store.append(&record))
        .await
        .map_err(|e| super::map_join_error(req_id.0.clone(), &e))?
        .map_err(|e| {
            tracing::error!(error = %e, "failed to append subscription");
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "failed to record subscription",
            )
        })?;

    tracing::info!(interest = ?subscription.interest, "subscription recorded");

    if let Some(notifier) = &state.notifier {
        notifier.spawn_notify(subscription.clone());
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: SubscribeData {
                status: "subscribed",
                email: subscription.email,
            },
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One `@` with something on both sides, a dot in the domain, no spaces.
fn is_plausible_email(email: &str) -> bool {
    if email.len() > 254 || email.chars().any(char::is_whitespace) {
        return false;
    }
    email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
    })
}
