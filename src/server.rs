// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP surface of the check service
//!
//! | Route | Body | Response |
//! |-------|------|----------|
//! | `POST /ObjCheck` | `{service, region, pool, count}` | check status |
//! | `POST /HTTPCheck` | `{endpoint, target}` | check status |
//! | `GET /healthz` | | `ok` |
//!
//! Responses are plain text from the status vocabulary. Rejected requests get
//! 400 (decode or validation) or 500 (list generation); processed checks get 200
//! even when objects failed, since the body already says so.

use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::info;

use crate::check::{EndpointChecker, ObjectChecker};
use crate::types::CheckStatus;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    objects: Arc<ObjectChecker>,
    endpoints: Arc<EndpointChecker>,
}

impl AppState {
    pub fn new(objects: ObjectChecker, endpoints: EndpointChecker) -> Self {
        Self {
            objects: Arc::new(objects),
            endpoints: Arc::new(endpoints),
        }
    }
}

/// Router for the check service, running at most `max_concurrent` checks at once
///
/// The limit is one semaphore shared by `/ObjCheck` and `/HTTPCheck`.
pub fn router(state: AppState, max_concurrent: usize) -> Router {
    Router::new()
        .route("/ObjCheck", post(obj_check))
        .route("/HTTPCheck", post(http_check))
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent.max(1)))
        .route("/healthz", get(healthz))
        .with_state(state)
}

/// Serve `router` on `listener` until `shutdown` resolves
pub async fn serve_api<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;

    info!(address = ?addr, "Starting server");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

async fn obj_check(State(state): State<AppState>, body: Bytes) -> Response {
    let report = state.objects.check_body(&body).await;
    status_response(report.status)
}

async fn http_check(State(state): State<AppState>, body: Bytes) -> Response {
    let status = state.endpoints.check_body(&body).await;
    status_response(status)
}

async fn healthz() -> &'static str {
    "ok"
}

fn status_response(status: CheckStatus) -> Response {
    (
        http_status(status),
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        status.as_str(),
    )
        .into_response()
}

/// HTTP status code carried alongside a check status
pub fn http_status(status: CheckStatus) -> StatusCode {
    match status {
        CheckStatus::DataError | CheckStatus::RequestError => StatusCode::BAD_REQUEST,
        CheckStatus::ListError => StatusCode::INTERNAL_SERVER_ERROR,
        CheckStatus::CheckSuccess | CheckStatus::CheckError | CheckStatus::UnsupportedType => {
            StatusCode::OK
        }
    }
}
