// crates/citysuggest-server/src/lib.rs
//
// HTTP adapter for citysuggest-core.
// - One Suggester built at startup, shared read-only by every request.
// - GET /suggestions?q=...&latitude=...&longitude=...&limit=...
// - GET /health
//
// axum on a multi-threaded tokio runtime.

use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use citysuggest_core::{RawParams, SuggestOutcome, Suggester};
use serde::Serialize;
use std::{net::SocketAddr, sync::Arc};
use tracing::{debug, info};

/// Status returned for a valid request that matched nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EmptyStatus {
    /// 404, with `{"suggestions": []}` as body.
    #[default]
    NotFound,
    /// 200, same body.
    Ok,
}

#[derive(Debug, Clone)]
pub struct AppState {
    suggester: Arc<Suggester>,
    empty_status: EmptyStatus,
}

impl AppState {
    pub fn new(suggester: Arc<Suggester>, empty_status: EmptyStatus) -> Self {
        Self {
            suggester,
            empty_status,
        }
    }
}

/// Response status for a pipeline outcome.
pub fn status_for(outcome: &SuggestOutcome<'_>, empty_status: EmptyStatus) -> StatusCode {
    match outcome {
        SuggestOutcome::Rejected { .. } => StatusCode::BAD_REQUEST,
        SuggestOutcome::Served { suggestions } if suggestions.is_empty() => match empty_status {
            EmptyStatus::NotFound => StatusCode::NOT_FOUND,
            EmptyStatus::Ok => StatusCode::OK,
        },
        SuggestOutcome::Served { .. } => StatusCode::OK,
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/suggestions", get(suggestions))
        .with_state(state)
}

pub async fn serve(state: AppState, bind: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}

#[derive(Serialize)]
struct HealthJson {
    status: &'static str,
    cities: usize,
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthJson {
        status: "ok",
        cities: state.suggester.catalog().len(),
    })
}

#[derive(Serialize)]
struct MalformedJson {
    errors: MalformedErrors,
    suggestions: [(); 0],
}

#[derive(Serialize)]
struct MalformedErrors {
    query: String,
}

pub async fn suggestions(
    State(state): State<AppState>,
    params: Result<Query<RawParams>, QueryRejection>,
) -> Response {
    // Only a malformed query string (e.g. a repeated key) fails to extract.
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            debug!(error = %rejection, "malformed query string");
            let body = MalformedJson {
                errors: MalformedErrors {
                    query: rejection.body_text(),
                },
                suggestions: [],
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    let outcome = state.suggester.suggest(&params);
    let status = status_for(&outcome, state.empty_status);
    debug!(
        q = params.q.as_deref().unwrap_or_default(),
        status = status.as_u16(),
        served = outcome.suggestions().len(),
        "GET /suggestions"
    );
    (status, Json(&outcome)).into_response()
}
