use crate::api::api_error::APIError;
use crate::api::model::DnsActionResult;
use crate::api::server::AppState;
use crate::error::Error;
use crate::metrics::CONTENT_TYPE;
use crate::script::{Action, Invocation, ParameterSet};
use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::time::Instant;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

const DNS_ENDPOINT: &str = "/dns";
const DNS_METHOD: &str = "POST";

pub(super) fn new(state: AppState) -> Router {
    let router = Router::new()
        .route("/dns/:action", post(dns_action))
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http());
    let router = match state.config.api_timeout {
        Some(api_timeout) => router.layer(TimeoutLayer::new(api_timeout)),
        None => router,
    };
    router.with_state(state)
}

async fn dns_action(
    State(state): State<AppState>,
    action: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Response {
    let started = Instant::now();
    let action = parse_action(action);

    // Detached from the handler: a client that times out or disconnects doesn't cancel a
    // running script, and the request is still counted once the script exits.
    let task = tokio::spawn(async move {
        let response = match dispatch(&state, action, &body).await {
            Ok(result) => result.into_response(),
            Err(err) => err.into_response(),
        };
        state
            .metrics
            .increment(DNS_ENDPOINT, DNS_METHOD, response.status().as_u16());
        state
            .metrics
            .observe_latency(DNS_ENDPOINT, DNS_METHOD, started.elapsed());
        response
    });

    match task.await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!("DNS dispatch task failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn parse_action(action: Result<Path<String>, PathRejection>) -> Result<Action, Error> {
    match action {
        Ok(Path(action)) => action.parse().map_err(|err| {
            tracing::debug!("rejected unsupported action \"{action}\"");
            err
        }),
        Err(rejection) => {
            tracing::debug!("rejected undecodable action: {}", rejection.body_text());
            Err(Error::InvalidAction(rejection.body_text()))
        }
    }
}

async fn dispatch(
    state: &AppState,
    action: Result<Action, Error>,
    body: &[u8],
) -> Result<DnsActionResult, APIError> {
    // The action is checked before the body is looked at.
    let action = action?;
    let params = ParameterSet::from_body(body).map_err(|err| {
        tracing::debug!("rejected {action} request: {err}");
        err
    })?;

    tracing::info!("dispatching DNS {action} with {} parameters", params.len());
    match state.runner.invoke(action, &params).await {
        Invocation::Success { stdout } => {
            tracing::info!("DNS {action} completed");
            Ok(DnsActionResult::completed(action, stdout))
        }
        Invocation::Failure { cause, details } => {
            tracing::warn!("DNS {action} failed, script {cause}");
            Ok(DnsActionResult::failed(action, details))
        }
    }
}

async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, APIError> {
    let snapshot = state.metrics.snapshot()?;
    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], snapshot))
}

#[allow(clippy::unused_async)]
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.uptime.report())
}
