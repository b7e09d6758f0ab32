use crate::api::routes;
use crate::config::SharedConfig;
use crate::health::Uptime;
use crate::metrics::SharedMetrics;
use crate::script::DynScriptRunner;
use axum::Router;
use std::future::Future;

#[derive(Clone)]
pub struct AppState {
    pub config: SharedConfig,
    pub runner: DynScriptRunner,
    pub metrics: SharedMetrics,
    pub uptime: Uptime,
}

impl AppState {
    /// Build the state shared by every request. Uptime is measured from this call.
    #[must_use]
    pub fn new(config: SharedConfig, runner: DynScriptRunner, metrics: SharedMetrics) -> Self {
        AppState {
            config,
            runner,
            metrics,
            uptime: Uptime::start(),
        }
    }
}

/// The API [`Router`], without a listener. Useful for driving requests directly.
pub fn router(state: AppState) -> Router {
    routes::new(state)
}

/// Bind [`Config::api_bind_addr`][crate::config::Config::api_bind_addr] and return the future
/// serving the API on it.
///
/// # Errors
///
/// Returns an error if the address can't be bound.
pub fn new(state: AppState) -> hyper::Result<impl Future<Output = hyper::Result<()>>> {
    let bind_addr = state.config.api_bind_addr;
    Ok(axum::Server::try_bind(&bind_addr)?.serve(routes::new(state).into_make_service()))
}
