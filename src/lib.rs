//! DNS Crab
//!
//! A very minimal HTTP front end for an external DNS record mutation script.
//!
//! Clients `POST` a `create` or `delete` request with a JSON object describing the record. DNS
//! Crab validates it, runs the configured script with the record fields as command line flags,
//! and reports what the script said. Request counts and latencies are exposed for scraping, and
//! a health endpoint reports uptime.
//!
//! See [`api`] for the HTTP endpoints and [`script`] for the script calling convention.
//!
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod health;
pub mod metrics;
pub mod script;

pub use api::new as new_http;
pub use config::{Config, SharedConfig};
pub use metrics::{Metrics, SharedMetrics};
pub use script::{CommandRunner, DynScriptRunner, ScriptRunner};
