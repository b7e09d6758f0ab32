//! HTTP API for requesting DNS record mutations.
//!
//! # API Endpoints
//!
//! ## `/dns/{action}` (POST)
//!
//!   Where `action` is `create` or `delete`. Expects a JSON object request body of string
//!   values describing the record, e.g.:
//!
//!   ```json
//!   { "name": "foo.example.com", "type": "A", "value": "1.2.3.4" }
//!   ```
//!
//!   The values are passed to the configured DNS script as `--<key>=<value>` arguments, see
//!   [`crate::script`].
//!
//!   When the script exits successfully, returns HTTP 200 (OK) and a JSON body of the form:
//!
//!   ```json
//!   { "message": "DNS create completed successfully", "details": "Record created" }
//!   ```
//!
//!   Where `details` is the script's standard output.
//!
//!   When the script fails, returns HTTP 500 (Internal Server Error) and a JSON body of the form:
//!
//!   ```json
//!   { "error": "Failed to create DNS record", "details": "..." }
//!   ```
//!
//!   Where `details` is the script's standard error, or the reason the script couldn't be run.
//!
//!   Returns HTTP 400 (Bad Request) with `{"error": "Invalid action"}` for any other `action`,
//!   and `{"error": "No data provided"}` for an empty body. The script isn't run in either case.
//!
//! ## `/metrics` (GET)
//!
//!   Returns request counts and latencies for `/dns` in the OpenMetrics text format. See
//!   [`crate::metrics`].
//!
//! ## `/health` (GET)
//!
//!   Returns HTTP 200 (OK) and a JSON body of the form `{"status":"healthy","uptime_seconds":1.5}`.

mod api_error;
mod model;
mod routes;
pub mod server;

pub use server::{new, router, AppState};
