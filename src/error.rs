//! Error types.

/// Error enumerates the possible DNS Crab error states.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when clients `POST` the [`/dns/{action}` API endpoint][crate::api#dnsaction-post]
    /// with an action other than `create` or `delete`.
    #[error("Invalid action")]
    InvalidAction(String),

    /// Returned when clients `POST` the [`/dns/{action}` API endpoint][crate::api#dnsaction-post]
    /// with an absent, `null`, or empty JSON object body.
    #[error("No data provided")]
    NoData,

    /// Returned when the request body is present but isn't a JSON object of string values.
    #[error("invalid parameters: {0}")]
    InvalidParameters(#[source] serde_json::Error),

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [trying to load a `Config`][crate::config::Config::try_from_file] fails due
    /// to invalid JSON content.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when the [metrics registry][crate::metrics::Metrics] can't be encoded.
    #[error("metrics encoding failed")]
    Metrics(#[from] std::fmt::Error),
}

impl Error {
    /// Whether the error was caused by client input, and never reached the DNS script.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAction(_) | Error::NoData | Error::InvalidParameters(_)
        )
    }
}
