//! DNS record mutation by external script.
//!
//! DNS Crab doesn't speak to any DNS provider itself. Each accepted
//! [`/dns/{action}` request][crate::api#dnsaction-post] is handed to a [`ScriptRunner`], which
//! receives the [`Action`] and the caller's [`ParameterSet`] and reports an [`Invocation`].
//!
//! The provided [`command::CommandRunner`] executes the configured script as a child process
//! with the argument list built by [`arguments`]:
//!
//! ```text
//! [interpreter] <script_path> <action> --<key>=<value> ...
//! ```
//!
//! The script signals success with exit code `0`. Anything it writes to stdout is returned
//! to the client on success, anything written to stderr on failure.

use crate::error::Error;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod command;

pub use command::CommandRunner;

/// `DynScriptRunner` is a type alias for a [`ScriptRunner`] shared by every request handler.
#[allow(clippy::module_name_repetitions)]
pub type DynScriptRunner = Arc<dyn ScriptRunner + Send + Sync>;

/// An async trait describing the execution of a single DNS record mutation.
#[async_trait::async_trait]
pub trait ScriptRunner {
    /// Run the mutation for `action` once, with no retries.
    async fn invoke(&self, action: Action, params: &ParameterSet) -> Invocation;
}

/// The DNS operation requested by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Delete,
}

impl Action {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Delete => "delete",
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Action::Create),
            "delete" => Ok(Action::Delete),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller supplied key/value data describing the DNS record to mutate.
///
/// Keys are kept sorted so that the script arguments for a given body are always the same.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ParameterSet(BTreeMap<String, String>);

impl ParameterSet {
    /// Parse a request body into a non-empty [`ParameterSet`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoData`] for a blank body, JSON `null`, or an empty object.
    ///
    /// Returns [`Error::InvalidParameters`] for any other body that isn't a JSON object whose
    /// values are all strings. Numbers and booleans are rejected rather than coerced.
    pub fn from_body(body: &[u8]) -> Result<Self, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::NoData);
        }
        let params: Option<ParameterSet> =
            serde_json::from_slice(body).map_err(Error::InvalidParameters)?;
        match params {
            Some(params) if !params.is_empty() => Ok(params),
            _ => Err(Error::NoData),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ParameterSet(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Build the script argument list: the action token followed by one `--<key>=<value>` flag
/// per parameter, in key order.
#[must_use]
pub fn arguments(action: Action, params: &ParameterSet) -> Vec<String> {
    std::iter::once(action.to_string())
        .chain(params.iter().map(|(k, v)| format!("--{k}={v}")))
        .collect()
}

/// Why an [`Invocation`] failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The script ran and exited with a non-zero code (`None` if killed by a signal).
    Exited(Option<i32>),
    /// The script could not be started.
    Spawn,
    /// The script outlived [`Config::script_timeout`][crate::config::Config::script_timeout]
    /// and was killed.
    TimedOut,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Exited(Some(code)) => write!(f, "exited with code {code}"),
            FailureCause::Exited(None) => f.write_str("terminated by signal"),
            FailureCause::Spawn => f.write_str("failed to start"),
            FailureCause::TimedOut => f.write_str("timed out"),
        }
    }
}

/// The outcome of running the DNS script for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Success { stdout: String },
    Failure { cause: FailureCause, details: String },
}

impl Invocation {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Invocation::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_tokens() {
        assert_eq!("create".parse::<Action>().unwrap(), Action::Create);
        assert_eq!("delete".parse::<Action>().unwrap(), Action::Delete);
        for bad in ["update", "Create", "", "create "] {
            assert!(matches!(bad.parse::<Action>(), Err(Error::InvalidAction(_))));
        }
        assert_eq!(Action::Delete.to_string(), "delete");
    }

    #[test]
    fn empty_bodies_are_no_data() {
        for body in [&b""[..], b"  \n", b"null", b"{}", b" {} "] {
            assert!(
                matches!(ParameterSet::from_body(body), Err(Error::NoData)),
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn non_string_values_rejected() {
        for body in [
            &br#"{"ttl":300}"#[..],
            br#"{"name":"foo","proxied":true}"#,
            br#"["name","foo"]"#,
            br#""name""#,
            b"{not json",
        ] {
            assert!(
                matches!(
                    ParameterSet::from_body(body),
                    Err(Error::InvalidParameters(_))
                ),
                "body {:?}",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn arguments_in_key_order() {
        let params = ParameterSet::from_body(
            br#"{"value":"1.2.3.4","name":"foo.example.com","type":"A"}"#,
        )
        .unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(
            arguments(Action::Create, &params),
            vec![
                "create",
                "--name=foo.example.com",
                "--type=A",
                "--value=1.2.3.4",
            ]
        );
    }

    #[test]
    fn values_passed_verbatim() {
        let params: ParameterSet = [("txt", "a=b c"), ("name", "")].into_iter().collect();
        assert_eq!(
            arguments(Action::Delete, &params),
            vec!["delete", "--name=", "--txt=a=b c"]
        );
    }
}
