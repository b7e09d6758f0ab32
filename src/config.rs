use crate::error::Error;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub type SharedConfig = Arc<Config>;

#[serde_as]
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_bind_addr: SocketAddr,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub api_timeout: Option<Duration>,
    pub script_interpreter: Option<String>,
    pub script_path: PathBuf,
    #[serde_as(as = "Option<DurationSeconds<u64>>")]
    pub script_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5000),
            api_timeout: None,
            script_interpreter: Some("python".to_string()),
            script_path: PathBuf::from("./hello-world.py"),
            script_timeout: None,
        }
    }
}

impl Config {
    /// Load a [`Config`] from the JSON document at the given path. Fields missing from the
    /// document keep their [default][`Config::default`] values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IO`] if the path can't be opened, or [`Error::InvalidJSON`] if the
    /// content isn't a valid config document.
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        Ok(conf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_baseline() {
        let config = Config::default();
        assert_eq!(config.api_bind_addr, "0.0.0.0:5000".parse().unwrap());
        assert_eq!(config.script_interpreter.as_deref(), Some("python"));
        assert_eq!(config.script_path, PathBuf::from("./hello-world.py"));
        assert_eq!(config.script_timeout, None);
        assert_eq!(config.api_timeout, None);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            r#"{{"api_bind_addr":"127.0.0.1:8053","script_interpreter":null,"api_timeout":30}}"#
        )
        .unwrap();

        let config = Config::try_from_file(f.path()).unwrap();
        assert_eq!(config.api_bind_addr, "127.0.0.1:8053".parse().unwrap());
        assert_eq!(config.script_interpreter, None);
        assert_eq!(config.api_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.script_timeout, None);
        assert_eq!(config.script_path, PathBuf::from("./hello-world.py"));
    }

    #[test]
    fn invalid_document() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "not json").unwrap();
        assert!(matches!(
            Config::try_from_file(f.path()),
            Err(Error::InvalidJSON(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Config::try_from_file("/nonexistent/dnscrab.json"),
            Err(Error::IO(_))
        ));
    }
}
