//! A child process implementation of the [`ScriptRunner`][super::ScriptRunner] trait.
use crate::config::Config;
use crate::script::{arguments, Action, FailureCause, Invocation, ParameterSet, ScriptRunner};
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};
use tokio::process::Command;

/// Runs the configured script once per invocation, waiting for it to exit.
///
/// Without a [`Config::script_timeout`] the calling request waits for as long as the script
/// runs. With one, a script still running when it elapses is killed.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct CommandRunner {
    interpreter: Option<String>,
    script_path: PathBuf,
    timeout: Option<Duration>,
}

impl CommandRunner {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        CommandRunner {
            interpreter: config.script_interpreter.clone(),
            script_path: config.script_path.clone(),
            timeout: config.script_timeout,
        }
    }

    fn command(&self, action: Action, params: &ParameterSet) -> Command {
        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(&self.script_path);
                command
            }
            None => Command::new(&self.script_path),
        };
        command
            .args(arguments(action, params))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        command
    }

    fn classify(output: std::io::Result<Output>) -> Invocation {
        match output {
            Ok(output) if output.status.success() => Invocation::Success {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            },
            Ok(output) => Invocation::Failure {
                cause: FailureCause::Exited(output.status.code()),
                details: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(err) => Invocation::Failure {
                cause: FailureCause::Spawn,
                details: err.to_string(),
            },
        }
    }
}

#[async_trait::async_trait]
impl ScriptRunner for CommandRunner {
    async fn invoke(&self, action: Action, params: &ParameterSet) -> Invocation {
        let started = Instant::now();
        let mut command = self.command(action, params);
        let output = command.output();
        let invocation = match self.timeout {
            None => Self::classify(output.await),
            Some(timeout) => match tokio::time::timeout(timeout, output).await {
                Ok(output) => Self::classify(output),
                Err(_) => Invocation::Failure {
                    cause: FailureCause::TimedOut,
                    details: format!("script did not exit within {}s", timeout.as_secs()),
                },
            },
        };
        tracing::debug!(
            "{} {action} finished in {:?}: success={}",
            self.script_path.display(),
            started.elapsed(),
            invocation.is_success()
        );
        invocation
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn script(body: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "{body}").unwrap();
        f
    }

    fn runner(script: &NamedTempFile, timeout: Option<Duration>) -> CommandRunner {
        CommandRunner::new(&Config {
            script_interpreter: Some("sh".to_string()),
            script_path: script.path().to_path_buf(),
            script_timeout: timeout,
            ..Config::default()
        })
    }

    fn params() -> ParameterSet {
        [("name", "foo.example.com"), ("type", "A")]
            .into_iter()
            .collect()
    }

    #[tokio::test]
    async fn success_captures_stdout() {
        let f = script(r#"printf '%s ' "$@"; echo "stray" >&2"#);
        let invocation = runner(&f, None).invoke(Action::Create, &params()).await;
        assert_eq!(
            invocation,
            Invocation::Success {
                stdout: "create --name=foo.example.com --type=A ".to_string()
            }
        );
    }

    #[tokio::test]
    async fn nonzero_exit_captures_stderr() {
        let f = script(r#"echo "partial" ; printf 'no such record' >&2; exit 3"#);
        let invocation = runner(&f, None).invoke(Action::Delete, &params()).await;
        assert_eq!(
            invocation,
            Invocation::Failure {
                cause: FailureCause::Exited(Some(3)),
                details: "no such record".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn missing_program_is_spawn_failure() {
        let runner = CommandRunner::new(&Config {
            script_interpreter: None,
            script_path: PathBuf::from("/nonexistent/dns-script"),
            ..Config::default()
        });
        match runner.invoke(Action::Create, &params()).await {
            Invocation::Failure {
                cause: FailureCause::Spawn,
                details,
            } => assert!(!details.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_script_times_out() {
        let f = script("sleep 5");
        let invocation = runner(&f, Some(Duration::from_secs(1)))
            .invoke(Action::Create, &params())
            .await;
        assert!(matches!(
            invocation,
            Invocation::Failure {
                cause: FailureCause::TimedOut,
                ..
            }
        ));
    }
}
