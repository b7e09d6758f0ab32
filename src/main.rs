use anyhow::Result;
use dnscrab::api::AppState;
use dnscrab::{CommandRunner, Config, Metrics, SharedConfig};
use is_terminal::IsTerminal;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_init();

    let config = config_init(std::env::args().nth(1))?;
    tracing::info!(
        "DNS script: {} {}",
        config.script_interpreter.as_deref().unwrap_or(""),
        config.script_path.display()
    );

    let runner = Arc::new(CommandRunner::new(&config));
    let metrics = Arc::new(Metrics::new());
    let state = AppState::new(config.clone(), runner, metrics);

    tracing::info!("API listening on {}", &config.api_bind_addr);
    let api_server = dnscrab::api::new(state)?;

    // TODO(XXX): drain in-flight script invocations before exiting.
    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("quitting from signal");
        },
        api_res = api_server => {
            api_res?;
        }
    }
    tracing::info!("goodbye");
    Ok(())
}

fn tracing_init() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_ansi(std::io::stdout().is_terminal()))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dnscrab=info".into()),
        )
        .init();
}

fn config_init(config_file: Option<String>) -> Result<SharedConfig> {
    match config_file {
        None => {
            tracing::debug!("no config file given, using defaults");
            Ok(Arc::new(Config::default()))
        }
        Some(config_file) => {
            let config = Config::try_from_file(&config_file)?;
            tracing::debug!("loaded config from {config_file}");
            Ok(Arc::new(config))
        }
    }
}
