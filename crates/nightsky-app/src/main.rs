use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use nightsky_core::AppConfig;
use nightsky_ui::run_app;

fn main() -> ExitCode {
    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Optional config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => match AppConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Nightsky config error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => AppConfig::default(),
    };

    info!("Nightsky starting");
    if let Err(e) = run_app(config) {
        error!("Nightsky error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
