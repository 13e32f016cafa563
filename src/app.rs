use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::infrastructure::bootstrap;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::OpenAIClient;
use crate::interfaces::http;

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    let state = bootstrap::setup(config, Arc::new(OpenAIClient::new())).map_err(|err| {
        error!(error = %err, "Failed to initialize application state");
        std::io::Error::new(std::io::ErrorKind::Other, err.to_string())
    })?;

    http::start_server(Arc::new(state))?.await
}
