use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::application::{AnalysisUseCase, IngestionUseCase, NarrateUseCase};
use crate::domain::error::Result;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::storage::WorkingStore;
use crate::interfaces::state::AppState;

/// Wire configuration, working storage and use cases into the shared state.
pub fn setup(
    config: AppConfig,
    llm_client: Arc<dyn LLMClient + Send + Sync>,
) -> Result<AppState> {
    let store = WorkingStore::open(&config.storage.upload_dir).map_err(|err| {
        error!(
            error = %err,
            upload_dir = %config.storage.upload_dir.display(),
            "Failed to create upload dir"
        );
        err
    })?;

    let swept = store.sweep_expired(Duration::from_secs(config.storage.working_file_ttl_secs));
    if swept > 0 {
        info!(swept, "Removed expired working files");
    }

    if config.llm.api_key.is_none() {
        warn!("No API key configured; narration requests will fail until one is set");
    }

    let ingestion = Arc::new(IngestionUseCase::new(config.preview_rows));
    let narrator = Arc::new(NarrateUseCase::new(llm_client, config.llm.clone()));
    let analysis = AnalysisUseCase::new(ingestion, narrator);

    info!(
        upload_dir = %store.root().display(),
        model = %config.llm.model,
        preview_rows = config.preview_rows,
        "Application state ready"
    );

    Ok(AppState {
        config,
        store,
        analysis,
    })
}
