use crate::application::AnalysisUseCase;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::storage::WorkingStore;

/// Shared, read-only application state handed to every request.
pub struct AppState {
    pub config: AppConfig,
    pub store: WorkingStore,
    pub analysis: AnalysisUseCase,
}
