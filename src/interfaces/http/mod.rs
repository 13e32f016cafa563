pub mod api;
pub mod pages;
pub mod render;

use std::sync::{Arc, Mutex};

use actix_cors::Cors;
use actix_multipart::form::{bytes::Bytes as UploadBytes, MultipartFormConfig};
use actix_web::http::{header, StatusCode};
use actix_web::{dev::Server, middleware, web, App, HttpResponse, HttpServer};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::domain::error::{AppError, Result};
use crate::interfaces::state::AppState;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(app: Arc<AppState>) -> Self {
        Self {
            app,
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn log(&self, level: &str, source: &str, message: &str) {
        add_log(&self.logs, level, source, message);
    }
}

/// Record an entry in the in-memory buffer and mirror it to `tracing`.
pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => error!(source = source, "{}", message),
        "WARN" => warn!(source = source, "{}", message),
        _ => info!(source = source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

/// Plain-text error response with a status matching the error kind.
pub fn error_response(err: &AppError) -> HttpResponse {
    let status = match err {
        AppError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AppError::ParseError(_) | AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::NarratorError(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(err.to_string())
}

/// A file part counts as chosen only when it carries a file name. Browsers send
/// an empty part with `filename=""` when the user picks nothing.
pub fn chosen_file(file: Option<UploadBytes>) -> Option<UploadBytes> {
    file.filter(|file| {
        file.file_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty())
    })
}

/// Run filesystem work on the blocking pool so workers stay responsive.
pub async fn blocking<F, R>(work: F) -> Result<R>
where
    F: FnOnce() -> Result<R> + Send + 'static,
    R: Send + 'static,
{
    web::block(work)
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

pub fn redirect_home() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Register both front-ends: HTML pages at the root, JSON under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::index)
        .service(pages::upload)
        .service(pages::analyze)
        .service(
            web::scope("/api")
                .wrap(Cors::permissive())
                .service(api::preview)
                .service(api::analyze)
                .service(api::get_logs),
        );
}

pub fn multipart_config(max_upload_bytes: usize) -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(max_upload_bytes)
        .memory_limit(max_upload_bytes)
}

pub fn start_server(app: Arc<AppState>) -> std::io::Result<Server> {
    let host = app.config.server.host.clone();
    let port = app.config.server.port;
    let max_upload_bytes = app.config.storage.max_upload_bytes;
    let state = web::Data::new(HttpState::new(app));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .app_data(multipart_config(max_upload_bytes))
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run();

    info!(host = %host, port, "listening");
    Ok(server)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::infrastructure::bootstrap;
    use crate::infrastructure::config::AppConfig;
    use crate::infrastructure::llm_clients::testing::StubClient;

    pub const BOUNDARY: &str = "datastory-test-boundary";

    pub fn state(dir: &std::path::Path, client: Arc<StubClient>) -> web::Data<HttpState> {
        let mut config = AppConfig::default();
        config.storage.upload_dir = dir.join("uploads");
        config.preview_rows = 2;
        let app = bootstrap::setup(config, client).unwrap();
        web::Data::new(HttpState::new(Arc::new(app)))
    }

    pub fn multipart_body(file_name: &str, content: &str) -> String {
        format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{b}--\r\n",
            b = BOUNDARY,
            name = file_name,
            content = content,
        )
    }

    pub fn multipart_content_type() -> (header::HeaderName, String) {
        (
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
    }
}
