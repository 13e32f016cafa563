use std::time::Duration;

use actix_multipart::form::{bytes::Bytes as UploadBytes, MultipartForm};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

use super::{blocking, chosen_file, error_response, redirect_home, render, HttpState};
use crate::domain::file_format::FileFormat;

#[derive(MultipartForm)]
pub struct UploadForm {
    pub file: Option<UploadBytes>,
}

#[derive(Deserialize)]
pub struct AnalyzeForm {
    pub filename: Option<String>,
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

#[get("/")]
pub async fn index() -> impl Responder {
    html(render::index_page())
}

/// Store the upload as a working file and show a preview of it.
#[post("/")]
pub async fn upload(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<UploadForm>,
) -> impl Responder {
    let Some(file) = chosen_file(form.file) else {
        return redirect_home();
    };
    let file_name = file.file_name.clone().unwrap_or_default();

    let format = match FileFormat::from_file_name(&file_name) {
        Ok(format) => format,
        Err(e) => {
            data.log("WARN", "Upload", &format!("Rejected {}: {}", file_name, e));
            return error_response(&e);
        }
    };

    let ttl = Duration::from_secs(data.app.config.storage.working_file_ttl_secs);
    let state = data.clone();
    let bytes = file.data.clone();
    let stored = blocking(move || {
        let swept = state.app.store.sweep_expired(ttl);
        let working = state.app.store.save(format, &bytes)?;
        Ok((swept, working))
    })
    .await;

    let working = match stored {
        Ok((swept, working)) => {
            if swept > 0 {
                data.log("INFO", "Upload", &format!("Swept {} expired working files", swept));
            }
            working
        }
        Err(e) => {
            data.log("ERROR", "Upload", &format!("Failed to store {}: {}", file_name, e));
            return error_response(&e);
        }
    };

    match data.app.analysis.digest(file.data.to_vec(), format).await {
        Ok(digest) => {
            let file_id = working.retain();
            data.log(
                "INFO",
                "Upload",
                &format!(
                    "Stored {} as {} ({} rows × {} columns)",
                    file_name, file_id, digest.report.rows, digest.report.columns
                ),
            );
            html(render::preview_page(&file_id, &file_name, &digest.preview))
        }
        Err(e) => {
            data.log("ERROR", "Upload", &format!("Failed to read {}: {}", file_name, e));
            error_response(&e)
        }
    }
}

/// Summarize and narrate a previously uploaded file. The working file is
/// released when this handler returns, whatever the outcome.
#[post("/analyze")]
pub async fn analyze(data: web::Data<HttpState>, form: web::Form<AnalyzeForm>) -> impl Responder {
    let Some(file_id) = form.filename.clone().filter(|id| !id.is_empty()) else {
        return redirect_home();
    };

    let state = data.clone();
    let claimed = blocking(move || {
        let working = state.app.store.claim(&file_id)?;
        let bytes = working.read()?;
        Ok((working, bytes))
    })
    .await;
    let (working, bytes) = match claimed {
        Ok(claimed) => claimed,
        Err(e) => return error_response(&e),
    };

    data.log("INFO", "Analyze", &format!("Generating story for {}", working.id()));

    match data.app.analysis.story(bytes, working.format()).await {
        Ok(result) => html(render::insights_page(
            &result.digest.report.text(),
            &result.story,
            &result.digest.preview,
        )),
        Err(e) => {
            data.log("ERROR", "Analyze", &format!("Analysis failed: {}", e));
            error_response(&e)
        }
    }
}
