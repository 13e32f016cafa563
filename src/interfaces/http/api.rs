//! JSON endpoints for widget clients. Uploads stay in memory.

use actix_multipart::form::{bytes::Bytes as UploadBytes, MultipartForm};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use super::{chosen_file, error_response, HttpState};
use crate::domain::error::{AppError, Result};
use crate::domain::file_format::FileFormat;
use crate::domain::narrative::Narrative;
use crate::domain::table::{CellValue, SummaryReport, Table};

#[derive(MultipartForm)]
pub struct ApiUploadForm {
    pub file: Option<UploadBytes>,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub file_name: String,
    pub format: FileFormat,
    pub headers: Vec<String>,
    pub preview: Vec<Vec<CellValue>>,
    pub report_text: String,
    pub report: SummaryReport,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub file_name: String,
    pub report_text: String,
    pub report: SummaryReport,
    pub insights: Narrative,
    pub story: Narrative,
}

/// Body format for `/api/analyze`; `txt` downloads the insights as a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzeFormat {
    #[default]
    Json,
    Txt,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    #[serde(default)]
    pub format: AnalyzeFormat,
}

pub const INSIGHTS_FILE_NAME: &str = "data_insights.txt";

fn insights_download(insights: &Narrative) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(INSIGHTS_FILE_NAME.to_string())],
        })
        .body(insights.text.clone())
}

fn read_upload(form: ApiUploadForm) -> Result<(String, FileFormat, Vec<u8>)> {
    let file = chosen_file(form.file)
        .ok_or_else(|| AppError::ValidationError("missing multipart field 'file'".to_string()))?;
    let file_name = file.file_name.clone().unwrap_or_default();
    let format = FileFormat::from_file_name(&file_name)?;
    Ok((file_name, format, file.data.to_vec()))
}

fn rows_of(table: &Table) -> Vec<Vec<CellValue>> {
    table
        .rows()
        .map(|row| row.into_iter().cloned().collect())
        .collect()
}

#[post("/preview")]
pub async fn preview(
    data: web::Data<HttpState>,
    MultipartForm(form): MultipartForm<ApiUploadForm>,
) -> impl Responder {
    let (file_name, format, bytes) = match read_upload(form) {
        Ok(upload) => upload,
        Err(e) => return error_response(&e),
    };

    match data.app.analysis.digest(bytes, format).await {
        Ok(digest) => HttpResponse::Ok().json(PreviewResponse {
            file_name,
            format,
            headers: digest.preview.headers().into_iter().map(String::from).collect(),
            preview: rows_of(&digest.preview),
            report_text: digest.report.text(),
            report: digest.report,
        }),
        Err(e) => {
            data.log("ERROR", "HttpApi", &format!("Preview of {} failed: {}", file_name, e));
            error_response(&e)
        }
    }
}

#[post("/analyze")]
pub async fn analyze(
    data: web::Data<HttpState>,
    query: web::Query<AnalyzeQuery>,
    MultipartForm(form): MultipartForm<ApiUploadForm>,
) -> impl Responder {
    let (file_name, format, bytes) = match read_upload(form) {
        Ok(upload) => upload,
        Err(e) => return error_response(&e),
    };

    data.log("INFO", "HttpApi", &format!("Analyzing {}", file_name));

    match data.app.analysis.insights(bytes, format).await {
        Ok(result) if query.format == AnalyzeFormat::Txt => insights_download(&result.insights),
        Ok(result) => HttpResponse::Ok().json(AnalyzeResponse {
            file_name,
            report_text: result.digest.report.text(),
            report: result.digest.report,
            insights: result.insights,
            story: result.story,
        }),
        Err(e) => {
            data.log("ERROR", "HttpApi", &format!("Analysis of {} failed: {}", file_name, e));
            error_response(&e)
        }
    }
}

#[get("/logs")]
pub async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .map(|logs| logs.clone())
        .unwrap_or_default();
    HttpResponse::Ok().json(logs)
}
