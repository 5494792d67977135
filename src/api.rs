use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::analysis::{AnalysisResult, Analyzer};
use crate::config::Settings;
use crate::error::{AppError, ErrorResponse, Result};

static INDEX_HTML: &str = include_str!("../static/index.html");

pub struct AppState {
    pub analyzer: Analyzer,
    pub settings: Settings,
}

/// Form posted by the index page
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeForm {
    /// Left blank, this is reported as an invalid URL
    #[serde(default)]
    #[schema(example = "https://www.youtube.com/watch?v=dQw4w9WgXcQ")]
    pub video_url: String,
    /// Maximum number of comments to fetch; blank means the server default
    #[schema(example = "800")]
    pub comment_count: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Turns the optional form value into a comment budget, clamped to the
/// configured maximum.
pub fn resolve_comment_count(raw: Option<&str>, settings: &Settings) -> Result<usize> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(settings.default_comment_count),
        Some(raw) => raw,
    };
    match raw.parse::<usize>() {
        Ok(0) | Err(_) => Err(AppError::InvalidCommentCount(raw.to_string())),
        Ok(n) => Ok(n.min(settings.max_comment_count)),
    }
}

/// Input form
#[utoipa::path(
    get,
    path = "/",
    tag = "analysis",
    responses(
        (status = 200, description = "HTML form for submitting a video URL", body = String, content_type = "text/html")
    )
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Fetch, filter and score the comments of a video
#[utoipa::path(
    post,
    path = "/analyze",
    tag = "analysis",
    request_body(content = AnalyzeForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Sentiment verdict", body = AnalysisResult),
        (status = 400, description = "Invalid URL, comment count or form body", body = ErrorResponse),
        (status = 502, description = "YouTube API request failed", body = ErrorResponse)
    )
)]
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<AnalyzeForm>, FormRejection>,
) -> Result<Json<AnalysisResult>> {
    let Form(form) = form?;
    let max_comments = resolve_comment_count(form.comment_count.as_deref(), &state.settings)?;
    let result = state.analyzer.analyze(&form.video_url, max_comments).await?;
    Ok(Json(result))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
