//! HTTP handlers for RepoGrade server.

use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use repograde_core::{AnalysisReport, LocatorError, RepoLocator, RepositoryInfo, analyze};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::github::{FetchError, GitHubApiClient, GitHubConfig, fetch_snapshot};
use crate::openapi::ApiDoc;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// GitHub API settings.
    pub github: GitHubConfig,
}

/// Request payload for repository analysis.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Repository URL, e.g. `https://github.com/owner/name`.
    #[serde(default)]
    pub url: String,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
}

/// Health probe payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
}

fn error_response(builder: &mut actix_web::HttpResponseBuilder, error: String) -> HttpResponse {
    builder.json(ErrorResponse { error })
}

/// JSON extractor config: unreadable bodies answer like a missing URL.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::info!("rejecting analyze payload: {err}");
    let response = error_response(
        &mut HttpResponse::BadRequest(),
        LocatorError::MissingUrl.to_string(),
    );
    InternalError::from_response(err, response).into()
}

fn fetch_error_response(err: FetchError) -> HttpResponse {
    match err {
        FetchError::NotFound(_) => error_response(&mut HttpResponse::NotFound(), err.to_string()),
        FetchError::Transport(message) | FetchError::Decode(message) => {
            error_response(&mut HttpResponse::InternalServerError(), message)
        }
    }
}

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Repository analysis", body = AnalysisReport),
        (status = 400, description = "Missing or malformed URL", body = ErrorResponse),
        (status = 404, description = "Repository not found", body = ErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    ),
    tag = "analysis"
)]
#[post("/api/analyze")]
/// Analyze a public GitHub repository.
pub async fn analyze_repository(
    state: web::Data<AppState>,
    payload: web::Json<AnalyzeRequest>,
) -> impl Responder {
    let locator = match RepoLocator::parse(&payload.url) {
        Ok(locator) => locator,
        Err(err) => {
            log::info!("rejecting analyze request: {err}");
            return error_response(&mut HttpResponse::BadRequest(), err.to_string());
        }
    };
    log::info!("analyzing repository {locator}");

    let config = state.github.clone();
    let target = locator.clone();
    let result = web::block(move || {
        let client = GitHubApiClient::new(config);
        let snapshot = fetch_snapshot(&client, &target)?;
        let analysis = analyze(
            &snapshot.attributes,
            snapshot.commits.as_deref(),
            snapshot.listing.as_deref(),
        );
        Ok::<_, FetchError>(AnalysisReport::success(
            RepositoryInfo::from(&snapshot.attributes),
            analysis,
        ))
    })
    .await
    .unwrap_or_else(|err| Err(FetchError::Transport(format!("analysis failed: {err}"))));

    match result {
        Ok(report) => {
            log::info!("{locator} scored {}", report.analysis.score);
            HttpResponse::Ok().json(report)
        }
        Err(err) => {
            log::warn!("analysis of {locator} failed: {err}");
            fetch_error_response(err)
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    ),
    tag = "system"
)]
#[get("/api/health")]
/// Liveness probe.
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document", body = serde_json::Value)
    ),
    tag = "system"
)]
#[get("/api/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
