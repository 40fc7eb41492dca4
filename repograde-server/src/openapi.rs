//! OpenAPI specification for RepoGrade server.

use utoipa::OpenApi;

use repograde_core::{
    AnalysisReport, AnalysisResult, CategoryResult, CategoryStatus, Level, Priority,
    RepositoryInfo, RoadmapItem,
};

use crate::routes::{AnalyzeRequest, ErrorResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::analyze_repository,
        crate::routes::health,
        crate::routes::openapi_json
    ),
    components(
        schemas(
            AnalyzeRequest,
            AnalysisReport,
            AnalysisResult,
            CategoryResult,
            CategoryStatus,
            Level,
            Priority,
            RoadmapItem,
            RepositoryInfo,
            ErrorResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "analysis", description = "Repository analysis"),
        (name = "system", description = "System endpoints")
    )
)]
/// OpenAPI specification for the RepoGrade server.
pub struct ApiDoc;
