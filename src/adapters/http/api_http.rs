//! Bible2PPT HTTP API server.
//!
//! Exposes the bible cache, template storage, deck builds and verse
//! parsing over JSON. `POST /api/v1/generate` runs the whole workflow in
//! one request: cached bibles for a source, a rendered template and a
//! build result. Each generate run, successful or not, is kept in the
//! build history served under `/api/v1/history`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domain::errors::DomainError;
use crate::domain::models::{
    Bible, Book, BuildRecord, BuildRequest, BuildResult, ParsedVerseQuery, ServerConfig, Template,
};
use crate::services::{AppServices, VerseQueryParser};

/// Configuration for the API HTTP server.
#[derive(Debug, Clone)]
pub struct ApiHttpConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Whether to enable CORS.
    pub enable_cors: bool,
}

impl Default for ApiHttpConfig {
    fn default() -> Self {
        Self::from(&ServerConfig::default())
    }
}

impl From<&ServerConfig> for ApiHttpConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            enable_cors: config.enable_cors,
        }
    }
}

/// Request for the combined generate workflow.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub source_id: i64,
    /// Inline template content. Takes precedence over `template_id`.
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub template_id: Option<i64>,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(default)]
    pub build: Option<BuildRequest>,
}

/// Response for the combined generate workflow.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub bibles: Vec<Bible>,
    pub rendered: String,
    pub build_result: BuildResult,
}

/// Request to store a template.
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

/// Request to parse a verse query.
#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub query: String,
}

/// Response with a rendered template.
#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub rendered: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

fn api_error(status: StatusCode, code: &str, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
        }),
    )
}

impl From<DomainError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: DomainError) -> Self {
        let (status, code) = match &err {
            DomainError::BibleNotFound(_) => (StatusCode::NOT_FOUND, "BIBLE_NOT_FOUND"),
            DomainError::TemplateNotFound(_) => (StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND"),
            DomainError::BuildRecordNotFound(_) => (StatusCode::NOT_FOUND, "BUILD_RECORD_NOT_FOUND"),
            DomainError::MissingTemplateKey(_) => (StatusCode::UNPROCESSABLE_ENTITY, "MISSING_TEMPLATE_KEY"),
            DomainError::MalformedTemplate(_) => (StatusCode::UNPROCESSABLE_ENTITY, "MALFORMED_TEMPLATE"),
            DomainError::ValidationFailed(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            DomainError::FetchFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "FETCH_ERROR"),
            DomainError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            DomainError::SerializationError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SERIALIZATION_ERROR"),
            DomainError::OutputError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "OUTPUT_ERROR"),
        };
        if status.is_server_error() {
            tracing::error!(error = %err, code, "request failed");
        }
        api_error(status, code, err)
    }
}

/// Bible2PPT HTTP API server.
pub struct ApiHttpServer {
    config: ApiHttpConfig,
    services: AppServices,
}

impl ApiHttpServer {
    pub fn new(services: AppServices, config: ApiHttpConfig) -> Self {
        Self { config, services }
    }

    /// Build the router.
    pub fn build_router(self) -> Router {
        let app = Router::new()
            // Combined workflow
            .route("/api/v1/generate", post(generate))
            // Bible cache
            .route("/api/v1/bibles/{source_id}", get(list_bibles))
            .route("/api/v1/bible/{id}", get(get_bible))
            .route("/api/v1/bible/{id}/books", get(list_books))
            .route("/api/v1/bible/{id}/parse", post(parse_query))
            .route("/api/v1/cache", axum::routing::delete(clear_cache))
            // Templates
            .route("/api/v1/templates", get(list_templates).post(create_template))
            .route("/api/v1/templates/{id}", get(get_template).delete(delete_template))
            .route("/api/v1/templates/{id}/render", post(render_template))
            // Build history
            .route("/api/v1/history", get(list_history))
            .route("/api/v1/history/{id}", get(get_history_record).delete(delete_history_record))
            // Health check
            .route("/health", get(health_check))
            .with_state(self.services);

        if self.config.enable_cors {
            app.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
                .layer(TraceLayer::new_for_http())
        } else {
            app.layer(TraceLayer::new_for_http())
        }
    }

    fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.config.host, self.config.port).parse()
    }

    /// Start the server.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.addr()?;
        let router = self.build_router();

        tracing::info!("Bible2PPT HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Start the server with a shutdown signal.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.addr()?;
        let router = self.build_router();

        tracing::info!("Bible2PPT HTTP server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown).await?;
        Ok(())
    }
}

// Handler functions

async fn health_check() -> &'static str {
    "OK"
}

/// Any failure in the workflow is reported as a 500, whatever its kind.
async fn generate(
    State(services): State<AppServices>,
    Json(request): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    run_generate(&services, request).await.map(Json).map_err(|err| {
        tracing::error!(error = %err, "generate failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "GENERATE_ERROR", err)
    })
}

/// Build request for a generate run: the explicit one, or a title-only
/// deck named after `data.title`.
fn generate_build_request(request: &GenerateRequest) -> BuildRequest {
    request.build.clone().unwrap_or_else(|| BuildRequest {
        title: request.data.get("title").and_then(Value::as_str).map(str::to_string),
        ..BuildRequest::default()
    })
}

async fn run_generate(services: &AppServices, request: GenerateRequest) -> Result<GenerateResponse, DomainError> {
    let build = generate_build_request(&request);

    let (bibles, rendered) = match prepare_generate(services, &request).await {
        Ok(prepared) => prepared,
        Err(err) => {
            services
                .builds
                .record_failure(&build, Some(request.source_id), &err.to_string())
                .await;
            return Err(err);
        }
    };

    let build_result = services.builds.process_for_source(&build, Some(request.source_id)).await;

    Ok(GenerateResponse {
        bibles,
        rendered,
        build_result,
    })
}

async fn prepare_generate(services: &AppServices, request: &GenerateRequest) -> Result<(Vec<Bible>, String), DomainError> {
    let bibles = services.bibles.get_bibles(request.source_id).await?;

    let rendered = match (&request.template, request.template_id) {
        (Some(content), _) => services.templates.process_template(content, &request.data)?,
        (None, Some(id)) => services.templates.render(id, &request.data).await?,
        (None, None) => String::new(),
    };

    Ok((bibles, rendered))
}

async fn list_bibles(State(services): State<AppServices>, Path(source_id): Path<i64>) -> ApiResult<Json<Vec<Bible>>> {
    Ok(Json(services.bibles.get_bibles(source_id).await?))
}

async fn get_bible(State(services): State<AppServices>, Path(id): Path<i64>) -> ApiResult<Json<Bible>> {
    services
        .bibles
        .find_bible(id)
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::BibleNotFound(id).into())
}

async fn list_books(State(services): State<AppServices>, Path(id): Path<i64>) -> ApiResult<Json<Vec<Book>>> {
    Ok(Json(services.bibles.get_books(id).await?))
}

async fn parse_query(
    State(services): State<AppServices>,
    Path(id): Path<i64>,
    Json(request): Json<ParseRequest>,
) -> ApiResult<Json<Vec<ParsedVerseQuery>>> {
    let books = services.bibles.get_books(id).await?;
    let parser = VerseQueryParser::new(&books)?;
    Ok(Json(parser.parse(&request.query)))
}

async fn clear_cache(State(services): State<AppServices>) -> ApiResult<StatusCode> {
    services.bibles.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_templates(State(services): State<AppServices>) -> ApiResult<Json<Vec<Template>>> {
    Ok(Json(services.templates.list_templates().await?))
}

async fn create_template(
    State(services): State<AppServices>,
    Json(request): Json<CreateTemplateRequest>,
) -> ApiResult<(StatusCode, Json<Template>)> {
    let template = services.templates.create_template(&request.name, &request.content).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

async fn get_template(State(services): State<AppServices>, Path(id): Path<i64>) -> ApiResult<Json<Template>> {
    services
        .templates
        .load_template(id)
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::TemplateNotFound(id).into())
}

async fn delete_template(State(services): State<AppServices>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    services.templates.delete_template(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn render_template(
    State(services): State<AppServices>,
    Path(id): Path<i64>,
    Json(data): Json<Map<String, Value>>,
) -> ApiResult<Json<RenderResponse>> {
    let rendered = services.templates.render(id, &data).await?;
    Ok(Json(RenderResponse { rendered }))
}

async fn list_history(State(services): State<AppServices>) -> ApiResult<Json<Vec<BuildRecord>>> {
    Ok(Json(services.builds.history().await?))
}

async fn get_history_record(State(services): State<AppServices>, Path(id): Path<i64>) -> ApiResult<Json<BuildRecord>> {
    services
        .builds
        .find_record(id)
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::BuildRecordNotFound(id).into())
}

async fn delete_history_record(State(services): State<AppServices>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    services.builds.delete_record(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
