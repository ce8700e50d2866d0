use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use extract::{CompletionModel, Document, Extractor, Provider};
use graph::{GraphSummary, PlotConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::ResultCache;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};
use crate::ui::INDEX_HTML;

pub struct AppState<C = extract::ChatClient> {
    pub config: ServerConfig,
    pub extractors: HashMap<Provider, Extractor<C>>,
    pub cache: ResultCache,
    pub metrics: Arc<Metrics>,
}

impl<C> AppState<C> {
    pub fn new(config: ServerConfig, extractors: HashMap<Provider, Extractor<C>>) -> Self {
        let cache_entries = if config.cache.enabled { config.cache.max_entries } else { 0 };
        Self {
            config,
            extractors,
            cache: ResultCache::new(cache_entries),
            metrics: Metrics::new(),
        }
    }
}

pub fn router<C: CompletionModel + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check::<C>))
        .route("/extract", post(extract_graph::<C>))
        .route("/validate", post(validate_graph))
        .route("/render/mermaid", post(render_mermaid))
        .route("/render/png", post(render_png))
        .route("/stats", get(get_stats::<C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(Serialize)]
struct ProviderStatus {
    provider: Provider,
    api_key_configured: bool,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    default_provider: Provider,
    providers: Vec<ProviderStatus>,
}

#[derive(Deserialize)]
struct ExtractRequest {
    text: String,
    provider: Option<Provider>,
}

#[derive(Serialize)]
struct GraphResponse {
    document: Document,
    summary: GraphSummary,
    relationships: Vec<String>,
    mermaid: String,
}

impl GraphResponse {
    fn from_document(document: Document) -> Self {
        let kg = graph::assemble(&document);
        Self {
            summary: GraphSummary::of(&kg),
            relationships: graph::describe_edges(&kg),
            mermaid: graph::render_markdown(&kg),
            document,
        }
    }
}

const PREVIEW_CHARS: usize = 500;

#[derive(Serialize)]
struct ExtractResponse {
    request_id: Uuid,
    provider: Provider,
    cached: bool,
    source_preview: String,
    #[serde(flatten)]
    graph: GraphResponse,
}

#[derive(Serialize)]
struct StatsResponse {
    metrics: MetricsSnapshot,
    cached_documents: usize,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_check<C: CompletionModel + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<HealthResponse> {
    let providers = [Provider::Groq, Provider::OpenAi]
        .into_iter()
        .map(|provider| ProviderStatus {
            provider,
            api_key_configured: state.extractors.contains_key(&provider),
        })
        .collect();

    Json(HealthResponse {
        status: "ok",
        default_provider: state.config.default_provider,
        providers,
    })
}

async fn extract_graph<C: CompletionModel + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Json(req): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let result = run_extraction(&state, req).await;
    state.metrics.record_request(result.is_ok());
    if let Err(ApiError::Extract(e)) = &result {
        state.metrics.record_failure(e);
    }
    result.map(Json)
}

async fn run_extraction<C: CompletionModel>(
    state: &AppState<C>,
    req: ExtractRequest,
) -> Result<ExtractResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let source = ingest::ingest_text(req.text);
    if source.is_blank() {
        return Err(ApiError::BadRequest("text must not be empty".to_string()));
    }

    let provider = req.provider.unwrap_or(state.config.default_provider);
    let extractor = state.extractors.get(&provider).ok_or_else(|| {
        extract::Error::Config(format!("{} not found in environment", provider.api_key_env()))
    })?;

    let cache_key = ResultCache::key(provider, &source.doc_id);
    if let Some(document) = state.cache.get(&cache_key) {
        info!(%request_id, %provider, doc_id = %source.doc_id, "Serving cached extraction");
        state.metrics.record_cache_hit();
        return Ok(ExtractResponse {
            request_id,
            provider,
            cached: true,
            source_preview: source.preview(PREVIEW_CHARS),
            graph: GraphResponse::from_document(document),
        });
    }

    info!(%request_id, %provider, chars = source.char_count(), "Extraction requested");
    let timer = TimedOperation::start();
    let document = extractor.extract_from_text(&source.text).await.inspect_err(|e| {
        warn!(%request_id, error = %e, "Extraction failed");
    })?;

    state.metrics.record_extract(
        timer.elapsed(),
        document.entities().len(),
        document.relationships().len(),
    );
    state.cache.insert(cache_key, document.clone());

    Ok(ExtractResponse {
        request_id,
        provider,
        cached: false,
        source_preview: source.preview(PREVIEW_CHARS),
        graph: GraphResponse::from_document(document),
    })
}

async fn validate_graph(Json(raw): Json<serde_json::Value>) -> Result<Json<GraphResponse>, ApiError> {
    let document = extract::validate(&raw)?;
    Ok(Json(GraphResponse::from_document(document)))
}

async fn render_mermaid(Json(raw): Json<serde_json::Value>) -> Result<impl IntoResponse, ApiError> {
    let document = extract::validate(&raw)?;
    let markdown = graph::render_markdown(&graph::assemble(&document));
    Ok(([(header::CONTENT_TYPE, "text/markdown; charset=utf-8")], markdown))
}

async fn render_png(Json(raw): Json<serde_json::Value>) -> Result<impl IntoResponse, ApiError> {
    let document = extract::validate(&raw)?;
    // Layout and rasterising are CPU bound
    let png = tokio::task::spawn_blocking(move || draw_png(&document))
        .await
        .map_err(|e| ApiError::Render(e.to_string()))??;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

fn draw_png(document: &Document) -> Result<Vec<u8>, ApiError> {
    let kg = graph::assemble(document);
    // The bitmap backend picks its encoder from the file extension
    let file = tempfile::Builder::new()
        .prefix("graph_visualization")
        .suffix(".png")
        .tempfile()
        .map_err(|e| ApiError::Render(e.to_string()))?;

    graph::render_png(&kg, file.path(), &PlotConfig::default()).map_err(|e| {
        warn!(error = %e, "PNG rendering failed");
        ApiError::Render(format!("{:#}", e))
    })?;
    std::fs::read(file.path()).map_err(|e| ApiError::Render(e.to_string()))
}

async fn get_stats<C: CompletionModel + 'static>(
    State(state): State<Arc<AppState<C>>>,
) -> Json<StatsResponse> {
    Json(StatsResponse {
        metrics: state.metrics.snapshot(),
        cached_documents: state.cache.len(),
    })
}
