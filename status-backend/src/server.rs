//! HTTP surface of the addon: manifest, catalog / meta / stream resources
//! (with and without a config token), configurator glue and static assets.

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use status_common::{
    CatalogDescriptor, CatalogResponse, DetailResponse, Manifest, ManifestBehaviorHints,
    ManifestResource, StreamsResponse,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use crate::config::ServiceConfig;
use crate::error::ApiError;
use crate::module::status::{decode_config, StatusService, StatusSummary, UserConfig, ID_PREFIX};
use crate::module::status::presenter::describe_summary;

const ADDON_ID: &str = "com.stremio.status";
const ADDON_NAME: &str = "Stremio Status";
const ADDON_DESCRIPTION: &str = "Shows health status of stremio addons & services";

const CATALOG_TYPE: &str = "other";
const CATALOG_ID: &str = "addon-status";
const CATALOG_NAME: &str = "Addon Status";
const CONTENT_TYPES: [&str; 3] = ["tv", "movie", "series"];

const CONFIGURATOR_PATH: &str = "/stremio/configure";
const CONFIGURATOR_PAGE: &str = "configure.html";

/// Posters are versioned through their query string, so cache them hard.
const STATIC_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub struct AppState {
    pub config: ServiceConfig,
    pub service: StatusService,
}

pub type SharedState = Arc<AppState>;

pub fn router(state: SharedState) -> Router {
    let static_dir = std::path::Path::new(&state.config.static_dir);
    let static_files = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        ))
        .service(ServeDir::new(static_dir));
    let configurator = ServeFile::new(static_dir.join(CONFIGURATOR_PAGE));
    let enable_cors = state.config.enable_cors;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/manifest.json", get(manifest))
        .route("/catalog/{catalog_type}/{catalog_id}", get(catalog))
        .route("/meta/{meta_type}/{meta_id}", get(meta))
        .route("/stream/{stream_type}/{stream_id}", get(stream))
        .route("/{token}/manifest.json", get(manifest_configured))
        .route("/{token}/catalog/{catalog_type}/{catalog_id}", get(catalog_configured))
        .route("/{token}/meta/{meta_type}/{meta_id}", get(meta_configured))
        .route("/{token}/stream/{stream_type}/{stream_id}", get(stream_configured))
        .route("/{token}/configure", get(configure_with_token))
        .route_service(CONFIGURATOR_PATH, configurator)
        .route("/configure", get(redirect_to_configurator))
        .route("/", get(redirect_to_configurator))
        .route("/api/endpoints", get(list_endpoints))
        .route("/api/summary", get(summary))
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

pub fn build_manifest(public_base_url: &str) -> Manifest {
    let types: Vec<String> = CONTENT_TYPES.iter().map(|t| t.to_string()).collect();
    Manifest {
        id: ADDON_ID.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        name: ADDON_NAME.to_string(),
        description: ADDON_DESCRIPTION.to_string(),
        logo: Some(format!("{}/static/logo.png", public_base_url)),
        resources: vec![
            ManifestResource::Named("catalog".to_string()),
            ManifestResource::Scoped {
                name: "meta".to_string(),
                types: types.clone(),
                id_prefixes: vec![ID_PREFIX.to_string()],
            },
            ManifestResource::Named("stream".to_string()),
        ],
        types,
        catalogs: vec![CatalogDescriptor {
            catalog_type: CATALOG_TYPE.to_string(),
            id: CATALOG_ID.to_string(),
            name: CATALOG_NAME.to_string(),
        }],
        id_prefixes: None,
        behavior_hints: ManifestBehaviorHints {
            configurable: true,
            configuration_required: false,
        },
    }
}

/// Addon resource ids arrive as `{id}.json`.
fn strip_json(segment: &str) -> &str {
    segment.strip_suffix(".json").unwrap_or(segment)
}

fn ensure_content_type(content_type: &str, what: &'static str) -> Result<(), ApiError> {
    if CONTENT_TYPES.contains(&content_type) {
        Ok(())
    } else {
        Err(ApiError::NotFound(what))
    }
}

fn redirect(status: StatusCode, location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}

async fn catalog_response(
    state: &AppState,
    config: &UserConfig,
    catalog_type: &str,
    catalog_id: &str,
) -> Result<Json<CatalogResponse>, ApiError> {
    let catalog_id = strip_json(catalog_id);
    debug!("Catalog request: type={}, id={}", catalog_type, catalog_id);

    if catalog_type != CATALOG_TYPE {
        return Err(ApiError::NotFound("Catalog type"));
    }
    if catalog_id != CATALOG_ID {
        return Err(ApiError::NotFound("Catalog"));
    }
    let metas = state.service.build_catalog(config).await;
    Ok(Json(CatalogResponse { metas }))
}

async fn meta_response(
    state: &AppState,
    config: &UserConfig,
    meta_type: &str,
    meta_id: &str,
) -> Result<Json<DetailResponse>, ApiError> {
    let meta_id = strip_json(meta_id);
    debug!("Meta request: type={}, id={}", meta_type, meta_id);

    ensure_content_type(meta_type, "Meta type")?;
    let meta = state
        .service
        .build_detail(meta_id, config)
        .await
        .ok_or(ApiError::NotFound("Addon"))?;
    Ok(Json(DetailResponse { meta }))
}

/// The requested content id is ignored: every item gets the same status streams.
async fn stream_response(
    state: &AppState,
    config: &UserConfig,
    stream_type: &str,
    stream_id: &str,
) -> Result<Json<StreamsResponse>, ApiError> {
    debug!("Stream request: type={}, id={}", stream_type, strip_json(stream_id));

    ensure_content_type(stream_type, "Stream type")?;
    let streams = state.service.build_streams(config).await;
    Ok(Json(StreamsResponse { streams }))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn manifest(State(state): State<SharedState>) -> Json<Manifest> {
    Json(build_manifest(&state.config.public_base_url))
}

async fn manifest_configured(
    State(state): State<SharedState>,
    Path(token): Path<String>,
) -> Json<Manifest> {
    // Decoded only so bad tokens get logged; the manifest is the same for everyone.
    let _ = decode_config(&token);
    Json(build_manifest(&state.config.public_base_url))
}

async fn catalog(
    State(state): State<SharedState>,
    Path((catalog_type, catalog_id)): Path<(String, String)>,
) -> Result<Json<CatalogResponse>, ApiError> {
    catalog_response(&state, &UserConfig::default(), &catalog_type, &catalog_id).await
}

async fn catalog_configured(
    State(state): State<SharedState>,
    Path((token, catalog_type, catalog_id)): Path<(String, String, String)>,
) -> Result<Json<CatalogResponse>, ApiError> {
    catalog_response(&state, &decode_config(&token), &catalog_type, &catalog_id).await
}

async fn meta(
    State(state): State<SharedState>,
    Path((meta_type, meta_id)): Path<(String, String)>,
) -> Result<Json<DetailResponse>, ApiError> {
    meta_response(&state, &UserConfig::default(), &meta_type, &meta_id).await
}

async fn meta_configured(
    State(state): State<SharedState>,
    Path((token, meta_type, meta_id)): Path<(String, String, String)>,
) -> Result<Json<DetailResponse>, ApiError> {
    meta_response(&state, &decode_config(&token), &meta_type, &meta_id).await
}

async fn stream(
    State(state): State<SharedState>,
    Path((stream_type, stream_id)): Path<(String, String)>,
) -> Result<Json<StreamsResponse>, ApiError> {
    stream_response(&state, &UserConfig::default(), &stream_type, &stream_id).await
}

async fn stream_configured(
    State(state): State<SharedState>,
    Path((token, stream_type, stream_id)): Path<(String, String, String)>,
) -> Result<Json<StreamsResponse>, ApiError> {
    stream_response(&state, &decode_config(&token), &stream_type, &stream_id).await
}

/// The configurator page decodes the token client-side.
async fn configure_with_token(Path(token): Path<String>) -> Response {
    debug!(
        "Redirecting to configurator with token {}...",
        token.chars().take(20).collect::<String>()
    );
    redirect(StatusCode::FOUND, &format!("{}?config={}", CONFIGURATOR_PATH, token))
}

async fn redirect_to_configurator() -> Response {
    redirect(StatusCode::MOVED_PERMANENTLY, CONFIGURATOR_PATH)
}

#[derive(Debug, Serialize)]
struct EndpointListing {
    key: String,
    name: String,
    group: String,
    healthy: bool,
}

#[derive(Debug, Serialize)]
struct EndpointsResponse {
    endpoints: Vec<EndpointListing>,
}

/// Addons known to the monitor, for the configurator's picker.
async fn list_endpoints(State(state): State<SharedState>) -> Json<EndpointsResponse> {
    let snapshot = state.service.snapshot().await;
    let endpoints = snapshot
        .iter()
        .map(|ep| EndpointListing {
            key: ep.key.clone(),
            name: ep.name.clone(),
            group: ep.group.clone(),
            healthy: ep.healthy,
        })
        .collect();
    Json(EndpointsResponse { endpoints })
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    #[serde(flatten)]
    summary: StatusSummary,
    description: String,
}

async fn summary(State(state): State<SharedState>) -> Json<SummaryResponse> {
    let summary = state.service.summary().await;
    let description = describe_summary(&summary);
    Json(SummaryResponse { summary, description })
}
