use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sns_core::persist::load_lookup;
use sns_core::tokenizer::tokenize_with;
use sns_core::LookupTable;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

#[derive(Deserialize)]
pub struct StemParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct StemResponse {
    pub query: String,
    pub took_s: f64,
    pub tokens: Vec<StemmedToken>,
}

#[derive(Serialize)]
pub struct StemmedToken {
    pub term: String,
    pub stem: String,
    /// False when the term had no entry and was stemmed to itself.
    pub matched: bool,
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub terms: usize,
    pub stems: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub lookup_path: PathBuf,
    pub table: Arc<RwLock<LookupTable>>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn load(lookup_path: impl Into<PathBuf>, admin_token: Option<String>) -> Result<Self> {
        let lookup_path = lookup_path.into();
        let table = load_lookup(&lookup_path)?;
        tracing::info!(path = %lookup_path.display(), terms = table.len(), "lookup table loaded");
        Ok(Self { lookup_path, table: Arc::new(RwLock::new(table)), admin_token })
    }
}

pub fn build_app(lookup_path: impl Into<PathBuf>) -> Result<Router> {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let app_state = AppState::load(lookup_path, admin_token)?;
    Ok(router(app_state))
}

pub fn router(app_state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stem", get(stem_handler))
        .route("/stats", get(stats_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
}

pub async fn stem_handler(State(state): State<AppState>, Query(params): Query<StemParams>) -> Json<StemResponse> {
    let start = std::time::Instant::now();
    let table = state.table.read();
    let tokens = tokenize_with(&params.q, true)
        .into_iter()
        .map(|(term, _pos)| {
            let (stem, matched) = match table.get(&term) {
                Some(stem) => (stem.to_string(), true),
                None => (term.clone(), false),
            };
            StemmedToken { term, stem, matched }
        })
        .collect();
    drop(table);

    let elapsed = start.elapsed();
    Json(StemResponse { query: params.q, took_s: elapsed.as_secs_f64(), tokens })
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let table = state.table.read();
    Json(StatsResponse { terms: table.len(), stems: table.distinct_stems() })
}

async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StatsResponse>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let table = load_lookup(&state.lookup_path).map_err(|e| {
        tracing::warn!(error = %e, "lookup reload failed");
        (StatusCode::INTERNAL_SERVER_ERROR, format!("reload failed: {e}"))
    })?;
    let stats = StatsResponse { terms: table.len(), stems: table.distinct_stems() };
    *state.table.write() = table;
    tracing::info!(terms = stats.terms, "lookup table reloaded");
    Ok(Json(stats))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
