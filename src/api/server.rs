//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use super::handlers;
use super::models::{
    AddVideoRequest, ApiResponse, BulkAddRequest, EditModeRequest, PlayerQuery, RemovedResponse,
    SearchQuery,
};
use crate::config::Config;
use crate::error::PlaylistError;
use crate::flows::{
    actions, AiAssistant, ComplianceInput, GeneratePlaylistInput, IntelligenceInput,
    MusicSuggestionInput,
};
use crate::playlist::PlaylistStore;
use crate::search::{SearchResult, VideoSearchClient};
use crate::storage::FileStore;
use crate::video::suggested_videos;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub playlist: Arc<RwLock<PlaylistStore<FileStore>>>,
    pub search: Arc<VideoSearchClient>,
    pub ai: Option<Arc<AiAssistant>>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Open the persisted playlist and build the search and AI clients
    pub async fn from_config(config: Arc<Config>) -> Result<Self> {
        let store = FileStore::open(&config.storage.data_dir).await?;
        let playlist = PlaylistStore::open(store, config.storage.playlist_key.clone()).await?;
        let search = Arc::new(VideoSearchClient::new(config.search.clone()));

        let ai = match AiAssistant::from_config(&config.llm) {
            Ok(ai) => Some(Arc::new(ai.with_search_tool(search.clone()))),
            Err(e) => {
                warn!("AI helpers disabled: {}", e);
                None
            }
        };

        Ok(Self {
            playlist: Arc::new(RwLock::new(playlist)),
            search,
            ai,
            config,
        })
    }
}

/// Map a library error to an HTTP status
pub fn status_for(error: &PlaylistError) -> StatusCode {
    match error {
        PlaylistError::InvalidUrl(_) | PlaylistError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        PlaylistError::NotFound(_) | PlaylistError::NoResults(_) => StatusCode::NOT_FOUND,
        PlaylistError::MissingApiKey(_) => StatusCode::FAILED_DEPENDENCY,
        PlaylistError::SearchFailed(_) | PlaylistError::Llm(_) | PlaylistError::Http(_) => {
            StatusCode::BAD_GATEWAY
        }
        PlaylistError::Storage(_) | PlaylistError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn respond<T: Serialize>(result: crate::error::Result<T>) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::success(data))).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                warn!("Request failed: {}", e);
            }
            (status, Json(ApiResponse::<()>::error(e.to_string()))).into_response()
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(app_state: AppState) -> Router {
    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))

        // Playlist endpoints
        .route("/api/playlist", get(playlist_handler).delete(clear_handler))
        .route("/api/playlist/videos", post(add_video_handler))
        .route("/api/playlist/videos/bulk", post(bulk_add_handler))
        .route("/api/playlist/videos/:id", delete(remove_video_handler))
        .route("/api/playlist/current/:id", post(select_handler))
        .route("/api/playlist/edit-mode", put(edit_mode_handler))
        .route("/api/playlist/selection/:id", post(toggle_selection_handler))
        .route("/api/playlist/selection", delete(delete_selected_handler))
        .route("/api/suggestions", get(suggestions_handler))
        .route("/api/player", get(player_handler))

        // Search endpoints
        .route("/api/search", get(search_handler))
        .route("/api/search/add", post(search_add_handler))

        // AI helper endpoints
        .route("/api/ai/music", post(music_handler))
        .route("/api/ai/compliance", post(compliance_handler))
        .route("/api/ai/summary", post(summary_handler))
        .route("/api/ai/playlist", post(generate_handler))

        // Add state and middleware
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Configure and start the HTTP server
pub async fn start_http_server(app_state: AppState, host: &str, port: u16) -> Result<()> {
    info!("🚀 Starting HTTP server on {}:{}", host, port);

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(format!("{}:{}", host, port)).await?;
    info!("🌐 API server listening on http://{}:{}", host, port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match handlers::health_check(&state).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => {
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            (status, Json(serde_json::json!({"error": e.to_string()}))).into_response()
        }
    }
}

async fn playlist_handler(State(state): State<AppState>) -> impl IntoResponse {
    respond(handlers::get_playlist(&state).await)
}

async fn clear_handler(State(state): State<AppState>) -> impl IntoResponse {
    respond(handlers::clear_playlist(&state).await)
}

async fn add_video_handler(
    State(state): State<AppState>,
    Json(payload): Json<AddVideoRequest>,
) -> impl IntoResponse {
    respond(handlers::add_video(&state, payload).await)
}

async fn bulk_add_handler(
    State(state): State<AppState>,
    Json(payload): Json<BulkAddRequest>,
) -> impl IntoResponse {
    respond(handlers::add_videos(&state, payload.videos).await)
}

async fn remove_video_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(handlers::remove_video(&state, &id).await)
}

async fn select_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(handlers::select_video(&state, &id).await)
}

async fn edit_mode_handler(
    State(state): State<AppState>,
    Json(payload): Json<EditModeRequest>,
) -> impl IntoResponse {
    respond(handlers::set_edit_mode(&state, payload.enabled).await)
}

async fn toggle_selection_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    respond(handlers::toggle_selection(&state, &id).await)
}

async fn delete_selected_handler(State(state): State<AppState>) -> impl IntoResponse {
    respond(
        handlers::delete_selected(&state)
            .await
            .map(|removed| RemovedResponse { removed }),
    )
}

async fn suggestions_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(suggested_videos())))
}

async fn player_handler(
    State(state): State<AppState>,
    Query(query): Query<PlayerQuery>,
) -> impl IntoResponse {
    Html(handlers::player_html(&state, query.audio_only).await)
}

async fn search_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    respond(handlers::search(&state, &query.q, query.max_results).await)
}

async fn search_add_handler(
    State(state): State<AppState>,
    Json(payload): Json<SearchResult>,
) -> impl IntoResponse {
    respond(handlers::add_search_result(&state, payload).await)
}

async fn music_handler(
    State(state): State<AppState>,
    Json(payload): Json<MusicSuggestionInput>,
) -> impl IntoResponse {
    respond(actions::suggest_audio_only_music(state.ai.as_deref(), &payload).await)
}

async fn compliance_handler(
    State(state): State<AppState>,
    Json(payload): Json<ComplianceInput>,
) -> impl IntoResponse {
    respond(actions::suggest_compliance(state.ai.as_deref(), &payload).await)
}

async fn summary_handler(
    State(state): State<AppState>,
    Json(payload): Json<IntelligenceInput>,
) -> impl IntoResponse {
    respond(actions::summarize_video(state.ai.as_deref(), &payload).await)
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(payload): Json<GeneratePlaylistInput>,
) -> impl IntoResponse {
    respond(handlers::generate_playlist(&state, payload).await)
}
