//! API request handlers

use serde_json::Value;

use super::models::{
    AddVideoRequest, AddVideoResponse, BulkAddResponse, GeneratedPlaylistResponse, SelectResponse,
};
use super::server::AppState;
use crate::error::{PlaylistError, Result};
use crate::flows::{actions, GeneratePlaylistInput};
use crate::player::{render_empty_html, PlayerView};
use crate::playlist::{AddOutcome, PlaylistSnapshot, SelectOutcome};
use crate::search::SearchResult;
use crate::video::Video;

/// Handle health check requests
pub async fn health_check(state: &AppState) -> Result<Value> {
    let videos = state.playlist.read().await.len();
    let ai_available = match &state.ai {
        Some(ai) => ai.is_available().await,
        None => false,
    };
    Ok(serde_json::json!({
        "status": "healthy",
        "service": "streamverse",
        "version": env!("CARGO_PKG_VERSION"),
        "videos": videos,
        "search_enabled": state.config.search.api_key.is_some(),
        "ai_available": ai_available,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn get_playlist(state: &AppState) -> Result<PlaylistSnapshot> {
    Ok(state.playlist.read().await.snapshot())
}

fn add_response(outcome: AddOutcome) -> AddVideoResponse {
    match outcome {
        AddOutcome::Added { id } => AddVideoResponse { added: true, id },
        AddOutcome::Duplicate { existing_id } => AddVideoResponse {
            added: false,
            id: existing_id,
        },
    }
}

pub async fn add_video(state: &AppState, request: AddVideoRequest) -> Result<AddVideoResponse> {
    let video = Video::from_url(
        &request.url,
        &request.title,
        request.description.as_deref(),
        request.tags.as_deref(),
    )?;
    let outcome = state.playlist.write().await.add(video).await?;
    Ok(add_response(outcome))
}

pub async fn add_videos(state: &AppState, videos: Vec<Video>) -> Result<BulkAddResponse> {
    let added = state.playlist.write().await.add_many(videos).await?;
    Ok(BulkAddResponse { added })
}

pub async fn remove_video(state: &AppState, id: &str) -> Result<PlaylistSnapshot> {
    let mut playlist = state.playlist.write().await;
    if !playlist.remove(id).await? {
        return Err(PlaylistError::NotFound(id.to_string()));
    }
    Ok(playlist.snapshot())
}

pub async fn clear_playlist(state: &AppState) -> Result<PlaylistSnapshot> {
    let mut playlist = state.playlist.write().await;
    playlist.clear().await?;
    Ok(playlist.snapshot())
}

pub async fn select_video(state: &AppState, id: &str) -> Result<SelectResponse> {
    let outcome = state.playlist.write().await.select(id)?;
    Ok(match outcome {
        SelectOutcome::Playing => SelectResponse {
            action: "playing".to_string(),
            selected: None,
        },
        SelectOutcome::Toggled { selected } => SelectResponse {
            action: "toggled".to_string(),
            selected: Some(selected),
        },
    })
}

pub async fn set_edit_mode(state: &AppState, enabled: bool) -> Result<PlaylistSnapshot> {
    let mut playlist = state.playlist.write().await;
    playlist.set_edit_mode(enabled)?;
    Ok(playlist.snapshot())
}

pub async fn toggle_selection(state: &AppState, id: &str) -> Result<bool> {
    state.playlist.write().await.toggle_selection(id)
}

pub async fn delete_selected(state: &AppState) -> Result<usize> {
    state.playlist.write().await.delete_selected().await
}

/// Render the player for the current video, or the empty-state page
pub async fn player_html(state: &AppState, audio_only: bool) -> String {
    let playlist = state.playlist.read().await;
    match playlist.current() {
        Some(video) => PlayerView::new(video, audio_only).render_html(),
        None => render_empty_html(),
    }
}

pub async fn search(
    state: &AppState,
    query: &str,
    max_results: Option<u32>,
) -> Result<Vec<SearchResult>> {
    let max_results = max_results.unwrap_or_else(|| state.search.default_max_results());
    state.search.search(query, max_results).await
}

pub async fn add_search_result(state: &AppState, result: SearchResult) -> Result<AddVideoResponse> {
    let outcome = state.playlist.write().await.add(result.into_video()).await?;
    Ok(add_response(outcome))
}

/// Generate a playlist and merge it into the stored one
pub async fn generate_playlist(
    state: &AppState,
    input: GeneratePlaylistInput,
) -> Result<GeneratedPlaylistResponse> {
    let generated = actions::generate_playlist(state.ai.as_deref(), &input).await?;
    let added = state
        .playlist
        .write()
        .await
        .add_many(generated.videos.clone())
        .await?;
    Ok(GeneratedPlaylistResponse {
        videos: generated.videos,
        added,
    })
}
