//! Playlist state: the ordered video list, the current pointer and the
//! multi-select state used by edit mode.
//!
//! The video list is the single source of truth and is written to the
//! backing [`KeyValueStore`] before any mutation becomes visible. The
//! current pointer is derived state and is recomputed after every change.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{PlaylistError, Result};
use crate::storage::KeyValueStore;
use crate::video::Video;

/// Storage key used when none is configured
pub const DEFAULT_PLAYLIST_KEY: &str = "playlist";

/// Outcome of adding a single video
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added { id: String },
    /// Same platform and video id already present; nothing changed
    Duplicate { existing_id: String },
}

impl AddOutcome {
    pub fn is_added(&self) -> bool {
        matches!(self, AddOutcome::Added { .. })
    }
}

/// What a click on a playlist entry did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Normal mode: the entry became the current video
    Playing,
    /// Edit mode: the entry's checkbox flipped
    Toggled { selected: bool },
}

/// Edit mode flag plus the ids ticked for bulk deletion
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    pub edit_mode: bool,
    pub selected: BTreeSet<String>,
}

/// Serializable view of the whole playlist state
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSnapshot {
    pub videos: Vec<Video>,
    pub current_id: Option<String>,
    pub edit_mode: bool,
    pub selected: Vec<String>,
}

/// The persisted playlist
#[derive(Debug)]
pub struct PlaylistStore<S: KeyValueStore> {
    store: S,
    key: String,
    videos: Vec<Video>,
    current: Option<String>,
    selection: SelectionState,
}

impl<S: KeyValueStore> PlaylistStore<S> {
    /// Load the playlist stored under `key`.
    ///
    /// A missing key, undecodable bytes or unreadable JSON starts an empty
    /// playlist. Individual malformed entries are skipped.
    pub async fn open(store: S, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let raw = match store.get(&key).await {
            Ok(raw) => raw,
            Err(PlaylistError::Storage(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                warn!(
                    "Stored playlist under '{}' is not valid text, starting empty: {}",
                    key, e
                );
                None
            }
            Err(e) => return Err(e),
        };
        let videos = match raw {
            Some(raw) => match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
                Ok(entries) => unique_by_id(decode_entries(&key, entries)),
                Err(e) => {
                    warn!(
                        "Stored playlist under '{}' is unreadable, starting empty: {}",
                        key, e
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        info!("📼 Loaded playlist '{}' with {} videos", key, videos.len());

        let mut playlist = Self {
            store,
            key,
            videos,
            current: None,
            selection: SelectionState::default(),
        };
        playlist.reconcile_current();
        Ok(playlist)
    }

    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Video> {
        self.videos.iter().find(|v| v.id == id)
    }

    pub fn current(&self) -> Option<&Video> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn is_edit_mode(&self) -> bool {
        self.selection.edit_mode
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn snapshot(&self) -> PlaylistSnapshot {
        PlaylistSnapshot {
            videos: self.videos.clone(),
            current_id: self.current.clone(),
            edit_mode: self.selection.edit_mode,
            selected: self.selection.selected.iter().cloned().collect(),
        }
    }

    /// Append a video unless the same media is already in the playlist
    pub async fn add(&mut self, mut video: Video) -> Result<AddOutcome> {
        if let Some(existing) = self.videos.iter().find(|v| v.is_same_media(&video)) {
            debug!(
                "Skipping duplicate {}:{} (already {})",
                video.platform, video.video_id, existing.id
            );
            return Ok(AddOutcome::Duplicate {
                existing_id: existing.id.clone(),
            });
        }

        if self.get(&video.id).is_some() {
            video.id = Uuid::new_v4().to_string();
        }

        let id = video.id.clone();
        let title = video.title.clone();
        let mut videos = self.videos.clone();
        videos.push(video);
        self.commit(videos).await?;

        info!("➕ Added '{}' to playlist", title);
        Ok(AddOutcome::Added { id })
    }

    /// Append several videos, skipping any already present (in the playlist
    /// or earlier in the batch). Returns how many were inserted.
    pub async fn add_many(&mut self, batch: Vec<Video>) -> Result<usize> {
        let mut seen: HashSet<_> = self
            .videos
            .iter()
            .map(|v| (v.platform, v.video_id.clone()))
            .collect();
        let mut ids: HashSet<String> = self.videos.iter().map(|v| v.id.clone()).collect();

        let mut videos = self.videos.clone();
        let mut added = 0;
        for mut video in batch {
            if !seen.insert((video.platform, video.video_id.clone())) {
                continue;
            }
            if !ids.insert(video.id.clone()) {
                video.id = Uuid::new_v4().to_string();
                ids.insert(video.id.clone());
            }
            videos.push(video);
            added += 1;
        }

        if added > 0 {
            self.commit(videos).await?;
            info!("➕ Added {} videos to playlist", added);
        }
        Ok(added)
    }

    /// Remove one video by id. Returns false if it was not in the playlist.
    pub async fn remove(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Ok(false);
        }

        let videos = self.videos.iter().filter(|v| v.id != id).cloned().collect();
        self.commit(videos).await?;

        info!("➖ Removed {} from playlist", id);
        Ok(true)
    }

    /// Empty the playlist and its persisted copy
    pub async fn clear(&mut self) -> Result<()> {
        self.store.remove(&self.key).await?;
        self.videos.clear();
        self.current = None;
        self.selection = SelectionState::default();

        info!("🧹 Playlist cleared");
        Ok(())
    }

    /// Handle a click on a playlist entry: plays it in normal mode, toggles
    /// its checkbox in edit mode.
    pub fn select(&mut self, id: &str) -> Result<SelectOutcome> {
        if self.selection.edit_mode {
            let selected = self.toggle_selection(id)?;
            return Ok(SelectOutcome::Toggled { selected });
        }

        if self.get(id).is_none() {
            return Err(PlaylistError::NotFound(id.to_string()));
        }
        self.current = Some(id.to_string());
        debug!("▶️ Current video is now {}", id);
        Ok(SelectOutcome::Playing)
    }

    /// Flip the bulk-delete mark on a video. Returns the new state.
    pub fn toggle_selection(&mut self, id: &str) -> Result<bool> {
        if self.get(id).is_none() {
            return Err(PlaylistError::NotFound(id.to_string()));
        }

        if self.selection.selected.remove(id) {
            Ok(false)
        } else {
            self.selection.selected.insert(id.to_string());
            Ok(true)
        }
    }

    /// Enter or leave edit mode. Leaving drops the selection.
    pub fn set_edit_mode(&mut self, editing: bool) -> Result<()> {
        if editing && self.videos.is_empty() {
            return Err(PlaylistError::InvalidInput(
                "cannot edit an empty playlist".to_string(),
            ));
        }
        self.selection.edit_mode = editing;
        if !editing {
            self.selection.selected.clear();
        }
        Ok(())
    }

    /// Remove every selected video, then clear the selection and leave edit
    /// mode. Returns the number of videos removed.
    pub async fn delete_selected(&mut self) -> Result<usize> {
        let before = self.videos.len();
        let videos: Vec<Video> = self
            .videos
            .iter()
            .filter(|v| !self.selection.selected.contains(&v.id))
            .cloned()
            .collect();
        let removed = before - videos.len();

        if removed > 0 {
            self.commit(videos).await?;
        }
        self.selection = SelectionState::default();

        info!("🗑️ Removed {} selected videos", removed);
        Ok(removed)
    }

    /// Recompute the current pointer: keep it while it still points into the
    /// list, otherwise fall back to the first video or none.
    pub fn reconcile_current(&mut self) {
        let still_present = self
            .current
            .as_deref()
            .map_or(false, |id| self.videos.iter().any(|v| v.id == id));

        if !still_present {
            self.current = self.videos.first().map(|v| v.id.clone());
        }

        let videos = &self.videos;
        self.selection
            .selected
            .retain(|id| videos.iter().any(|v| &v.id == id));
    }

    /// Persist `videos`, then make them the live list
    async fn commit(&mut self, videos: Vec<Video>) -> Result<()> {
        let json = serde_json::to_string(&videos)?;
        self.store.set(&self.key, &json).await?;
        self.videos = videos;
        self.reconcile_current();
        Ok(())
    }
}

fn decode_entries(key: &str, entries: Vec<serde_json::Value>) -> Vec<Video> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Video>(entry) {
            Ok(video) => Some(video),
            Err(e) => {
                warn!("Skipping stored entry {} under '{}': {}", index, key, e);
                None
            }
        })
        .collect()
}

fn unique_by_id(videos: Vec<Video>) -> Vec<Video> {
    let mut seen = HashSet::new();
    let total = videos.len();
    let unique: Vec<Video> = videos
        .into_iter()
        .filter(|v| seen.insert(v.id.clone()))
        .collect();
    if unique.len() != total {
        warn!("Dropped {} stored videos with repeated ids", total - unique.len());
    }
    unique
}
