//! Quote search session state machine.
//!
//! A `Session` owns the single `SessionState` for one search flow. Network I/O
//! happens outside: `set_url` hands back a `FetchRequest`, the caller runs the
//! fetch, and `apply_fetch` folds the result back in only if the request's
//! identifier is still the active one.

use log::{debug, info};
use serde::Serialize;

use crate::player::PlaybackCue;
use crate::search::{DEFAULT_THRESHOLD, SearchIndex, SearchResult};
use crate::transcript::Availability;
use crate::{Segment, VideoId, extract_video_id};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::Ready => write!(f, "ready"),
            Phase::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub identifier: Option<VideoId>,
    pub availability: Availability,
    pub query: String,
    pub results: Vec<SearchResult>,
    pub selected_seek_time: f64,
}

/// A transcript fetch the caller must perform
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub identifier: VideoId,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Transcript loaded and indexed
    Ready,
    /// Nothing usable came back; surface the unavailable notice
    Failed,
    /// Result belonged to a superseded identifier or was already applied
    Discarded,
}

#[derive(Debug)]
pub struct Session {
    state: SessionState,
    index: Option<SearchIndex>,
    threshold: f64,
    limit: Option<usize>,
    preview: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD, None)
    }
}

impl Session {
    pub fn new(threshold: f64, limit: Option<usize>) -> Self {
        Self {
            state: SessionState::default(),
            index: None,
            threshold,
            limit,
            preview: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identifier(&self) -> Option<&VideoId> {
        self.state.identifier.as_ref()
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.state.results
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        self.state.availability.segments()
    }

    pub fn phase(&self) -> Phase {
        match (&self.state.identifier, &self.state.availability) {
            (None, _) => Phase::Idle,
            (Some(_), Availability::NotRequested) => Phase::Loading,
            (Some(_), Availability::Available(_)) => Phase::Ready,
            (Some(_), Availability::Unavailable) => Phase::Failed,
        }
    }

    /// Search controls are only live once a transcript is indexed
    pub fn can_search(&self) -> bool {
        self.phase() == Phase::Ready && self.index.is_some()
    }

    pub fn preview_visible(&self) -> bool {
        self.preview && self.state.identifier.is_some()
    }

    /// React to new URL input. Returns the fetch to run when the identifier changed.
    pub fn set_url(&mut self, url: &str) -> Option<FetchRequest> {
        let Some(identifier) = extract_video_id(url) else {
            if self.state.identifier.is_some() {
                debug!("URL no longer names a video; returning to idle");
            }
            self.state = SessionState::default();
            self.index = None;
            self.preview = false;
            return None;
        };

        if self.state.identifier.as_ref() == Some(&identifier) {
            debug!("Identifier {identifier} unchanged; keeping current transcript");
            return None;
        }

        info!("Switching to video {identifier}");
        self.state.identifier = Some(identifier.clone());
        self.state.availability = Availability::NotRequested;
        self.state.query.clear();
        self.state.results.clear();
        self.state.selected_seek_time = 0.0;
        self.index = None;

        Some(FetchRequest {
            identifier,
            url: url.trim().to_string(),
        })
    }

    /// Apply a completed fetch if it still belongs to the active identifier
    pub fn apply_fetch(&mut self, identifier: &VideoId, availability: Availability) -> FetchOutcome {
        if self.state.identifier.as_ref() != Some(identifier) {
            debug!("Discarding stale transcript for {identifier}");
            return FetchOutcome::Discarded;
        }
        if self.state.availability != Availability::NotRequested {
            debug!("Transcript for {identifier} already resolved; discarding");
            return FetchOutcome::Discarded;
        }

        match availability {
            Availability::Available(segments) if !segments.is_empty() => {
                let index = SearchIndex::build(&segments, self.threshold).with_limit(self.limit);
                info!("Transcript ready for {identifier}: {} segments", segments.len());
                self.index = Some(index);
                self.state.availability = Availability::Available(segments);
                FetchOutcome::Ready
            }
            _ => {
                info!("Transcript unavailable for {identifier}");
                self.index = None;
                self.state.availability = Availability::Unavailable;
                FetchOutcome::Failed
            }
        }
    }

    /// Run a query. Returns `None` (and changes nothing) unless the session is ready.
    pub fn submit_query(&mut self, query: &str) -> Option<&[SearchResult]> {
        if !self.can_search() {
            debug!("Ignoring query while {}", self.phase());
            return None;
        }
        let index = self.index.as_ref()?;
        self.state.results = index.search(query);
        self.state.query = query.to_string();
        Some(&self.state.results)
    }

    /// Pick the `position`-th result (0-based) and cue playback at its start
    pub fn select_result(&mut self, position: usize) -> Option<PlaybackCue> {
        let identifier = self.state.identifier.clone()?;
        let segment = &self.state.results.get(position)?.segment;
        let cue = PlaybackCue::new(identifier, segment.start, segment.end);
        self.state.selected_seek_time = segment.start;
        Some(cue)
    }

    /// Show the player; requires an identifier. Returns a cue at the selected seek time.
    pub fn show_preview(&mut self) -> Option<PlaybackCue> {
        let identifier = self.state.identifier.clone()?;
        self.preview = true;
        Some(PlaybackCue::preview(identifier, self.state.selected_seek_time))
    }

    pub fn hide_preview(&mut self) {
        self.preview = false;
    }
}
