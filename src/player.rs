use serde::Serialize;

use crate::VideoId;
use crate::timecode::{format_short, format_widget, whole_seconds};

/// Everything the playback widget needs to cue a video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackCue {
    pub identifier: VideoId,
    /// `HH:MM:SS`
    pub seek_start: String,
    /// `HH:MM:SS`
    pub seek_end: String,
    #[serde(skip)]
    start_secs: u64,
    #[serde(skip)]
    end_secs: u64,
}

impl PlaybackCue {
    pub fn new(identifier: VideoId, start: f64, end: f64) -> Self {
        let start_secs = whole_seconds(start);
        let end_secs = whole_seconds(end).max(start_secs);
        Self {
            identifier,
            seek_start: format_widget(start),
            seek_end: format_widget(end.max(start)),
            start_secs,
            end_secs,
        }
    }

    /// Open-ended cue for the preview player
    pub fn preview(identifier: VideoId, start: f64) -> Self {
        Self::new(identifier, start, start)
    }

    pub fn label(&self) -> String {
        format_short(self.start_secs as f64)
    }

    /// Embeddable player URL; the end bound is omitted when it does not extend past the start
    pub fn embed_url(&self) -> String {
        let mut url = format!("https://www.youtube.com/embed/{}?start={}", self.identifier, self.start_secs);
        if self.end_secs > self.start_secs {
            url.push_str(&format!("&end={}", self.end_secs));
        }
        url
    }

    /// Shareable link that opens the video at the cue
    pub fn watch_url(&self) -> String {
        format!("https://youtu.be/{}?t={}", self.identifier, self.start_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> VideoId {
        VideoId::parse("dQw4w9WgXcQ").unwrap()
    }

    #[test]
    fn test_cue_formatting() {
        let cue = PlaybackCue::new(id(), 65.0, 67.5);
        assert_eq!(cue.seek_start, "00:01:05");
        assert_eq!(cue.seek_end, "00:01:07");
        assert_eq!(cue.label(), "1:05");
        assert_eq!(cue.start_secs, 65);
    }

    #[test]
    fn test_urls() {
        let cue = PlaybackCue::new(id(), 65.0, 67.5);
        assert_eq!(cue.embed_url(), "https://www.youtube.com/embed/dQw4w9WgXcQ?start=65&end=67");
        assert_eq!(cue.watch_url(), "https://youtu.be/dQw4w9WgXcQ?t=65");
    }

    #[test]
    fn test_preview_cue() {
        let cue = PlaybackCue::preview(id(), 0.0);
        assert_eq!(cue.seek_start, "00:00:00");
        assert_eq!(cue.seek_end, "00:00:00");
        assert_eq!(cue.embed_url(), "https://www.youtube.com/embed/dQw4w9WgXcQ?start=0");
    }
}
