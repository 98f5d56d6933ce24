pub mod config;
pub mod output;
pub mod player;
pub mod search;
pub mod session;
pub mod thumbnail;
pub mod timecode;
pub mod transcript;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Length of every YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

static VIDEO_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|\?v=|&v=)([^#&?]*).*").expect("video URL pattern is valid")
});

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Segment {
    /// Non-empty text, non-negative start, end not before start
    pub fn is_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.start >= 0.0 && self.end >= self.start
    }
}

/// Canonical 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accept a bare identifier
    pub fn parse(candidate: &str) -> Option<Self> {
        let valid = candidate.chars().count() == VIDEO_ID_LEN
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        valid.then(|| VideoId(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extract video ID from various YouTube URL formats
///
/// Recognizes `youtu.be/ID`, `/v/ID`, `/u/X/ID`, `/embed/ID`, `?v=ID` and `&v=ID`.
/// The candidate ends at the first `#`, `&` or `?`.
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();
    let caps = VIDEO_URL_RE.captures(input)?;
    VideoId::parse(caps.get(2)?.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Option<VideoId> {
        VideoId::parse(s)
    }

    #[test]
    fn test_short_url() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), id("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            id("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ#t=3"),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1"),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_v_and_user_urls() {
        assert_eq!(extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ"), id("dQw4w9WgXcQ"));
        assert_eq!(
            extract_video_id("https://www.youtube.com/u/1/dQw4w9WgXcQ"),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_url_with_query_noise() {
        assert_eq!(
            extract_video_id("  https://youtu.be/dQw4w9WgXcQ?si=abcdef  "),
            id("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXc"), None);
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQQ"), None);
    }

    #[test]
    fn test_bad_alphabet_rejected() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9 gXcQ"), None);
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(extract_video_id("https://example.com/notavideo"), None);
        assert_eq!(extract_video_id("not-a-valid-id"), None);
        assert_eq!(extract_video_id("youtube.com/watch"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("   "), None);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(extract_video_id("https://youtu.be/ünïcødé✓✓✓✓✓"), None);
    }

    #[test]
    fn test_segment_validity() {
        let ok = Segment {
            text: "hi".to_string(),
            start: 1.0,
            end: 1.0,
        };
        assert!(ok.is_valid());
        assert!(!Segment { text: " ".to_string(), ..ok.clone() }.is_valid());
        assert!(!Segment { start: -1.0, ..ok.clone() }.is_valid());
        assert!(!Segment { end: 0.5, ..ok }.is_valid());
    }
}
