use eyre::Result;
use serde::Serialize;

use crate::VideoId;
use crate::player::PlaybackCue;
use crate::search::SearchResult;
use crate::thumbnail::Thumbnail;
use crate::timecode::format_short;

#[derive(Serialize)]
struct ResultsDoc<'a> {
    video_id: &'a VideoId,
    query: &'a str,
    results: Vec<ResultEntry<'a>>,
}

#[derive(Serialize)]
struct ResultEntry<'a> {
    #[serde(flatten)]
    result: &'a SearchResult,
    timestamp: String,
}

/// Render results as numbered lines: `  1. [1:05] text`
pub fn render_results_text(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No matching quotes.".to_string();
    }
    results
        .iter()
        .enumerate()
        .map(|(i, r)| format!("{:>3}. [{}] {}", i + 1, format_short(r.segment.start), r.segment.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_results_json(video_id: &VideoId, query: &str, results: &[SearchResult]) -> Result<String> {
    let doc = ResultsDoc {
        video_id,
        query,
        results: results
            .iter()
            .map(|result| ResultEntry {
                result,
                timestamp: format_short(result.segment.start),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn render_cue_text(cue: &PlaybackCue) -> String {
    format!(
        "Seek {} ({} - {})\n  player: {}\n  watch:  {}",
        cue.label(),
        cue.seek_start,
        cue.seek_end,
        cue.embed_url(),
        cue.watch_url()
    )
}

pub fn render_cue_json(cue: &PlaybackCue) -> Result<String> {
    let mut value = serde_json::to_value(cue)?;
    value["embed_url"] = serde_json::Value::String(cue.embed_url());
    value["watch_url"] = serde_json::Value::String(cue.watch_url());
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn render_thumbnails_text(thumbnails: &[Thumbnail]) -> String {
    thumbnails
        .iter()
        .map(|t| format!("{} ({}x{}): {}", t.label, t.width, t.height, t.url))
        .collect::<Vec<_>>()
        .join("\n")
}
