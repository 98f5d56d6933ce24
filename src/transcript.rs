use std::time::Duration;

use eyre::{Result, bail};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::Segment;

/// Default transcript service endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000/api/transcript";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown to the user whenever a transcript cannot be obtained
pub const UNAVAILABLE_NOTICE: &str = "No transcript is available for this video. \
The transcript service only works for videos that publish captions; try a different URL.";

/// Whether a transcript has been obtained for the current video
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Availability {
    #[default]
    NotRequested,
    Unavailable,
    Available(Vec<Segment>),
}

impl Availability {
    pub fn segments(&self) -> Option<&[Segment]> {
        match self {
            Availability::Available(segments) => Some(segments),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
struct TranscriptRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    transcript: Vec<Segment>,
}

/// Client for the external transcript service
#[derive(Debug, Clone)]
pub struct TranscriptClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TranscriptClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Fetch the transcript for a raw video URL.
    ///
    /// Every failure (transport, timeout, non-2xx, bad body, empty transcript)
    /// collapses into `Availability::Unavailable`.
    pub async fn fetch(&self, url: &str) -> Availability {
        match self.try_fetch(url).await {
            Ok(segments) => {
                debug!("Fetched {} segments for {url}", segments.len());
                Availability::Available(segments)
            }
            Err(e) => {
                warn!("Transcript unavailable for {url}: {e:#}");
                Availability::Unavailable
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<Segment>> {
        debug!("Requesting transcript from {} for {url}", self.endpoint);

        let resp: TranscriptResponse = self
            .client
            .post(&self.endpoint)
            .json(&TranscriptRequest { url })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let segments = keep_valid(resp.transcript);
        if segments.is_empty() {
            bail!("transcript service returned no segments");
        }
        Ok(segments)
    }
}

fn keep_valid(segments: Vec<Segment>) -> Vec<Segment> {
    segments
        .into_iter()
        .filter(|seg| {
            let valid = seg.is_valid();
            if !valid {
                debug!("Skipping malformed segment: {seg:?}");
            }
            valid
        })
        .collect()
}
