use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use serde::Serialize;

use crate::VideoId;

/// Shown when saving a thumbnail fails
pub const DOWNLOAD_FAILED_NOTICE: &str = "Failed to download image. Please try again.";

/// The fixed resolution tiers YouTube publishes for every video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Default,
    Medium,
    High,
    Standard,
    Max,
}

impl Resolution {
    pub const ALL: [Resolution; 5] = [
        Resolution::Default,
        Resolution::Medium,
        Resolution::High,
        Resolution::Standard,
        Resolution::Max,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Resolution::Default => "Default",
            Resolution::Medium => "Medium Quality",
            Resolution::High => "High Quality",
            Resolution::Standard => "Standard Definition",
            Resolution::Max => "Maximum Resolution",
        }
    }

    pub fn size(&self) -> (u32, u32) {
        match self {
            Resolution::Default => (120, 90),
            Resolution::Medium => (320, 180),
            Resolution::High => (480, 360),
            Resolution::Standard => (640, 480),
            Resolution::Max => (1280, 720),
        }
    }

    fn file_name(&self) -> &'static str {
        match self {
            Resolution::Default => "default.jpg",
            Resolution::Medium => "mqdefault.jpg",
            Resolution::High => "hqdefault.jpg",
            Resolution::Standard => "sddefault.jpg",
            Resolution::Max => "maxresdefault.jpg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnail {
    pub resolution: Resolution,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub url: String,
}

impl Thumbnail {
    /// `thumbnail_<label>.jpg` with the label reduced to `[a-z0-9_]`
    pub fn download_name(&self) -> String {
        let safe = self
            .label
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect::<String>();
        format!("thumbnail_{safe}.jpg")
    }
}

/// Thumbnail URLs for every tier; existence is not checked
pub fn thumbnails(id: &VideoId) -> Vec<Thumbnail> {
    Resolution::ALL
        .iter()
        .map(|&resolution| {
            let (width, height) = resolution.size();
            Thumbnail {
                resolution,
                label: resolution.label(),
                width,
                height,
                url: format!("https://img.youtube.com/vi/{id}/{}", resolution.file_name()),
            }
        })
        .collect()
}

/// Save one thumbnail into `dir`
pub async fn download(client: &reqwest::Client, thumbnail: &Thumbnail, dir: &Path) -> Result<PathBuf> {
    debug!("Downloading thumbnail: {}", thumbnail.url);
    let bytes = client
        .get(&thumbnail.url)
        .send()
        .await?
        .error_for_status()?
        .bytes()
        .await?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(thumbnail.download_name());
    std::fs::write(&path, &bytes)?;
    debug!("Saved thumbnail: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answer one GET with a canned response; returns the base URL
    async fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let head = format!(
                "HTTP/1.1 {status}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{addr}")
    }

    fn local_thumbnail(base: &str) -> Thumbnail {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let mut thumb = thumbnails(&id).remove(2);
        thumb.url = format!("{base}/vi/dQw4w9WgXcQ/hqdefault.jpg");
        thumb
    }

    #[tokio::test]
    async fn test_download_saves_file() {
        let base = serve_once("200 OK", b"\xff\xd8jpeg-bytes").await;
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("thumbs");

        let path = download(&reqwest::Client::new(), &local_thumbnail(&base), &target)
            .await
            .unwrap();
        assert_eq!(path, target.join("thumbnail_high_quality.jpg"));
        assert_eq!(std::fs::read(&path).unwrap(), b"\xff\xd8jpeg-bytes");
    }

    #[tokio::test]
    async fn test_download_missing_image_fails_without_writing() {
        let base = serve_once("404 Not Found", b"").await;
        let dir = tempfile::tempdir().unwrap();

        let result = download(&reqwest::Client::new(), &local_thumbnail(&base), dir.path()).await;
        assert!(result.is_err());
        assert!(!dir.path().join("thumbnail_high_quality.jpg").exists());
    }

    #[test]
    fn test_thumbnail_urls() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let thumbs = thumbnails(&id);
        assert_eq!(thumbs.len(), 5);
        assert_eq!(thumbs[0].url, "https://img.youtube.com/vi/dQw4w9WgXcQ/default.jpg");
        assert_eq!(thumbs[4].url, "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg");
        assert_eq!((thumbs[4].width, thumbs[4].height), (1280, 720));
    }

    #[test]
    fn test_download_name() {
        let id = VideoId::parse("dQw4w9WgXcQ").unwrap();
        let thumbs = thumbnails(&id);
        assert_eq!(thumbs[1].download_name(), "thumbnail_medium_quality.jpg");
        assert_eq!(thumbs[0].download_name(), "thumbnail_default.jpg");
    }
}
