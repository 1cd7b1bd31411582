//! Backends that need no server.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use image::{ImageFormat, Rgb, RgbImage};
use percept::{
    ImageLoadError, ImageLoader, LoadedImage, SubmitError, SubmitResponse, Submitter,
};

const WIDTH: u32 = 48;
const HEIGHT: u32 = 64;

/// Serves a generated placeholder portrait for every URL.
///
/// The same URL always yields the same picture.
#[derive(Debug, Clone, Default)]
pub struct GeneratedImageLoader {
    latency: Duration,
}

impl GeneratedImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait this long before answering each load.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

/// A background and a foreground color derived from `url`.
fn palette(url: &str) -> (Rgb<u8>, Rgb<u8>) {
    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    let [r, g, b, fr, fg, fb, ..] = hasher.finish().to_le_bytes();
    (
        Rgb([r / 2, g / 2, b / 2]),
        Rgb([fr / 2 + 128, fg / 2 + 128, fb / 2 + 128]),
    )
}

fn portrait(url: &str) -> RgbImage {
    let (background, face) = palette(url);
    let (cx, cy) = (WIDTH as f32 / 2.0, HEIGHT as f32 * 0.4);
    RgbImage::from_fn(WIDTH, HEIGHT, |x, y| {
        let dx = (x as f32 - cx) / (WIDTH as f32 * 0.3);
        let dy = (y as f32 - cy) / (HEIGHT as f32 * 0.3);
        let head = dx * dx + dy * dy <= 1.0;
        let shoulders = y as f32 > HEIGHT as f32 * 0.75 && dx.abs() < 1.6;
        if head || shoulders { face } else { background }
    })
}

/// PNG bytes of `image`. An encoder failure means the image was never produced.
fn encode_png(url: &str, image: &RgbImage) -> Result<Vec<u8>, ImageLoadError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| ImageLoadError::transport(url, e))?;
    Ok(bytes)
}

impl ImageLoader for GeneratedImageLoader {
    fn load(&self, url: &str) -> Result<LoadedImage, ImageLoadError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let bytes = encode_png(url, &portrait(url))?;
        tracing::debug!(url, "generated image");

        Ok(LoadedImage {
            url: url.to_string(),
            bytes,
            width: WIDTH,
            height: HEIGHT,
        })
    }
}

/// Accepts every submission, logging it and keeping a copy.
#[derive(Debug, Default)]
pub struct LoggingSubmitter {
    next_step: Option<String>,
    received: Mutex<Vec<(String, String)>>,
}

impl LoggingSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every submission with this `next_step`.
    pub fn with_next_step(mut self, next_step: impl Into<String>) -> Self {
        self.next_step = Some(next_step.into());
        self
    }

    /// Every `(url, body)` received so far.
    pub fn received(&self) -> Vec<(String, String)> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Submitter for LoggingSubmitter {
    fn submit(&self, url: &str, body: &str) -> Result<SubmitResponse, SubmitError> {
        tracing::info!(url, bytes = body.len(), "submission received");
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_string(), body.to_string()));

        let reply = match &self.next_step {
            Some(next_step) => serde_json::json!({ "next_step": next_step }),
            None => serde_json::json!({}),
        };
        Ok(SubmitResponse::new(200, reply.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_images_decode() {
        let image = GeneratedImageLoader::new().load("/static/cfd/CFD-AF-001-N.jpg").unwrap();
        let decoded = image::load_from_memory(&image.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
    }

    #[test]
    fn encoder_failure_is_not_a_decode_error() {
        use image::error::{LimitError, LimitErrorKind};

        let encoded = encode_png("/a.jpg", &portrait("/a.jpg")).unwrap();
        assert!(encoded.starts_with(b"\x89PNG"));

        let failure = image::ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::InsufficientMemory,
        ));
        let err = ImageLoadError::transport("/a.jpg", failure);
        assert!(matches!(err, ImageLoadError::Transport { ref url, .. } if url == "/a.jpg"));
    }

    #[test]
    fn same_url_same_picture() {
        let loader = GeneratedImageLoader::new();
        let (a, b) = loader.load_pair("/a.jpg", "/a.jpg").unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_ne!(palette("/a.jpg"), palette("/b.jpg"));
    }

    #[test]
    fn submitter_replies_with_next_step() {
        let submitter = LoggingSubmitter::new().with_next_step("/survey/occupations/questions");
        let response = submitter.submit("/post-survey", "[]").unwrap();

        assert!(response.is_ok());
        assert_eq!(
            response.next_step().as_deref(),
            Some("/survey/occupations/questions")
        );
        assert_eq!(
            submitter.received(),
            [("/post-survey".to_string(), "[]".to_string())]
        );
    }
}
