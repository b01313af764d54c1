//! Whole-run video capture.
//!
//! WebDriver has no screencast command, so the recorder samples screenshots
//! on a fixed interval from a background task and encodes them as an
//! animated GIF when stopped.
//!
//! # Example
//!
//! ```ignore
//! let recorder = Recorder::start(session.browser_handle(), Duration::from_millis(500));
//! // ... drive the page ...
//! if let Some(gif) = recorder.stop().await? {
//!     std::fs::write("run.gif", gif)?;
//! }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Delay, DynamicImage, Frame, ImageFormat};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::Browser;

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on captured frames; later samples are dropped.
pub const MAX_FRAMES: usize = 600;

/// Frames wider than this are downscaled before encoding.
pub const MAX_FRAME_WIDTH: u32 = 800;

// ============================================================================
// Recorder
// ============================================================================

/// Background screenshot sampler.
pub struct Recorder {
    stop: oneshot::Sender<()>,
    task: JoinHandle<Vec<Vec<u8>>>,
    frame_interval: Duration,
}

impl Recorder {
    /// Starts sampling the browser every `frame_interval`.
    ///
    /// The first frame is taken immediately.
    pub fn start<B>(browser: Arc<B>, frame_interval: Duration) -> Self
    where
        B: Browser + 'static,
    {
        let (stop, mut stopped) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut frames = Vec::new();
            let mut ticker = interval(frame_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        if frames.len() >= MAX_FRAMES {
                            continue;
                        }
                        match browser.screenshot().await {
                            Ok(png) => frames.push(png),
                            Err(e) => debug!(error = %e, "Skipping video frame"),
                        }
                    }
                }
            }

            frames
        });

        debug!(interval_ms = frame_interval.as_millis(), "Recorder started");
        Self {
            stop,
            task,
            frame_interval,
        }
    }

    /// Stops sampling and encodes the captured frames.
    ///
    /// Returns `None` when no frame was captured.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Capture`] if the sampling task panicked and
    /// [`Error::Image`] if a frame cannot be decoded or encoded.
    pub async fn stop(self) -> Result<Option<Vec<u8>>> {
        // The task may already have finished; a closed channel is fine.
        let _ = self.stop.send(());

        let frames = self
            .task
            .await
            .map_err(|e| Error::capture(format!("recorder task failed: {e}")))?;

        if frames.is_empty() {
            debug!("Recorder stopped without frames");
            return Ok(None);
        }

        let frame_count = frames.len();
        let delay = self.frame_interval;
        let gif = tokio::task::spawn_blocking(move || encode_gif(&frames, delay))
            .await
            .map_err(|e| Error::capture(format!("encoder task failed: {e}")))??;

        info!(frames = frame_count, bytes = gif.len(), "Video encoded");
        Ok(Some(gif))
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes PNG frames as an infinitely looping GIF.
pub fn encode_gif(frames: &[Vec<u8>], delay: Duration) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    {
        let mut encoder = GifEncoder::new(&mut out);
        encoder.set_repeat(Repeat::Infinite)?;

        for png in frames {
            let image = downscale(image::load_from_memory_with_format(png, ImageFormat::Png)?);
            let frame = Frame::from_parts(
                image.to_rgba8(),
                0,
                0,
                Delay::from_saturating_duration(delay),
            );
            encoder.encode_frame(frame)?;
        }
    }
    Ok(out)
}

/// Shrinks an image to [`MAX_FRAME_WIDTH`], keeping the aspect ratio.
fn downscale(image: DynamicImage) -> DynamicImage {
    if image.width() <= MAX_FRAME_WIDTH {
        return image;
    }

    let height = u64::from(image.height()) * u64::from(MAX_FRAME_WIDTH) / u64::from(image.width());
    let height = u32::try_from(height).unwrap_or(u32::MAX).max(1);
    image.resize_exact(MAX_FRAME_WIDTH, height, FilterType::Triangle)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use image::RgbaImage;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(RgbaImage::new(width, height))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_encode_gif_has_gif_header() {
        let gif = encode_gif(&[png(4, 4), png(4, 4)], Duration::from_millis(500)).unwrap();
        assert!(gif.starts_with(b"GIF89a"));
    }

    #[test]
    fn test_encode_gif_rejects_garbage() {
        let result = encode_gif(&[vec![1, 2, 3]], Duration::from_millis(500));
        assert!(matches!(result, Err(Error::Image(_))));
    }

    #[test]
    fn test_downscale_keeps_aspect_ratio() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(1600, 900));
        let scaled = downscale(image);
        assert_eq!(scaled.width(), MAX_FRAME_WIDTH);
        assert_eq!(scaled.height(), 450);
    }

    #[test]
    fn test_downscale_leaves_small_images() {
        let image = DynamicImage::ImageRgba8(RgbaImage::new(10, 10));
        assert_eq!(downscale(image).width(), 10);
    }
}
