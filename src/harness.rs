//! Per-test lifecycle.
//!
//! [`Harness::run`] gives every test case its own browser, from launch to
//! release:
//!
//! 1. Launch a browser and wrap it in a [`Session`]
//! 2. Start the [`Recorder`] when video is enabled
//! 3. Open the base URL and run the test body
//! 4. On failure (error or panic) publish a screenshot, taken before release
//! 5. Stop the recorder and publish the video
//! 6. Close the session, on every path
//! 7. Publish a text log with the status and error
//!
//! Capture, publish and close failures are logged and never replace the
//! body's own error. A panic in the body is resumed once cleanup is done.

// ============================================================================
// Imports
// ============================================================================

use std::any::Any;
use std::panic::{AssertUnwindSafe, resume_unwind};
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::browser::{Browser, Recorder, WebDriverLauncher};
use crate::config::Settings;
use crate::driver::{Launcher, Session, SessionBuilder};
use crate::error::Result;
use crate::report::{ArtifactSink, Attachment, DirectorySink, Outcome};

// ============================================================================
// Constants
// ============================================================================

/// Default delay between video frames.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(500);

/// Attachment name of the end-state screenshot.
pub const SCREENSHOT_ATTACHMENT: &str = "Failure Screenshot";

/// Attachment name of the run video.
pub const VIDEO_ATTACHMENT: &str = "Video";

/// Attachment name of the text log.
pub const LOG_ATTACHMENT: &str = "Logs";

// ============================================================================
// Harness
// ============================================================================

/// Runs test bodies with a fresh session each and publishes diagnostics.
pub struct Harness<L: Launcher> {
    launcher: L,
    settings: Settings,
    sink: Arc<dyn ArtifactSink>,
    frame_interval: Duration,
}

impl Harness<WebDriverLauncher> {
    /// Creates a WebDriver harness writing artifacts to
    /// [`Settings::artifacts_dir`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`](crate::Error::Config) if the WebDriver
    /// configuration is invalid.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let launcher = SessionBuilder::from_settings(&settings).build_launcher()?;
        let sink = Arc::new(DirectorySink::new(&settings.artifacts_dir));
        Ok(Self::new(launcher, settings, sink))
    }
}

impl<L: Launcher> Harness<L> {
    /// Creates a harness from its parts.
    #[must_use]
    pub fn new(launcher: L, settings: Settings, sink: Arc<dyn ArtifactSink>) -> Self {
        Self {
            launcher,
            settings,
            sink,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }

    /// Sets the delay between video frames.
    #[must_use]
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    /// Returns the settings handed to test bodies.
    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs one test case.
    ///
    /// The body receives the session after the base URL has been opened.
    ///
    /// # Errors
    ///
    /// Returns the body's error unchanged, or the launch/navigation error if
    /// the body never ran.
    ///
    /// # Panics
    ///
    /// Re-raises a panic from the body after cleanup.
    pub async fn run<T, F>(&self, test: &str, body: F) -> Result<T>
    where
        F: for<'s> FnOnce(&'s Session<L::Browser>, &'s Settings) -> BoxFuture<'s, Result<T>>,
    {
        info!(test, "Starting test");
        let started = Instant::now();

        let browser = match self.launcher.launch().await {
            Ok(browser) => browser,
            Err(e) => {
                error!(test, error = %e, "Browser launch failed");
                self.publish_log(test, Outcome::Failed, started, Some(&e.to_string()));
                return Err(e);
            }
        };
        let session = Session::new(browser, self.settings.timeouts.clone());

        let recorder = self
            .settings
            .record_video
            .then(|| Recorder::start(session.browser_handle(), self.frame_interval));

        let settings = &self.settings;
        let session_ref = &session;
        let ran = AssertUnwindSafe(async move {
            session_ref.goto(settings.base_url.as_str()).await?;
            body(session_ref, settings).await
        })
        .catch_unwind()
        .await;

        let (outcome, failure) = match &ran {
            Ok(Ok(_)) => (Outcome::Passed, None),
            Ok(Err(e)) => (Outcome::Failed, Some(e.to_string())),
            Err(payload) => (Outcome::Failed, Some(panic_message(payload.as_ref()))),
        };

        if outcome == Outcome::Failed {
            self.capture_screenshot(test, &session).await;
        }
        if let Some(recorder) = recorder {
            self.publish_video(test, outcome, recorder).await;
        }
        if let Err(e) = session.close().await {
            error!(test, error = %e, "Failed to close session");
        }

        self.publish_log(test, outcome, started, failure.as_deref());
        info!(test, %outcome, "Test finished");

        match ran {
            Ok(result) => result,
            Err(payload) => resume_unwind(payload),
        }
    }
}

// ============================================================================
// Harness - Capture
// ============================================================================

impl<L: Launcher> Harness<L> {
    async fn capture_screenshot<B: Browser>(&self, test: &str, session: &Session<B>) {
        match session.screenshot().await {
            Ok(png) => {
                self.publish(test, Outcome::Failed, &Attachment::png(SCREENSHOT_ATTACHMENT, png));
                info!(test, "Failure screenshot captured");
            }
            Err(e) => error!(test, error = %e, "Failed to capture screenshot"),
        }
    }

    async fn publish_video(&self, test: &str, outcome: Outcome, recorder: Recorder) {
        match recorder.stop().await {
            Ok(Some(gif)) => {
                self.publish(test, outcome, &Attachment::gif(VIDEO_ATTACHMENT, gif));
                info!(test, "Video attached");
            }
            Ok(None) => warn!(test, "No video frames captured"),
            Err(e) => error!(test, error = %e, "Failed to encode video"),
        }
    }

    fn publish_log(&self, test: &str, outcome: Outcome, started: Instant, failure: Option<&str>) {
        let text = render_log(test, outcome, started.elapsed(), failure);
        self.publish(test, outcome, &Attachment::text(LOG_ATTACHMENT, text));
    }

    fn publish(&self, test: &str, outcome: Outcome, attachment: &Attachment) {
        if let Err(e) = self.sink.publish(test, outcome, attachment) {
            error!(test, attachment = %attachment.name, error = %e, "Failed to publish attachment");
        }
    }
}

/// Formats the text log attached to every test.
fn render_log(test: &str, outcome: Outcome, elapsed: Duration, failure: Option<&str>) -> String {
    let mut log = format!(
        "Test: {test}\nTest finished with status: {}\nDuration: {}ms\n",
        outcome.status(),
        elapsed.as_millis()
    );
    if let Some(failure) = failure {
        log.push_str("Error: ");
        log.push_str(failure);
        log.push('\n');
    }
    log
}

/// Best-effort text of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panic: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panic: {message}")
    } else {
        "panic: <non-string payload>".to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
