//! Session construction.
//!
//! [`Launcher`] is the seam between the harness and a concrete backend: it
//! creates one fresh browser per call. [`SessionBuilder`] validates a
//! WebDriver configuration and opens a [`Session`] over it.
//!
//! # Example
//!
//! ```no_run
//! use orangehrm_admin_e2e::SessionBuilder;
//!
//! # async fn example() -> orangehrm_admin_e2e::Result<()> {
//! let session = SessionBuilder::new()
//!     .webdriver_url("http://localhost:9515")
//!     .headless()
//!     .launch()
//!     .await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use async_trait::async_trait;
use url::Url;

use crate::browser::{Browser, WebDriverBrowser, WebDriverLauncher};
use crate::config::{DEFAULT_WEBDRIVER_URL, Settings, Timeouts};
use crate::error::{Error, Result};

use super::core::Session;
use super::options::BrowserOptions;

// ============================================================================
// Launcher
// ============================================================================

/// Creates a fresh browser for each test case.
#[async_trait]
pub trait Launcher: Send + Sync {
    /// The backend this launcher produces.
    type Browser: Browser + 'static;

    /// Launches a new browser.
    async fn launch(&self) -> Result<Self::Browser>;
}

// ============================================================================
// SessionBuilder
// ============================================================================

/// Builder for a WebDriver-backed [`Session`].
#[derive(Debug, Default, Clone)]
pub struct SessionBuilder {
    /// WebDriver endpoint.
    webdriver_url: Option<String>,
    /// Browser options.
    options: BrowserOptions,
    /// Wait bounds.
    timeouts: Timeouts,
}

impl SessionBuilder {
    /// Creates a builder with default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from suite settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            webdriver_url: Some(settings.webdriver_url.to_string()),
            options: BrowserOptions::from_settings(settings),
            timeouts: settings.timeouts.clone(),
        }
    }

    /// Sets the WebDriver endpoint.
    #[inline]
    #[must_use]
    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn headless(mut self) -> Self {
        self.options = self.options.with_headless();
        self
    }

    /// Replaces the browser options.
    #[inline]
    #[must_use]
    pub fn options(mut self, options: BrowserOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the wait bounds.
    #[inline]
    #[must_use]
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Validates the configuration and returns a reusable launcher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint is not a valid URL or the
    /// options are invalid.
    pub fn build_launcher(&self) -> Result<WebDriverLauncher> {
        let url = self.validate_url()?;
        self.options.validate()?;
        Ok(WebDriverLauncher::new(url, self.options.clone()))
    }

    /// Opens a browser and wraps it in a session.
    ///
    /// # Errors
    ///
    /// See [`SessionBuilder::build_launcher`]; also propagates WebDriver
    /// connection errors.
    pub async fn launch(self) -> Result<Session<WebDriverBrowser>> {
        let launcher = self.build_launcher()?;
        let browser = launcher.launch().await?;
        Ok(Session::new(browser, self.timeouts))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl SessionBuilder {
    fn validate_url(&self) -> Result<Url> {
        let raw = self.webdriver_url.as_deref().unwrap_or(DEFAULT_WEBDRIVER_URL);
        let url = Url::parse(raw)
            .map_err(|e| Error::config(format!("invalid WebDriver URL '{raw}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "WebDriver URL must be http or https, got '{raw}'"
            )));
        }
        Ok(url)
    }
}

// ============================================================================
// Tests
// ============================================================================
