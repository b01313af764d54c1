//! W3C WebDriver backend built on `thirtyfour`.
//!
//! Talks to a running chromedriver (or any W3C-compliant endpoint). The
//! document load and network signals have no WebDriver command of their own,
//! so they are read through small scripts.
//!
//! # Example
//!
//! ```no_run
//! use orangehrm_admin_e2e::{BrowserOptions, WebDriverBrowser};
//!
//! # async fn example() -> orangehrm_admin_e2e::Result<()> {
//! let url = url::Url::parse("http://localhost:9515")?;
//! let browser = WebDriverBrowser::connect(&url, &BrowserOptions::new().with_headless()).await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;
use thirtyfour::{ChromiumLikeCapabilities, DesiredCapabilities, Key, WebDriver, WebElement};
use tracing::{debug, info};
use url::Url;

use crate::driver::{BrowserOptions, Launcher};
use crate::error::Result;

use super::{Browser, By, ReadyState};

// ============================================================================
// Constants
// ============================================================================

/// Script returning `document.readyState`.
const READY_STATE_SCRIPT: &str = "return document.readyState;";

/// Script returning the number of resource timing entries.
const RESOURCE_COUNT_SCRIPT: &str = "return performance.getEntriesByType('resource').length;";

// ============================================================================
// WebDriverBrowser
// ============================================================================

/// [`Browser`] implementation over a WebDriver session.
///
/// Cloning is cheap and shares the same session.
#[derive(Clone)]
pub struct WebDriverBrowser {
    driver: WebDriver,
}

impl fmt::Debug for WebDriverBrowser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDriverBrowser").finish_non_exhaustive()
    }
}

impl WebDriverBrowser {
    /// Opens a new Chrome session on the WebDriver endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WebDriver`](crate::Error::WebDriver) if the endpoint
    /// is unreachable or rejects the capabilities.
    pub async fn connect(webdriver_url: &Url, options: &BrowserOptions) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        for arg in options.to_args() {
            caps.add_arg(&arg)?;
        }

        debug!(url = %webdriver_url, headless = options.headless, "Opening WebDriver session");
        let driver = WebDriver::new(webdriver_url.as_str(), caps).await?;
        info!(url = %webdriver_url, "WebDriver session opened");

        Ok(Self { driver })
    }

    /// Wraps an existing `thirtyfour` session.
    #[inline]
    #[must_use]
    pub fn from_driver(driver: WebDriver) -> Self {
        Self { driver }
    }

    /// Returns the underlying `thirtyfour` session.
    #[inline]
    #[must_use]
    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }
}

/// Converts a crate selector to a `thirtyfour` selector.
fn to_webdriver_by(by: &By) -> thirtyfour::By {
    match by {
        By::Css(css) => thirtyfour::By::Css(css.clone()),
        By::XPath(xpath) => thirtyfour::By::XPath(xpath.clone()),
    }
}

// ============================================================================
// Browser Implementation
// ============================================================================

#[async_trait]
impl Browser for WebDriverBrowser {
    type Element = WebElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        debug!(url, "Navigating");
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn find_all(&self, by: &By) -> Result<Vec<WebElement>> {
        let elements = self.driver.find_all(to_webdriver_by(by)).await?;
        debug!(selector = %by, count = elements.len(), "Found elements");
        Ok(elements)
    }

    async fn find_all_within(&self, parent: &WebElement, by: &By) -> Result<Vec<WebElement>> {
        let elements = parent.find_all(to_webdriver_by(by)).await?;
        debug!(selector = %by, count = elements.len(), "Found descendant elements");
        Ok(elements)
    }

    async fn click(&self, element: &WebElement) -> Result<()> {
        element.click().await?;
        Ok(())
    }

    async fn fill(&self, element: &WebElement, text: &str) -> Result<()> {
        // Select-all + delete instead of clear(): framework-bound inputs only
        // observe key events.
        element.click().await?;
        element.send_keys(Key::Control + "a").await?;
        element.send_keys(Key::Backspace).await?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn text(&self, element: &WebElement) -> Result<String> {
        Ok(element.text().await?)
    }

    async fn is_visible(&self, element: &WebElement) -> Result<bool> {
        Ok(element.is_displayed().await?)
    }

    async fn is_enabled(&self, element: &WebElement) -> Result<bool> {
        Ok(element.is_enabled().await?)
    }

    async fn ready_state(&self) -> Result<ReadyState> {
        let ret = self.driver.execute(READY_STATE_SCRIPT, Vec::new()).await?;
        Ok(ReadyState::parse(ret.json().as_str().unwrap_or_default()))
    }

    async fn resource_count(&self) -> Result<u64> {
        let ret = self.driver.execute(RESOURCE_COUNT_SCRIPT, Vec::new()).await?;
        Ok(ret.json().as_u64().unwrap_or(0))
    }

    async fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(self.driver.screenshot_as_png().await?)
    }

    async fn quit(&self) -> Result<()> {
        debug!("Quitting WebDriver session");
        self.driver.clone().quit().await?;
        info!("WebDriver session closed");
        Ok(())
    }
}

// ============================================================================
// WebDriverLauncher
// ============================================================================

/// [`Launcher`] opening one fresh WebDriver session per call.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: Url,
    options: BrowserOptions,
}

impl WebDriverLauncher {
    /// Creates a launcher for the given endpoint and browser options.
    #[must_use]
    pub fn new(webdriver_url: Url, options: BrowserOptions) -> Self {
        Self {
            webdriver_url,
            options,
        }
    }

    /// Returns the WebDriver endpoint.
    #[inline]
    #[must_use]
    pub fn webdriver_url(&self) -> &Url {
        &self.webdriver_url
    }

    /// Returns the browser options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> &BrowserOptions {
        &self.options
    }
}

#[async_trait]
impl Launcher for WebDriverLauncher {
    type Browser = WebDriverBrowser;

    async fn launch(&self) -> Result<WebDriverBrowser> {
        WebDriverBrowser::connect(&self.webdriver_url, &self.options).await
    }
}

// ============================================================================
// Tests
// ============================================================================
