//! Browser command-line options.
//!
//! # Example
//!
//! ```ignore
//! use orangehrm_admin_e2e::BrowserOptions;
//!
//! let options = BrowserOptions::new()
//!     .with_headless()
//!     .with_window_size(1920, 1080);
//!
//! let args = options.to_args();
//! // ["--headless=new", "--window-size=1920,1080"]
//! ```

use crate::config::Settings;
use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Window size used when none is configured; the admin table needs a
/// desktop-width viewport to render the search panel inline.
pub const DEFAULT_WINDOW_SIZE: (u32, u32) = (1366, 900);

// ============================================================================
// BrowserOptions
// ============================================================================

/// Browser process configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserOptions {
    /// Run without a visible window.
    pub headless: bool,

    /// Window dimensions in pixels (width, height).
    pub window_size: Option<(u32, u32)>,

    /// Additional command-line arguments.
    pub extra_args: Vec<String>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserOptions {
    /// Creates options with a visible window of [`DEFAULT_WINDOW_SIZE`].
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headless: false,
            window_size: Some(DEFAULT_WINDOW_SIZE),
            extra_args: Vec::new(),
        }
    }

    /// Creates options from suite settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            headless: settings.headless,
            ..Self::new()
        }
    }

    /// Enables headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self) -> Self {
        self.headless = true;
        self
    }

    /// Sets window size in pixels.
    #[inline]
    #[must_use]
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Adds a custom command-line argument.
    #[inline]
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    /// Converts options to browser command-line arguments.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2 + self.extra_args.len());

        if self.headless {
            args.push("--headless=new".to_string());
        }

        if let Some((width, height)) = self.window_size {
            args.push(format!("--window-size={width},{height}"));
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero-sized window.
    pub fn validate(&self) -> Result<()> {
        if let Some((width, height)) = self.window_size
            && (width == 0 || height == 0)
        {
            return Err(Error::config(format!(
                "window size must be positive, got {width}x{height}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
