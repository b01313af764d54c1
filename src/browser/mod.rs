//! Browser backend abstraction.
//!
//! Page objects never talk to a concrete automation library. They go through
//! the [`Browser`] trait, which is the whole surface the suite needs from a
//! driver session:
//!
//! | Primitive | Purpose |
//! |-----------|---------|
//! | [`Browser::navigate`] | Load a URL |
//! | [`Browser::find_all`] / [`Browser::find_all_within`] | Evaluate a selector |
//! | [`Browser::click`] / [`Browser::fill`] / [`Browser::text`] | Interact |
//! | [`Browser::is_visible`] / [`Browser::is_enabled`] | Element state for waits |
//! | [`Browser::ready_state`] / [`Browser::resource_count`] | Load and network-idle signals |
//! | [`Browser::screenshot`] | PNG capture |
//! | [`Browser::quit`] | Release the session |
//!
//! [`WebDriverBrowser`] implements it over W3C WebDriver.

// ============================================================================
// Submodules
// ============================================================================

/// Periodic screenshot recording encoded as an animated GIF.
pub mod recorder;

/// Selector expressions.
pub mod selector;

/// W3C WebDriver backend.
pub mod webdriver;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;

// ============================================================================
// Re-exports
// ============================================================================

pub use recorder::Recorder;
pub use selector::{By, xpath_literal};
pub use webdriver::{WebDriverBrowser, WebDriverLauncher};

// ============================================================================
// ReadyState
// ============================================================================

/// Document load state as reported by `document.readyState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// The document is still loading.
    #[default]
    Loading,
    /// The document is parsed; sub-resources may still be loading.
    Interactive,
    /// The load event has fired.
    Complete,
}

impl ReadyState {
    /// Parses the `document.readyState` string.
    ///
    /// Unknown values are treated as still loading.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "complete" => Self::Complete,
            "interactive" => Self::Interactive,
            _ => Self::Loading,
        }
    }

    /// Returns `true` once the load event has fired.
    #[inline]
    #[must_use]
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Browser Trait
// ============================================================================

/// A driver session: one browser context with one navigable document.
///
/// Implementations must be shareable across tasks so a [`Recorder`] can
/// capture frames while the test drives the page.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Handle to an element in the live document.
    type Element: Clone + Send + Sync;

    /// Navigates to a URL.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Returns every element matching the selector, in document order.
    async fn find_all(&self, by: &By) -> Result<Vec<Self::Element>>;

    /// Returns every descendant of `parent` matching the selector.
    async fn find_all_within(&self, parent: &Self::Element, by: &By)
    -> Result<Vec<Self::Element>>;

    /// Clicks an element.
    async fn click(&self, element: &Self::Element) -> Result<()>;

    /// Replaces the value of an input element with `text`.
    async fn fill(&self, element: &Self::Element, text: &str) -> Result<()>;

    /// Returns the rendered text of an element.
    async fn text(&self, element: &Self::Element) -> Result<String>;

    /// Returns `true` if the element is rendered and visible.
    async fn is_visible(&self, element: &Self::Element) -> Result<bool>;

    /// Returns `true` if the element accepts interaction.
    async fn is_enabled(&self, element: &Self::Element) -> Result<bool>;

    /// Returns the document load state.
    async fn ready_state(&self) -> Result<ReadyState>;

    /// Returns how many network resources the document has fetched so far.
    async fn resource_count(&self) -> Result<u64>;

    /// Captures the viewport as PNG bytes.
    async fn screenshot(&self) -> Result<Vec<u8>>;

    /// Ends the session and releases the browser.
    async fn quit(&self) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
