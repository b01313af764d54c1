//! Error types for the admin end-to-end suite.
//!
//! Every page-object operation returns [`Result<T>`] which uses [`Error`].
//! Wait failures always mean "not observed in time", never "confirmed
//! absent": a slow system under test may still complete after the suite
//! gives up.
//!
//! # Usage
//!
//! ```ignore
//! use orangehrm_admin_e2e::{Error, Result};
//!
//! async fn example(admin: &AdminPage<'_, B>) -> Result<()> {
//!     match admin.delete_user_and_get_count("test.user4821").await {
//!         Err(Error::UserNotFound { .. }) => Ok(()),
//!         other => other.map(|_| ()),
//!     }
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Element | [`Error::ElementNotFound`], [`Error::AmbiguousMatch`], [`Error::OptionNotFound`] |
//! | Wait | [`Error::NavigationTimeout`], [`Error::FormNotReady`], [`Error::LabelNotVisible`], [`Error::NoSuggestions`], [`Error::SaveNotConfirmed`], [`Error::Timeout`] |
//! | Domain | [`Error::UserNotFound`], [`Error::UnparsableCount`], [`Error::EmptyCountLabel`], [`Error::CountMismatch`] |
//! | Configuration | [`Error::Config`] |
//! | Artifacts | [`Error::Capture`] |
//! | External | [`Error::WebDriver`], [`Error::Io`], [`Error::Toml`], [`Error::Url`], [`Error::Image`] |

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error;
use thirtyfour::error::WebDriverError;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Element Errors
    // ========================================================================
    /// A required locator matched zero elements.
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Description of the locator used.
        locator: String,
    },

    /// An exactly-one locator matched several elements.
    #[error("Ambiguous match: {locator} matched {count} elements")]
    AmbiguousMatch {
        /// Description of the locator used.
        locator: String,
        /// Number of elements matched.
        count: usize,
    },

    /// A dropdown had no option matching the requested text.
    #[error("Option not found: '{option}'")]
    OptionNotFound {
        /// The requested option text.
        option: String,
    },

    // ========================================================================
    // Wait Errors
    // ========================================================================
    /// Navigation did not settle in time.
    #[error("Navigation timeout after {timeout_ms}ms: {operation}")]
    NavigationTimeout {
        /// The navigation being waited for.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The add-user form did not become interactable in time.
    #[error("Form not ready after {timeout_ms}ms")]
    FormNotReady {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The record-count label did not become visible in time.
    #[error("Record count label not visible after {timeout_ms}ms")]
    LabelNotVisible {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The employee autocomplete produced no usable suggestion in time.
    #[error("No suggestions for '{seed}' after {timeout_ms}ms")]
    NoSuggestions {
        /// Text typed to trigger the autocomplete.
        seed: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// The save confirmation was not observed in time.
    ///
    /// The save may still have succeeded server-side.
    #[error("Save not confirmed after {timeout_ms}ms")]
    SaveNotConfirmed {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// A bounded wait without a dedicated kind elapsed.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Domain Errors
    // ========================================================================
    /// A search targeted a username with no matching row.
    #[error("User not found: {username}")]
    UserNotFound {
        /// The username searched for.
        username: String,
    },

    /// The record-count label contained no digits.
    #[error("Unparsable record count: '{text}'")]
    UnparsableCount {
        /// The label text as read.
        text: String,
    },

    /// The record-count label was visible but empty.
    #[error("Record count label is empty")]
    EmptyCountLabel,

    /// A scenario observed a record count other than the expected one.
    #[error("Record count mismatch: expected {expected}, got {actual}")]
    CountMismatch {
        /// Expected record count.
        expected: i64,
        /// Observed record count.
        actual: i64,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Artifact Errors
    // ========================================================================
    /// Screenshot or video capture failed.
    #[error("Capture error: {message}")]
    Capture {
        /// Description of the capture failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// WebDriver backend error.
    #[error("WebDriver error: {0}")]
    WebDriver(#[from] WebDriverError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// Configuration file parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Image decode or encode error.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

// ============================================================================
// Error Constructors
// ============================================================================

/// Converts a duration to whole milliseconds for error context.
#[inline]
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Error {
    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            locator: locator.into(),
        }
    }

    /// Creates an ambiguous match error.
    #[inline]
    pub fn ambiguous_match(locator: impl Into<String>, count: usize) -> Self {
        Self::AmbiguousMatch {
            locator: locator.into(),
            count,
        }
    }

    /// Creates an option not found error.
    #[inline]
    pub fn option_not_found(option: impl Into<String>) -> Self {
        Self::OptionNotFound {
            option: option.into(),
        }
    }

    /// Creates a navigation timeout error.
    #[inline]
    pub fn navigation_timeout(operation: impl Into<String>, waited: Duration) -> Self {
        Self::NavigationTimeout {
            operation: operation.into(),
            timeout_ms: millis(waited),
        }
    }

    /// Creates a form not ready error.
    #[inline]
    pub fn form_not_ready(waited: Duration) -> Self {
        Self::FormNotReady {
            timeout_ms: millis(waited),
        }
    }

    /// Creates a label not visible error.
    #[inline]
    pub fn label_not_visible(waited: Duration) -> Self {
        Self::LabelNotVisible {
            timeout_ms: millis(waited),
        }
    }

    /// Creates a no suggestions error.
    #[inline]
    pub fn no_suggestions(seed: impl Into<String>, waited: Duration) -> Self {
        Self::NoSuggestions {
            seed: seed.into(),
            timeout_ms: millis(waited),
        }
    }

    /// Creates a save not confirmed error.
    #[inline]
    pub fn save_not_confirmed(waited: Duration) -> Self {
        Self::SaveNotConfirmed {
            timeout_ms: millis(waited),
        }
    }

    /// Creates a generic timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, waited: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms: millis(waited),
        }
    }

    /// Creates a user not found error.
    #[inline]
    pub fn user_not_found(username: impl Into<String>) -> Self {
        Self::UserNotFound {
            username: username.into(),
        }
    }

    /// Creates an unparsable count error.
    #[inline]
    pub fn unparsable_count(text: impl Into<String>) -> Self {
        Self::UnparsableCount { text: text.into() }
    }

    /// Creates a count mismatch error.
    #[inline]
    pub fn count_mismatch(expected: i64, actual: i64) -> Self {
        Self::CountMismatch { expected, actual }
    }

    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a capture error.
    #[inline]
    pub fn capture(message: impl Into<String>) -> Self {
        Self::Capture {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if a bounded wait elapsed.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::NavigationTimeout { .. }
                | Self::FormNotReady { .. }
                | Self::LabelNotVisible { .. }
                | Self::NoSuggestions { .. }
                | Self::SaveNotConfirmed { .. }
                | Self::Timeout { .. }
        )
    }

    /// Returns `true` if this is an element lookup error.
    #[inline]
    #[must_use]
    pub fn is_element_error(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. } | Self::AmbiguousMatch { .. } | Self::OptionNotFound { .. }
        )
    }

    /// Returns `true` if the record count could not be read or did not match.
    #[inline]
    #[must_use]
    pub fn is_count_error(&self) -> bool {
        matches!(
            self,
            Self::UnparsableCount { .. } | Self::EmptyCountLabel | Self::CountMismatch { .. }
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
