//! Selector expressions evaluated against the live document.
//!
//! Two strategies cover every query the page objects need: CSS for class and
//! attribute predicates, XPath for text matching and structural
//! ancestor/descendant relationships.
//!
//! # Example
//!
//! ```ignore
//! use orangehrm_admin_e2e::By;
//!
//! let rows = By::css(".oxd-table-body .oxd-table-row");
//! let search = By::xpath("//button[normalize-space()='Search']");
//! ```

use std::fmt;

// ============================================================================
// By Enum
// ============================================================================

/// Selector strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum By {
    /// CSS selector.
    ///
    /// # Example
    /// ```ignore
    /// By::Css("input[name='username']".into())
    /// By::Css(".oxd-table-body .oxd-table-row".into())
    /// ```
    Css(String),

    /// XPath expression.
    ///
    /// # Example
    /// ```ignore
    /// By::XPath("//button[normalize-space()='Reset']".into())
    /// By::XPath("//div[@role='listbox']//span".into())
    /// ```
    XPath(String),
}

impl By {
    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v) | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.value())
    }
}

// ============================================================================
// XPath Literals
// ============================================================================

/// Quotes text for safe interpolation into an XPath expression.
///
/// XPath 1.0 has no escape sequences, so text holding both quote kinds is
/// split and rejoined with `concat()`.
#[must_use]
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{text}'");
    }
    if !text.contains('"') {
        return format!("\"{text}\"");
    }

    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

// ============================================================================
// Tests
// ============================================================================
