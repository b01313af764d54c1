//! Session construction and lifecycle.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Per-test browser context handed to page objects |
//! | [`SessionBuilder`] | Fluent WebDriver configuration builder |
//! | [`Launcher`] | Creates one fresh browser per test case |
//! | [`BrowserOptions`] | Browser launch options |
//!
//! # Example
//!
//! ```no_run
//! use orangehrm_admin_e2e::{Result, SessionBuilder};
//!
//! # async fn example() -> Result<()> {
//! let session = SessionBuilder::new().headless().launch().await?;
//! session.goto("https://opensource-demo.orangehrmlive.com/").await?;
//! session.close().await?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder and the launcher seam.
pub mod builder;

/// Per-test session: lookup, interaction and bounded waits.
pub mod core;

/// Browser launch options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::{Launcher, SessionBuilder};
pub use core::Session;
pub use options::BrowserOptions;
