//! OrangeHRM admin e2e - Page objects and scenarios for the admin user screens.
//!
//! This library drives a real browser through W3C WebDriver to log in to
//! OrangeHRM, open the admin section, add a user, delete a user and check
//! that the displayed record count moves by exactly one each time.
//!
//! # Architecture
//!
//! The suite is layered, leaves first:
//!
//! - **Backend**: the [`Browser`] trait, implemented by [`WebDriverBrowser`]
//! - **Session**: one [`Session`] per test case, owning the browser and the
//!   wait bounds; every lookup and wait goes through it
//! - **Locators**: [`Field`] maps each UI concept to a [`Locator`]
//! - **Page objects**: [`LoginPage`], [`AdminPage`], [`AddUserPage`]
//! - **Scenarios**: [`scenarios::add_user`], [`scenarios::delete_user`]
//! - **Harness**: [`Harness`] launches a fresh browser per test and
//!   publishes screenshot, video and log through an [`ArtifactSink`]
//!
//! Key design principles:
//!
//! - No process-wide browser state; sessions are passed by reference
//! - Every wait is bounded and fails with a named error
//! - Locators are re-evaluated on every use and their cardinality is checked
//!   at call time
//!
//! # Quick Start
//!
//! ```no_run
//! use orangehrm_admin_e2e::{Harness, Result, Settings, scenarios};
//! use orangehrm_admin_e2e::scenarios::NewUser;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let settings = Settings::load()?;
//!     let harness = Harness::from_settings(settings)?;
//!
//!     let user = NewUser::random();
//!     let change = harness
//!         .run("add_user", |session, settings| {
//!             Box::pin(async move { scenarios::add_user(session, settings, &user).await })
//!         })
//!         .await?;
//!     change.expect_delta(1)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`browser`] | Backend trait, WebDriver backend, selectors, video recorder |
//! | [`config`] | [`Settings`] from TOML and environment |
//! | [`driver`] | [`Session`], [`SessionBuilder`], [`Launcher`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`harness`] | Per-test lifecycle and diagnostics |
//! | [`locator`] | Semantic field to selector mapping |
//! | [`pages`] | Page objects |
//! | [`report`] | Attachments and sinks |
//! | [`scenarios`] | Add-user and delete-user flows |
//! | [`wait`] | Bounded polling |

// ============================================================================
// Modules
// ============================================================================

/// Browser backend abstraction.
///
/// - [`Browser`] - The primitives page objects depend on
/// - [`WebDriverBrowser`] - `thirtyfour` implementation
/// - [`Recorder`] - Whole-run GIF capture
pub mod browser;

/// Suite configuration.
///
/// Use [`Settings::load()`] to read the config file and environment.
pub mod config;

/// Session construction and lifecycle.
pub mod driver;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Per-test lifecycle.
pub mod harness;

/// Locator resolver.
pub mod locator;

/// Page objects.
pub mod pages;

/// Diagnostic attachments and sinks.
pub mod report;

/// End-to-end flows.
pub mod scenarios;

/// Bounded polling.
pub mod wait;

// ============================================================================
// Re-exports
// ============================================================================

// Browser types
pub use browser::{Browser, By, ReadyState, Recorder, WebDriverBrowser, WebDriverLauncher};

// Configuration types
pub use config::{Settings, SettingsBuilder, Timeouts};

// Driver types
pub use driver::{BrowserOptions, Launcher, Session, SessionBuilder};

// Error types
pub use error::{Error, Result};

// Harness types
pub use harness::Harness;

// Locator types
pub use locator::{Cardinality, Field, Locator};

// Page objects
pub use pages::{AddUserPage, AdminPage, LoginPage};

// Report types
pub use report::{ArtifactSink, Attachment, DirectorySink, MemorySink, Outcome};

// Wait types
pub use wait::Wait;
