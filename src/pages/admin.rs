//! Admin user list: section navigation, record count, search and delete.
//!
//! Deleting runs through a fixed sequence of phases:
//!
//! ```text
//! Idle -> Searching -> Found | NotFound (fail)
//!      -> Deleting -> Confirming -> Resetting
//!      -> CountVisible | Timeout (fail) -> Done
//! ```
//!
//! A lookup that matches no row fails before anything is clicked, so a failed
//! delete never leaves a half-finished mutation behind.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use parking_lot::Mutex;
use regex::Regex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::browser::Browser;
use crate::driver::Session;
use crate::error::{Error, Result};
use crate::locator::Field;

// ============================================================================
// Record Count Parsing
// ============================================================================

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("literal pattern is valid"));

/// Extracts the first contiguous run of digits from a record-count label.
///
/// `"(12) Records Found"` yields `12`.
///
/// # Errors
///
/// - [`Error::EmptyCountLabel`] if the text is blank
/// - [`Error::UnparsableCount`] if it holds no digits or the number overflows
pub fn parse_record_count(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::EmptyCountLabel);
    }

    DIGITS
        .find(trimmed)
        .and_then(|digits| digits.as_str().parse().ok())
        .ok_or_else(|| Error::unparsable_count(trimmed))
}

// ============================================================================
// DeletePhase
// ============================================================================

/// Progress of [`AdminPage::delete_user_and_get_count`], used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePhase {
    /// Nothing started.
    Idle,
    /// Search submitted, waiting for a matching row.
    Searching,
    /// A row matched the username.
    Found,
    /// No row matched.
    NotFound,
    /// Delete icon clicked.
    Deleting,
    /// Confirmation accepted.
    Confirming,
    /// Filter reset, waiting for the unfiltered count.
    Resetting,
    /// The unfiltered count label is visible.
    CountVisible,
    /// The count label never became visible.
    Timeout,
    /// Count read.
    Done,
}

impl DeletePhase {
    /// Returns `true` for phases that end the operation.
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::NotFound | Self::Timeout | Self::Done)
    }
}

impl fmt::Display for DeletePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// AdminPage
// ============================================================================

/// The admin user-management screen.
#[derive(Debug)]
pub struct AdminPage<'s, B: Browser> {
    session: &'s Session<B>,
}

impl<'s, B: Browser> AdminPage<'s, B> {
    /// Binds the page to a session.
    #[inline]
    #[must_use]
    pub fn new(session: &'s Session<B>) -> Self {
        Self { session }
    }

    /// Opens the admin section and waits for its network activity to settle.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if the menu entry is absent
    /// - [`Error::NavigationTimeout`] if the network does not go idle in time
    pub async fn open_admin_section(&self) -> Result<()> {
        debug!("Opening admin section");
        self.session.click(&Field::AdminMenu.locator()).await?;

        let timeout = self.session.timeouts().navigation();
        if !self.session.wait_network_idle(timeout).await? {
            return Err(Error::navigation_timeout("admin section", timeout));
        }

        info!("Admin section loaded");
        Ok(())
    }

    /// Reads the record-count label.
    ///
    /// Has no side effects on the page.
    ///
    /// # Errors
    ///
    /// - [`Error::LabelNotVisible`] if the label does not appear in time
    /// - [`Error::AmbiguousMatch`] if several count labels are visible
    /// - [`Error::EmptyCountLabel`] / [`Error::UnparsableCount`] if its text
    ///   holds no number
    pub async fn record_count(&self) -> Result<u32> {
        let timeout = self.session.timeouts().label();
        let label = self
            .session
            .wait_visible(&Field::RecordCount.locator(), timeout)
            .await?
            .ok_or_else(|| Error::label_not_visible(timeout))?;

        let text = self.session.browser().text(&label).await?;
        let count = parse_record_count(&text)?;
        info!(count, "Record count read");
        Ok(count)
    }

    /// Searches for `username`, deletes its row, resets the filter and
    /// returns the unfiltered total count.
    ///
    /// Not idempotent: once the user is gone a second call fails with
    /// [`Error::UserNotFound`].
    ///
    /// # Errors
    ///
    /// - [`Error::UserNotFound`] if no row shows the username; nothing is
    ///   clicked in that case
    /// - [`Error::Timeout`] if the confirmation dialog does not appear
    /// - [`Error::AmbiguousMatch`] if several confirmation buttons or count
    ///   labels are visible; the delete is not confirmed in the first case
    /// - [`Error::LabelNotVisible`] if the count label does not return
    /// - [`Error::EmptyCountLabel`] / [`Error::UnparsableCount`] as for
    ///   [`AdminPage::record_count`]
    pub async fn delete_user_and_get_count(&self, username: &str) -> Result<u32> {
        let timeouts = self.session.timeouts();
        let mut phase = DeletePhase::Idle;
        debug!(username, %phase, "Deleting user");

        // Search
        self.session
            .fill(&Field::SearchUsername.locator(), username)
            .await?;
        self.session.click(&Field::SearchButton.locator()).await?;
        phase = self.advance(phase, DeletePhase::Searching);

        let row = self
            .session
            .wait_visible_text(&Field::ResultRows.locator(), timeouts.search(), |text| {
                row_shows_username(text, username)
            })
            .await?;
        let Some((row, _)) = row else {
            self.advance(phase, DeletePhase::NotFound);
            return Err(Error::user_not_found(username));
        };
        phase = self.advance(phase, DeletePhase::Found);

        // Delete and confirm
        let trash = self
            .session
            .locate_within(&row, &Field::RowDelete.locator())
            .await?;
        self.session.click_element(&trash).await?;
        phase = self.advance(phase, DeletePhase::Deleting);

        let confirm = self
            .session
            .wait_visible(&Field::ConfirmDelete.locator(), timeouts.form())
            .await?
            .ok_or_else(|| Error::timeout("delete confirmation dialog", timeouts.form()))?;
        self.session.click_element(&confirm).await?;
        phase = self.advance(phase, DeletePhase::Confirming);

        // Reset to the unfiltered view
        let filtered = self.visible_label_text().await?;
        self.session.click(&Field::ResetButton.locator()).await?;
        phase = self.advance(phase, DeletePhase::Resetting);

        let text = match self.wait_label_change(filtered.as_deref(), timeouts.search()).await? {
            Some(text) => text,
            None => {
                self.advance(phase, DeletePhase::Timeout);
                return Err(Error::label_not_visible(timeouts.search()));
            }
        };
        phase = self.advance(phase, DeletePhase::CountVisible);

        let count = parse_record_count(&text)?;
        self.advance(phase, DeletePhase::Done);
        info!(username, count, "User deleted");
        Ok(count)
    }

    /// Text of the count label right now, if it is visible.
    async fn visible_label_text(&self) -> Result<Option<String>> {
        let visible = self
            .session
            .visible_texts(&Field::RecordCount.locator())
            .await?;
        Ok(visible.into_iter().next().map(|(_, text)| text))
    }

    /// Waits for the count label to show a count other than `previous`.
    ///
    /// A label that holds the same text for one network-quiet window ends the
    /// wait early, unless that text is a transient label without a number.
    /// A label still visible at the deadline is accepted as is. Returns `None`
    /// if it never became visible.
    async fn wait_label_change(
        &self,
        previous: Option<&str>,
        timeout: Duration,
    ) -> Result<Option<String>> {
        let quiet = self.session.timeouts().network_quiet();
        // Last label text seen and when it first appeared.
        let seen: Mutex<Option<(String, Instant)>> = Mutex::new(None);
        let seen = &seen;

        let settled = self
            .session
            .wait(timeout)
            .until(|| async move {
                let Some(text) = self.visible_label_text().await? else {
                    *seen.lock() = None;
                    return Ok(None);
                };
                if Some(text.as_str()) != previous && parse_record_count(&text).is_ok() {
                    return Ok(Some(text));
                }

                let now = Instant::now();
                let mut last = seen.lock();
                match &*last {
                    Some((held, since)) if *held == text => {
                        let stable = now.duration_since(*since) >= quiet;
                        Ok((stable && label_is_final(&text)).then_some(text))
                    }
                    _ => {
                        *last = Some((text, now));
                        Ok(None)
                    }
                }
            })
            .await?;
        if settled.is_some() {
            return Ok(settled);
        }

        debug!("Count label unchanged after reset");
        self.visible_label_text().await
    }

    fn advance(&self, from: DeletePhase, to: DeletePhase) -> DeletePhase {
        debug!(%from, %to, terminal = to.is_terminal(), "Delete phase");
        to
    }
}

/// Whether a settled label can be handed to [`parse_record_count`]: it holds
/// a number or is blank. "No Records Found" shows while the table reloads.
fn label_is_final(text: &str) -> bool {
    !matches!(parse_record_count(text), Err(Error::UnparsableCount { .. }))
}

/// Whether a result row's text has a cell equal to `username`.
///
/// Rows render one cell per line, so a substring match would also accept
/// `test.user12` when searching for `test.user1`.
fn row_shows_username(row_text: &str, username: &str) -> bool {
    row_text
        .split(['\n', '\t'])
        .any(|cell| cell.trim() == username)
}

// ============================================================================
// Tests
// ============================================================================
