//! Per-test browser session.
//!
//! A [`Session`] is created for one test case, handed by reference to the
//! page objects, and closed when the test ends. There is no process-wide
//! browser state.
//!
//! Every lookup re-evaluates its locator against the live document and checks
//! the locator's expected cardinality at call time.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::browser::{Browser, By};
use crate::config::Timeouts;
use crate::error::{Error, Result};
use crate::locator::{Cardinality, Locator};
use crate::wait::Wait;

// ============================================================================
// Session
// ============================================================================

/// One browser context plus the wait bounds used to drive it.
pub struct Session<B: Browser> {
    browser: Arc<B>,
    timeouts: Timeouts,
}

impl<B: Browser> fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Session - Lifecycle
// ============================================================================

impl<B: Browser> Session<B> {
    /// Wraps a launched browser.
    #[must_use]
    pub fn new(browser: B, timeouts: Timeouts) -> Self {
        Self {
            browser: Arc::new(browser),
            timeouts,
        }
    }

    /// Returns the backend.
    #[inline]
    #[must_use]
    pub fn browser(&self) -> &B {
        &self.browser
    }

    /// Returns a shared handle to the backend, e.g. for a
    /// [`Recorder`](crate::Recorder).
    #[inline]
    #[must_use]
    pub fn browser_handle(&self) -> Arc<B> {
        Arc::clone(&self.browser)
    }

    /// Returns the wait bounds.
    #[inline]
    #[must_use]
    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Creates a bounded wait using the configured poll interval.
    #[inline]
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> Wait {
        Wait::new(timeout).with_interval(self.timeouts.poll_interval())
    }

    /// Navigates to a URL.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.browser.navigate(url).await
    }

    /// Captures the viewport as PNG bytes.
    pub async fn screenshot(&self) -> Result<Vec<u8>> {
        self.browser.screenshot().await
    }

    /// Releases the browser.
    pub async fn close(self) -> Result<()> {
        debug!("Closing session");
        self.browser.quit().await?;
        info!("Session closed");
        Ok(())
    }
}

// ============================================================================
// Session - Lookup
// ============================================================================

impl<B: Browser> Session<B> {
    /// Returns every element matching a selector.
    pub async fn locate_all(&self, by: &By) -> Result<Vec<B::Element>> {
        self.browser.find_all(by).await
    }

    /// Resolves a locator to one element, enforcing its cardinality.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if nothing matches
    /// - [`Error::AmbiguousMatch`] if an exactly-one locator matches several
    pub async fn locate(&self, locator: &Locator) -> Result<B::Element> {
        let matches = self.browser.find_all(locator.by()).await?;
        select_match(matches, locator)
    }

    /// Clicks the element a locator resolves to.
    pub async fn click(&self, locator: &Locator) -> Result<()> {
        debug!(locator = locator.name(), "Click");
        let element = self.locate(locator).await?;
        self.browser.click(&element).await
    }

    /// Replaces the value of the input a locator resolves to.
    pub async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
        debug!(locator = locator.name(), len = text.len(), "Fill");
        let element = self.locate(locator).await?;
        self.browser.fill(&element, text).await
    }

    /// Returns the text of the element a locator resolves to.
    pub async fn text(&self, locator: &Locator) -> Result<String> {
        let element = self.locate(locator).await?;
        self.browser.text(&element).await
    }

    /// Clicks an element obtained from a wait.
    pub async fn click_element(&self, element: &B::Element) -> Result<()> {
        self.browser.click(element).await
    }

    /// Resolves a locator relative to `parent`, enforcing its cardinality.
    pub async fn locate_within(
        &self,
        parent: &B::Element,
        locator: &Locator,
    ) -> Result<B::Element> {
        let matches = self.browser.find_all_within(parent, locator.by()).await?;
        select_match(matches, locator)
    }

    /// Returns the currently visible matches of a locator with their text,
    /// in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousMatch`] if an exactly-one locator has several
    /// visible matches.
    pub async fn visible_texts(&self, locator: &Locator) -> Result<Vec<(B::Element, String)>> {
        let mut visible = Vec::new();
        for element in self.visible_matches(locator).await? {
            if let Ok(text) = self.browser.text(&element).await {
                visible.push((element, text));
            }
        }
        Ok(visible)
    }

    /// Visible matches of a locator, in document order.
    ///
    /// Hidden matches are ignored when checking cardinality.
    async fn visible_matches(&self, locator: &Locator) -> Result<Vec<B::Element>> {
        let mut visible = Vec::new();
        for element in self.browser.find_all(locator.by()).await? {
            if self.visible(&element).await {
                visible.push(element);
            }
        }
        ensure_unambiguous(visible.len(), locator)?;
        Ok(visible)
    }
}

// ============================================================================
// Session - Waits
// ============================================================================

impl<B: Browser> Session<B> {
    /// Waits for the first visible element matching a locator.
    ///
    /// Returns `None` if none became visible within `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AmbiguousMatch`] as soon as an exactly-one locator has
    /// several visible matches.
    pub async fn wait_visible(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<B::Element>> {
        debug!(
            locator = locator.name(),
            timeout_ms = timeout.as_millis(),
            "Waiting for visible element"
        );
        self.wait(timeout)
            .until(|| async move { Ok(self.visible_matches(locator).await?.into_iter().next()) })
            .await
    }

    /// Waits for the first visible element matching a locator whose text
    /// satisfies `accept`. Yields the element and its text.
    pub async fn wait_visible_text<F>(
        &self,
        locator: &Locator,
        timeout: Duration,
        accept: F,
    ) -> Result<Option<(B::Element, String)>>
    where
        F: Fn(&str) -> bool + Sync,
    {
        debug!(
            locator = locator.name(),
            timeout_ms = timeout.as_millis(),
            "Waiting for visible text"
        );
        let accept = &accept;
        self.wait(timeout)
            .until(|| async move {
                let found = self
                    .visible_texts(locator)
                    .await?
                    .into_iter()
                    .find(|(_, text)| accept(text));
                Ok(found)
            })
            .await
    }

    /// Waits for a visible element that also accepts interaction.
    pub async fn wait_interactable(
        &self,
        locator: &Locator,
        timeout: Duration,
    ) -> Result<Option<B::Element>> {
        debug!(
            locator = locator.name(),
            timeout_ms = timeout.as_millis(),
            "Waiting for interactable element"
        );
        self.wait(timeout)
            .until(|| async move {
                for element in self.visible_matches(locator).await? {
                    if self.browser.is_enabled(&element).await.unwrap_or(false) {
                        return Ok(Some(element));
                    }
                }
                Ok(None)
            })
            .await
    }

    /// Waits until the document reports `complete`.
    ///
    /// Returns `false` on timeout.
    pub async fn wait_load_complete(&self, timeout: Duration) -> Result<bool> {
        debug!(timeout_ms = timeout.as_millis(), "Waiting for load complete");
        self.wait(timeout)
            .until_true(|| async move { Ok(self.browser.ready_state().await?.is_complete()) })
            .await
    }

    /// Waits until the document is complete and its resource count has held
    /// steady for the configured quiet window.
    ///
    /// Returns `false` on timeout.
    pub async fn wait_network_idle(&self, timeout: Duration) -> Result<bool> {
        debug!(timeout_ms = timeout.as_millis(), "Waiting for network idle");
        let quiet = self.timeouts.network_quiet();
        // Last observed resource count and when it was first seen.
        let last: Mutex<Option<(u64, Instant)>> = Mutex::new(None);
        let last = &last;

        self.wait(timeout)
            .until_true(|| async move {
                if !self.browser.ready_state().await?.is_complete() {
                    *last.lock() = None;
                    return Ok(false);
                }
                let count = self.browser.resource_count().await?;
                let now = Instant::now();

                let mut observed = last.lock();
                match *observed {
                    Some((previous, since)) if previous == count => {
                        Ok(now.duration_since(since) >= quiet)
                    }
                    _ => {
                        *observed = Some((count, now));
                        Ok(false)
                    }
                }
            })
            .await
    }

    /// Visibility check that treats a vanished element as not visible.
    async fn visible(&self, element: &B::Element) -> bool {
        match self.browser.is_visible(element).await {
            Ok(visible) => visible,
            Err(e) => {
                debug!(error = %e, "Element vanished while polling");
                false
            }
        }
    }
}

/// Rejects several visible matches for an exactly-one locator.
fn ensure_unambiguous(count: usize, locator: &Locator) -> Result<()> {
    if count > 1 && locator.cardinality() == Cardinality::One {
        return Err(Error::ambiguous_match(locator.to_string(), count));
    }
    Ok(())
}

/// Applies a locator's cardinality to the elements it matched.
fn select_match<E>(mut matches: Vec<E>, locator: &Locator) -> Result<E> {
    match (matches.len(), locator.cardinality()) {
        (0, _) => Err(Error::element_not_found(locator.to_string())),
        (1, _) | (_, Cardinality::FirstOf) => Ok(matches.swap_remove(0)),
        (count, Cardinality::One) => Err(Error::ambiguous_match(locator.to_string(), count)),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::locator::Field;

    #[test]
    fn test_select_match_empty_is_not_found() {
        let result = select_match(Vec::<u8>::new(), &Field::LoginSubmit.locator());
        assert!(matches!(result, Err(Error::ElementNotFound { .. })));
    }

    #[test]
    fn test_select_match_one_rejects_several() {
        let result = select_match(vec![1, 2], &Field::SaveButton.locator());
        assert!(matches!(result, Err(Error::AmbiguousMatch { count: 2, .. })));
    }

    #[test]
    fn test_select_match_first_of_takes_first() {
        let result = select_match(vec![7, 8, 9], &Field::ResultRows.locator());
        assert_eq!(result.unwrap(), 7);
    }

    #[test]
    fn test_ensure_unambiguous_rejects_several_for_one() {
        let result = ensure_unambiguous(2, &Field::ConfirmDelete.locator());
        assert!(matches!(result, Err(Error::AmbiguousMatch { count: 2, .. })));
    }

    #[test]
    fn test_ensure_unambiguous_allows_first_of_and_single() {
        assert!(ensure_unambiguous(3, &Field::ResultRows.locator()).is_ok());
        assert!(ensure_unambiguous(1, &Field::RecordCount.locator()).is_ok());
        assert!(ensure_unambiguous(0, &Field::RecordCount.locator()).is_ok());
    }

    #[test]
    fn test_select_match_single() {
        let result = select_match(vec![3], &Field::SaveButton.locator());
        assert_eq!(result.unwrap(), 3);
    }
}
