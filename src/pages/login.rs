//! Login form.

use tracing::{debug, info};

use crate::browser::Browser;
use crate::driver::Session;
use crate::error::{Error, Result};
use crate::locator::Field;

// ============================================================================
// LoginPage
// ============================================================================

/// The login screen.
#[derive(Debug)]
pub struct LoginPage<'s, B: Browser> {
    session: &'s Session<B>,
}

impl<'s, B: Browser> LoginPage<'s, B> {
    /// Binds the page to a session.
    #[inline]
    #[must_use]
    pub fn new(session: &'s Session<B>) -> Self {
        Self { session }
    }

    /// Fills the credentials, submits, and waits for the resulting page load.
    ///
    /// Success only means the load finished; callers confirm the login took
    /// effect through a post-login landmark such as the admin menu.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if the form fields are absent
    /// - [`Error::NavigationTimeout`] if the load does not complete in time
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        debug!(username, "Logging in");
        self.session
            .fill(&Field::LoginUsername.locator(), username)
            .await?;
        self.session
            .fill(&Field::LoginPassword.locator(), password)
            .await?;
        self.session.click(&Field::LoginSubmit.locator()).await?;

        let timeout = self.session.timeouts().navigation();
        if !self.session.wait_load_complete(timeout).await? {
            return Err(Error::navigation_timeout("login", timeout));
        }

        info!(username, "Login submitted, page loaded");
        Ok(())
    }
}
