//! Add-user form.
//!
//! The employee field is an autocomplete: typing a seed shows an
//! asynchronously populated suggestion list, initially holding a
//! "Searching..." placeholder. [`AddUserPage::fill_details`] accepts the
//! first real suggestion, whatever it is, and returns its text so the caller
//! knows which employee the new account was bound to.

use tracing::{debug, info};

use crate::browser::Browser;
use crate::driver::Session;
use crate::error::{Error, Result};
use crate::locator::Field;

use super::select_option;

// ============================================================================
// Constants
// ============================================================================

/// Text typed into the employee field to trigger suggestions.
pub const DEFAULT_EMPLOYEE_SEED: &str = "a";

/// Suggestion texts that stand for "not loaded yet" or "nothing to pick".
const PLACEHOLDERS: [&str; 2] = ["Searching", "No Records Found"];

/// Returns `true` if a suggestion entry is a placeholder, not an employee.
#[must_use]
pub fn is_suggestion_placeholder(text: &str) -> bool {
    let text = text.trim();
    text.is_empty() || PLACEHOLDERS.iter().any(|p| text.starts_with(p))
}

// ============================================================================
// AddUserPage
// ============================================================================

/// The add-user form reached from the admin list.
#[derive(Debug)]
pub struct AddUserPage<'s, B: Browser> {
    session: &'s Session<B>,
    employee_seed: String,
}

impl<'s, B: Browser> AddUserPage<'s, B> {
    /// Binds the page to a session.
    #[must_use]
    pub fn new(session: &'s Session<B>) -> Self {
        Self {
            session,
            employee_seed: DEFAULT_EMPLOYEE_SEED.to_string(),
        }
    }

    /// Replaces the text typed to trigger employee suggestions.
    #[must_use]
    pub fn with_employee_seed(mut self, seed: impl Into<String>) -> Self {
        self.employee_seed = seed.into();
        self
    }

    /// Clicks "Add" and waits for the role dropdown to become interactable.
    ///
    /// # Errors
    ///
    /// - [`Error::ElementNotFound`] if the "Add" button is absent
    /// - [`Error::FormNotReady`] if the form does not become usable in time
    pub async fn open_form(&self) -> Result<()> {
        debug!("Opening add-user form");
        self.session.click(&Field::AddButton.locator()).await?;

        let timeout = self.session.timeouts().form();
        self.session
            .wait_interactable(&Field::UserRoleDropdown.locator(), timeout)
            .await?
            .ok_or_else(|| Error::form_not_ready(timeout))?;

        info!("Add-user form ready");
        Ok(())
    }

    /// Fills every field of the form, in order: role, employee, status,
    /// username, password, confirmation.
    ///
    /// Returns the employee name actually selected. It is whichever employee
    /// the system suggested first for the seed, not a caller-chosen one.
    /// Password and confirmation are typed verbatim without comparing them.
    ///
    /// # Errors
    ///
    /// - [`Error::OptionNotFound`] if `role` or `status` is not offered
    /// - [`Error::NoSuggestions`] if no real suggestion appears in time
    /// - [`Error::ElementNotFound`] if an input is absent
    pub async fn fill_details(
        &self,
        role: &str,
        status: &str,
        username: &str,
        password: &str,
    ) -> Result<String> {
        let role = select_option(self.session, Field::UserRoleDropdown, role).await?;
        debug!(role = %role, "Role selected");

        let employee = self.pick_first_employee().await?;

        let status = select_option(self.session, Field::StatusDropdown, status).await?;
        debug!(status = %status, "Status selected");

        self.session
            .fill(&Field::NewUsername.locator(), username)
            .await?;
        self.session.fill(&Field::Password.locator(), password).await?;
        self.session
            .fill(&Field::ConfirmPassword.locator(), password)
            .await?;

        info!(username, employee = %employee, "Add-user form filled");
        Ok(employee)
    }

    /// Submits the form and waits for the "Successfully Saved" confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SaveNotConfirmed`] if the confirmation is not seen in
    /// time. The record may still have been saved.
    pub async fn save(&self) -> Result<()> {
        debug!("Saving new user");
        self.session.click(&Field::SaveButton.locator()).await?;

        let timeout = self.session.timeouts().save();
        self.session
            .wait_visible(&Field::SaveSuccess.locator(), timeout)
            .await?
            .ok_or_else(|| Error::save_not_confirmed(timeout))?;

        info!("User saved");
        Ok(())
    }

    /// Types the seed and selects the first non-placeholder suggestion.
    async fn pick_first_employee(&self) -> Result<String> {
        let seed = self.employee_seed.as_str();
        self.session
            .fill(&Field::EmployeeName.locator(), seed)
            .await?;

        let timeout = self.session.timeouts().suggestions();
        let (suggestion, text) = self
            .session
            .wait_visible_text(&Field::ListboxOptions.locator(), timeout, |text| {
                !is_suggestion_placeholder(text)
            })
            .await?
            .ok_or_else(|| Error::no_suggestions(seed, timeout))?;
        self.session.click_element(&suggestion).await?;

        let employee = text.trim().to_string();
        info!(seed, employee = %employee, "Accepted first employee suggestion");
        Ok(employee)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searching_is_placeholder() {
        assert!(is_suggestion_placeholder("Searching...."));
        assert!(is_suggestion_placeholder("  Searching"));
    }

    #[test]
    fn test_no_records_is_placeholder() {
        assert!(is_suggestion_placeholder("No Records Found"));
    }

    #[test]
    fn test_blank_is_placeholder() {
        assert!(is_suggestion_placeholder(""));
        assert!(is_suggestion_placeholder("   "));
    }

    #[test]
    fn test_employee_name_is_not_placeholder() {
        assert!(!is_suggestion_placeholder("Orange Test"));
        assert!(!is_suggestion_placeholder("Anna Searching-Smith"));
    }
}
