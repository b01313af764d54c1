//! Page objects for the OrangeHRM admin screens.
//!
//! Each page object borrows the per-test [`Session`] and exposes the named
//! operations of one screen. Page objects never call each other; scenarios
//! compose them.
//!
//! | Page | Operations |
//! |------|------------|
//! | [`LoginPage`] | [`login`](LoginPage::login) |
//! | [`AdminPage`] | [`open_admin_section`](AdminPage::open_admin_section), [`record_count`](AdminPage::record_count), [`delete_user_and_get_count`](AdminPage::delete_user_and_get_count) |
//! | [`AddUserPage`] | [`open_form`](AddUserPage::open_form), [`fill_details`](AddUserPage::fill_details), [`save`](AddUserPage::save) |

// ============================================================================
// Submodules
// ============================================================================

/// Add-user form.
pub mod add_user;

/// Admin user list: search, count, delete.
pub mod admin;

/// Login form.
pub mod login;

// ============================================================================
// Re-exports
// ============================================================================

pub use add_user::{AddUserPage, DEFAULT_EMPLOYEE_SEED, is_suggestion_placeholder};
pub use admin::{AdminPage, DeletePhase, parse_record_count};
pub use login::LoginPage;

// ============================================================================
// Imports
// ============================================================================

use tracing::debug;

use crate::browser::Browser;
use crate::driver::Session;
use crate::error::{Error, Result};
use crate::locator::{Field, listbox_option};

// ============================================================================
// Shared Actions
// ============================================================================

/// Opens a dropdown and picks the option matching `text`.
///
/// An option whose trimmed text equals `text` wins over one that merely
/// contains it. Returns the text of the selected option.
///
/// # Errors
///
/// Returns [`Error::OptionNotFound`] if no option matched within the form
/// timeout.
pub(crate) async fn select_option<B: Browser>(
    session: &Session<B>,
    dropdown: Field,
    text: &str,
) -> Result<String> {
    debug!(dropdown = ?dropdown, option = text, "Selecting option");
    session.click(&dropdown.locator()).await?;

    let option = listbox_option(text);
    let timeout = session.timeouts().form();
    let option = &option;
    let chosen = session
        .wait(timeout)
        .until(|| async move {
            let candidates = session.visible_texts(option).await?;
            let exact = candidates
                .iter()
                .position(|(_, candidate)| candidate.trim() == text);
            let pick = exact.or_else(|| {
                candidates
                    .iter()
                    .position(|(_, candidate)| candidate.contains(text))
            });
            Ok(pick.and_then(|index| candidates.into_iter().nth(index)))
        })
        .await?;

    let Some((element, label)) = chosen else {
        return Err(Error::option_not_found(text));
    };
    session.click_element(&element).await?;
    Ok(label.trim().to_string())
}
