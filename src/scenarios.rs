//! End-to-end flows composed from the page objects.
//!
//! Each flow logs in, works on the admin list and returns the record count
//! before and after its mutation. Callers assert the delta with
//! [`CountChange::expect_delta`].
//!
//! Usernames carry a random suffix because the system under test is shared
//! between runs; nothing cleans up users left behind by a failed run.

use tracing::info;
use uuid::Uuid;

use crate::browser::Browser;
use crate::config::Settings;
use crate::driver::Session;
use crate::error::{Error, Result};
use crate::pages::{AddUserPage, AdminPage, LoginPage};

// ============================================================================
// Test Data
// ============================================================================

/// Prefix of generated usernames.
pub const USERNAME_PREFIX: &str = "test.user";

/// Attributes of a user to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Option text of the role dropdown.
    pub role: String,
    /// Option text of the status dropdown.
    pub status: String,
    /// Login name of the new account.
    pub username: String,
    /// Password and its confirmation.
    pub password: String,
}

impl NewUser {
    /// An enabled admin with a unique `test.user…` name.
    #[must_use]
    pub fn random() -> Self {
        Self::with_username(random_username())
    }

    /// An enabled admin with the given name.
    #[must_use]
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            role: "Admin".to_string(),
            status: "Enabled".to_string(),
            username: username.into(),
            password: "Test@1234".to_string(),
        }
    }
}

/// `test.user` followed by eight hex digits.
#[must_use]
pub fn random_username() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{USERNAME_PREFIX}{}", &suffix[..8])
}

// ============================================================================
// CountChange
// ============================================================================

/// Record count observed before and after a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountChange {
    /// Count before the mutation.
    pub before: u32,
    /// Count after the mutation.
    pub after: u32,
}

impl CountChange {
    /// Signed difference `after - before`.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> i64 {
        i64::from(self.after) - i64::from(self.before)
    }

    /// Checks the count moved by exactly `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CountMismatch`] otherwise.
    pub fn expect_delta(&self, expected: i64) -> Result<()> {
        if self.delta() == expected {
            return Ok(());
        }
        Err(Error::count_mismatch(
            i64::from(self.before) + expected,
            i64::from(self.after),
        ))
    }
}

// ============================================================================
// Flows
// ============================================================================

/// Logs in and opens the admin section.
async fn enter_admin<'s, B: Browser>(
    session: &'s Session<B>,
    settings: &Settings,
) -> Result<AdminPage<'s, B>> {
    LoginPage::new(session)
        .login(&settings.admin_user, &settings.admin_password)
        .await?;
    let admin = AdminPage::new(session);
    admin.open_admin_section().await?;
    Ok(admin)
}

/// Opens the form, fills it with `user` and saves. Returns the employee the
/// account was bound to.
async fn create_user<B: Browser>(session: &Session<B>, user: &NewUser) -> Result<String> {
    let form = AddUserPage::new(session);
    form.open_form().await?;
    let employee = form
        .fill_details(&user.role, &user.status, &user.username, &user.password)
        .await?;
    form.save().await?;
    Ok(employee)
}

/// Adds `user` and reports the record count around the save.
///
/// # Errors
///
/// Propagates any page-object error.
pub async fn add_user<B: Browser>(
    session: &Session<B>,
    settings: &Settings,
    user: &NewUser,
) -> Result<CountChange> {
    let admin = enter_admin(session, settings).await?;

    let before = admin.record_count().await?;
    info!(before, "Initial record count");

    let employee = create_user(session, user).await?;

    let after = admin.record_count().await?;
    info!(after, username = %user.username, employee = %employee, "Record count after adding user");

    Ok(CountChange { before, after })
}

/// Adds `user`, then deletes it and reports the record count around the
/// delete.
///
/// # Errors
///
/// Propagates any page-object error.
pub async fn delete_user<B: Browser>(
    session: &Session<B>,
    settings: &Settings,
    user: &NewUser,
) -> Result<CountChange> {
    let admin = enter_admin(session, settings).await?;
    create_user(session, user).await?;

    let before = admin.record_count().await?;
    let after = admin.delete_user_and_get_count(&user.username).await?;
    info!(before, after, username = %user.username, "Record count after deletion");

    Ok(CountChange { before, after })
}

// ============================================================================
// Tests
// ============================================================================
