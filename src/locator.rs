//! Locator resolver for the OrangeHRM admin screens.
//!
//! Maps each semantic UI concept ([`Field`]) to a [`Locator`]: a selector plus
//! the number of matches the caller expects. Selectors match structurally
//! (label text, role attributes, class fragments) rather than by absolute
//! path. Resolution is a pure mapping; waiting and cardinality checks happen
//! in [`Session`](crate::Session) every time a locator is used, so nothing
//! is cached across navigations.
//!
//! | Screen | Fields |
//! |--------|--------|
//! | Login | [`Field::LoginUsername`], [`Field::LoginPassword`], [`Field::LoginSubmit`] |
//! | Admin list | [`Field::AdminMenu`], [`Field::AddButton`], [`Field::SearchUsername`], [`Field::SearchButton`], [`Field::ResetButton`], [`Field::RecordCount`], [`Field::ResultRows`], [`Field::RowDelete`], [`Field::ConfirmDelete`] |
//! | Add user | [`Field::UserRoleDropdown`], [`Field::EmployeeName`], [`Field::StatusDropdown`], [`Field::NewUsername`], [`Field::Password`], [`Field::ConfirmPassword`], [`Field::SaveButton`], [`Field::SaveSuccess`], [`Field::ListboxOptions`] |

use std::fmt;

use crate::browser::{By, xpath_literal};

// ============================================================================
// Cardinality
// ============================================================================

/// How many elements a locator is expected to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// Exactly one element; more is an ambiguous match.
    One,
    /// One or more elements; the first in document order is used.
    FirstOf,
}

// ============================================================================
// Locator
// ============================================================================

/// An immutable selector plus expected cardinality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    name: String,
    by: By,
    cardinality: Cardinality,
}

impl Locator {
    /// Creates a locator expecting exactly one match.
    #[must_use]
    pub fn one(name: impl Into<String>, by: By) -> Self {
        Self {
            name: name.into(),
            by,
            cardinality: Cardinality::One,
        }
    }

    /// Creates a locator taking the first of many matches.
    #[must_use]
    pub fn first_of(name: impl Into<String>, by: By) -> Self {
        Self {
            name: name.into(),
            by,
            cardinality: Cardinality::FirstOf,
        }
    }

    /// Human-readable name used in errors and logs.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The selector.
    #[inline]
    #[must_use]
    pub fn by(&self) -> &By {
        &self.by
    }

    /// The expected cardinality.
    #[inline]
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.by)
    }
}

// ============================================================================
// Field
// ============================================================================

/// Semantic UI concepts on the screens under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Login form username input.
    LoginUsername,
    /// Login form password input.
    LoginPassword,
    /// Login form submit button.
    LoginSubmit,
    /// "Admin" entry of the main menu.
    AdminMenu,
    /// "Add" button above the user list.
    AddButton,
    /// Username filter of the user search panel.
    SearchUsername,
    /// "Search" button of the user search panel.
    SearchButton,
    /// "Reset" button of the user search panel.
    ResetButton,
    /// "(N) Records Found" label.
    RecordCount,
    /// Rows of the user table.
    ResultRows,
    /// Delete icon, relative to a result row.
    RowDelete,
    /// "Yes, Delete" button of the confirmation dialog.
    ConfirmDelete,
    /// "User Role" select on the add-user form.
    UserRoleDropdown,
    /// "Employee Name" autocomplete input.
    EmployeeName,
    /// "Status" select on the add-user form.
    StatusDropdown,
    /// "Username" input on the add-user form.
    NewUsername,
    /// "Password" input on the add-user form.
    Password,
    /// "Confirm Password" input on the add-user form.
    ConfirmPassword,
    /// "Save" button on the add-user form.
    SaveButton,
    /// "Successfully Saved" toast.
    SaveSuccess,
    /// Every entry of the currently open listbox.
    ListboxOptions,
}

impl Field {
    /// Resolves the field to its locator.
    #[must_use]
    pub fn locator(self) -> Locator {
        match self {
            Self::LoginUsername => {
                Locator::one("login username", By::css("input[name='username']"))
            }
            Self::LoginPassword => {
                Locator::one("login password", By::css("input[name='password']"))
            }
            Self::LoginSubmit => Locator::one("login submit", By::css("button[type='submit']")),
            Self::AdminMenu => Locator::one(
                "admin menu",
                By::xpath("//a[contains(@class, 'oxd-main-menu-item') and contains(., 'Admin')]"),
            ),
            Self::AddButton => Locator::one(
                "add button",
                By::xpath("//button[contains(@class, 'oxd-button--secondary') and contains(., 'Add')]"),
            ),
            Self::SearchUsername => Locator::one(
                "search username",
                By::xpath("//label[contains(text(), 'Username')]/parent::div/following-sibling::div//input"),
            ),
            Self::SearchButton => {
                Locator::one("search button", By::xpath("//button[normalize-space()='Search']"))
            }
            Self::ResetButton => {
                Locator::one("reset button", By::xpath("//button[normalize-space()='Reset']"))
            }
            Self::RecordCount => Locator::one(
                "record count",
                By::xpath("//span[contains(normalize-space(.), 'Found') and contains(normalize-space(.), 'Record')]"),
            ),
            Self::ResultRows => {
                Locator::first_of("result rows", By::css(".oxd-table-body .oxd-table-row"))
            }
            Self::RowDelete => Locator::first_of("row delete icon", By::css(".oxd-icon.bi-trash")),
            Self::ConfirmDelete => Locator::one(
                "confirm delete",
                By::xpath("//button[contains(normalize-space(.), 'Yes, Delete')]"),
            ),
            Self::UserRoleDropdown => Locator::one("user role dropdown", labelled_select("User Role")),
            Self::EmployeeName => Locator::one(
                "employee name",
                By::xpath(format!(
                    "{}//input[@placeholder='Type for hints...']",
                    input_group("contains(text(), 'Employee Name')")
                )),
            ),
            Self::StatusDropdown => Locator::one("status dropdown", labelled_select("Status")),
            Self::NewUsername => Locator::one(
                "new username",
                By::xpath(format!(
                    "{}//input[contains(@class, 'oxd-input')]",
                    input_group("contains(text(), 'Username')")
                )),
            ),
            Self::Password => Locator::one(
                "password",
                By::xpath(format!(
                    "{}//input[@type='password']",
                    input_group("text()='Password'")
                )),
            ),
            Self::ConfirmPassword => Locator::one(
                "confirm password",
                By::xpath(format!(
                    "{}//input[@type='password']",
                    input_group("text()='Confirm Password'")
                )),
            ),
            Self::SaveButton => Locator::one(
                "save button",
                By::xpath("//button[@type='submit' and contains(@class, 'oxd-button--secondary') and contains(., 'Save')]"),
            ),
            Self::SaveSuccess => Locator::first_of(
                "save success toast",
                By::xpath("//*[contains(normalize-space(text()), 'Successfully Saved')]"),
            ),
            Self::ListboxOptions => {
                Locator::first_of("listbox options", By::xpath("//div[@role='listbox']//span"))
            }
        }
    }
}

/// XPath of an `oxd-input-group` whose label satisfies `label_predicate`.
fn input_group(label_predicate: &str) -> String {
    format!("//div[contains(@class, 'oxd-input-group') and .//label[{label_predicate}]]")
}

/// Active select control inside the input group labelled `label`.
fn labelled_select(label: &str) -> By {
    By::xpath(format!(
        "{}//div[contains(@class, 'oxd-select-text') and contains(@class, 'oxd-select-text--active')]",
        input_group(&format!("contains(text(), {})", xpath_literal(label)))
    ))
}

// ============================================================================
// Templates
// ============================================================================

/// Options of the open listbox whose text contains `text`.
///
/// Callers disambiguate between an exact and a substring match.
#[must_use]
pub fn listbox_option(text: &str) -> Locator {
    Locator::first_of(
        format!("listbox option '{text}'"),
        By::xpath(format!(
            "//div[@role='listbox']//span[contains(text(), {})]",
            xpath_literal(text)
        )),
    )
}

// ============================================================================
// Tests
// ============================================================================
