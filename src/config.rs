//! Suite configuration.
//!
//! Settings are read from a TOML file, then credentials are overridden from
//! the environment, then everything is validated. Page objects only ever see
//! the resolved [`Settings`]; they never read files themselves.
//!
//! ```toml
//! base_url = "https://opensource-demo.orangehrmlive.com/"
//! admin_user = "Admin"
//! admin_password = "admin123"
//! headless = true
//!
//! [timeouts]
//! search_ms = 20000
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "ORANGEHRM_E2E_CONFIG";

/// Configuration file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "e2e.toml";

/// Environment variable overriding `admin_user`.
pub const ADMIN_USER_ENV: &str = "ORANGEHRM_ADMIN_USER";

/// Environment variable overriding `admin_password`.
pub const ADMIN_PASSWORD_ENV: &str = "ORANGEHRM_ADMIN_PASSWORD";

/// Default chromedriver endpoint.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Default artifact directory.
pub const DEFAULT_ARTIFACTS_DIR: &str = "target/e2e-artifacts";

// ============================================================================
// Timeouts
// ============================================================================

/// Bounds for every wait the page objects perform, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// Login load-complete and admin-section network idle.
    pub navigation_ms: u64,
    /// Add-user form becoming interactable, dropdown options appearing.
    pub form_ms: u64,
    /// Record-count label becoming visible.
    pub label_ms: u64,
    /// Search results and post-reset count label.
    pub search_ms: u64,
    /// Employee autocomplete suggestions.
    pub suggestions_ms: u64,
    /// Save confirmation toast.
    pub save_ms: u64,
    /// Delay between polls.
    pub poll_interval_ms: u64,
    /// Quiet window the resource count must hold for network idle.
    pub network_quiet_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation_ms: 30_000,
            form_ms: 10_000,
            label_ms: 10_000,
            search_ms: 15_000,
            suggestions_ms: 10_000,
            save_ms: 10_000,
            poll_interval_ms: 250,
            network_quiet_ms: 500,
        }
    }
}

impl Timeouts {
    /// Navigation bound.
    #[inline]
    #[must_use]
    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    /// Form readiness bound.
    #[inline]
    #[must_use]
    pub fn form(&self) -> Duration {
        Duration::from_millis(self.form_ms)
    }

    /// Count label bound.
    #[inline]
    #[must_use]
    pub fn label(&self) -> Duration {
        Duration::from_millis(self.label_ms)
    }

    /// Search bound.
    #[inline]
    #[must_use]
    pub fn search(&self) -> Duration {
        Duration::from_millis(self.search_ms)
    }

    /// Suggestion list bound.
    #[inline]
    #[must_use]
    pub fn suggestions(&self) -> Duration {
        Duration::from_millis(self.suggestions_ms)
    }

    /// Save confirmation bound.
    #[inline]
    #[must_use]
    pub fn save(&self) -> Duration {
        Duration::from_millis(self.save_ms)
    }

    /// Poll interval.
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Network quiet window.
    #[inline]
    #[must_use]
    pub fn network_quiet(&self) -> Duration {
        Duration::from_millis(self.network_quiet_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::config("timeouts.poll_interval_ms must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Validated suite settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Login page of the system under test.
    pub base_url: Url,
    /// Admin account name.
    pub admin_user: String,
    /// Admin account password.
    pub admin_password: String,
    /// Run the browser without a window.
    pub headless: bool,
    /// WebDriver endpoint.
    pub webdriver_url: Url,
    /// Record a video of every test run.
    pub record_video: bool,
    /// Where the directory sink writes attachments.
    pub artifacts_dir: PathBuf,
    /// Wait bounds.
    pub timeouts: Timeouts,
}

/// On-disk shape; every field optional so validation can name what is missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawSettings {
    base_url: Option<String>,
    admin_user: Option<String>,
    admin_password: Option<String>,
    headless: Option<bool>,
    webdriver_url: Option<String>,
    record_video: Option<bool>,
    artifacts_dir: Option<PathBuf>,
    timeouts: Timeouts,
}

impl Settings {
    /// Creates a builder for programmatic configuration.
    #[inline]
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Loads settings from [`CONFIG_PATH_ENV`] or [`DEFAULT_CONFIG_PATH`],
    /// applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, [`Error::Toml`] if it
    /// is malformed and [`Error::Config`] if validation fails.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
        Self::from_file(path)
    }

    /// Loads settings from a TOML file, applying environment overrides.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading settings");
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_with_env(&content, |key| std::env::var(key).ok())
    }

    /// Parses settings from TOML, consulting `env` for overrides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] if the text is malformed and [`Error::Config`]
    /// if validation fails.
    pub fn from_toml_with_env<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw: RawSettings = toml::from_str(content)?;

        let mut builder = SettingsBuilder {
            base_url: raw.base_url,
            admin_user: raw.admin_user,
            admin_password: raw.admin_password,
            headless: raw.headless.unwrap_or(false),
            webdriver_url: raw.webdriver_url,
            record_video: raw.record_video.unwrap_or(true),
            artifacts_dir: raw.artifacts_dir,
            timeouts: raw.timeouts,
        };

        if let Some(user) = env(ADMIN_USER_ENV) {
            debug!("Admin user overridden from environment");
            builder.admin_user = Some(user);
        }
        if let Some(password) = env(ADMIN_PASSWORD_ENV) {
            debug!("Admin password overridden from environment");
            builder.admin_password = Some(password);
        }

        builder.build()
    }
}

// ============================================================================
// SettingsBuilder
// ============================================================================

/// Builder for [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct SettingsBuilder {
    base_url: Option<String>,
    admin_user: Option<String>,
    admin_password: Option<String>,
    headless: bool,
    webdriver_url: Option<String>,
    record_video: bool,
    artifacts_dir: Option<PathBuf>,
    timeouts: Timeouts,
}

impl SettingsBuilder {
    /// Creates a builder with defaults and no required values set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            record_video: true,
            ..Self::default()
        }
    }

    /// Sets the base URL.
    #[inline]
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the admin credentials.
    #[inline]
    #[must_use]
    pub fn credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.admin_user = Some(user.into());
        self.admin_password = Some(password.into());
        self
    }

    /// Sets headless mode.
    #[inline]
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the WebDriver endpoint.
    #[inline]
    #[must_use]
    pub fn webdriver_url(mut self, url: impl Into<String>) -> Self {
        self.webdriver_url = Some(url.into());
        self
    }

    /// Enables or disables video recording.
    #[inline]
    #[must_use]
    pub fn record_video(mut self, record: bool) -> Self {
        self.record_video = record;
        self
    }

    /// Sets the artifact directory.
    #[inline]
    #[must_use]
    pub fn artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(dir.into());
        self
    }

    /// Replaces the wait bounds.
    #[inline]
    #[must_use]
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Validates and builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required value is missing or a URL is
    /// not http(s).
    pub fn build(self) -> Result<Settings> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::config("base_url is required"))?;
        let base_url = parse_http_url("base_url", &base_url)?;

        let admin_user = required("admin_user", self.admin_user)?;
        let admin_password = required("admin_password", self.admin_password)?;

        let webdriver_url = self
            .webdriver_url
            .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string());
        let webdriver_url = parse_http_url("webdriver_url", &webdriver_url)?;

        self.timeouts.validate()?;

        Ok(Settings {
            base_url,
            admin_user,
            admin_password,
            headless: self.headless,
            webdriver_url,
            record_video: self.record_video,
            artifacts_dir: self
                .artifacts_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR)),
            timeouts: self.timeouts,
        })
    }
}

// ============================================================================
// Validation
// ============================================================================

fn required(key: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(Error::config(format!(
            "{key} is required (set it in the config file or via the environment)"
        ))),
    }
}

fn parse_http_url(key: &str, value: &str) -> Result<Url> {
    let url = Url::parse(value)
        .map_err(|e| Error::config(format!("{key} '{value}' is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(format!("{key} must be http or https, got '{value}'")));
    }
    Ok(url)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        base_url = "https://hrm.example.com/"
        admin_user = "Admin"
        admin_password = "admin123"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_minimal_file_uses_defaults() {
        let settings = Settings::from_toml_with_env(MINIMAL, no_env).unwrap();
        assert_eq!(settings.base_url.as_str(), "https://hrm.example.com/");
        assert!(!settings.headless);
        assert!(settings.record_video);
        assert_eq!(settings.webdriver_url.as_str(), "http://localhost:9515/");
        assert_eq!(settings.artifacts_dir, PathBuf::from(DEFAULT_ARTIFACTS_DIR));
        assert_eq!(settings.timeouts, Timeouts::default());
    }

    #[test]
    fn test_env_overrides_credentials() {
        let settings = Settings::from_toml_with_env(MINIMAL, |key| match key {
            ADMIN_USER_ENV => Some("ci-admin".into()),
            ADMIN_PASSWORD_ENV => Some("s3cret".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.admin_user, "ci-admin");
        assert_eq!(settings.admin_password, "s3cret");
    }

    #[test]
    fn test_env_supplies_missing_credentials() {
        let content = r#"base_url = "http://localhost:8080""#;
        let settings = Settings::from_toml_with_env(content, |key| match key {
            ADMIN_USER_ENV => Some("Admin".into()),
            ADMIN_PASSWORD_ENV => Some("pw".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(settings.admin_user, "Admin");
    }

    #[test]
    fn test_missing_password_fails() {
        let content = r#"
            base_url = "http://localhost:8080"
            admin_user = "Admin"
        "#;
        let err = Settings::from_toml_with_env(content, no_env).unwrap_err();
        assert!(err.to_string().contains("admin_password"));
    }

    #[test]
    fn test_missing_base_url_fails() {
        let err = Settings::builder()
            .credentials("Admin", "pw")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_non_http_base_url_fails() {
        let err = Settings::builder()
            .base_url("ftp://hrm.example.com")
            .credentials("Admin", "pw")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_partial_timeouts_table() {
        let content = format!("{MINIMAL}\n[timeouts]\nsearch_ms = 20000\n");
        let settings = Settings::from_toml_with_env(&content, no_env).unwrap();
        assert_eq!(settings.timeouts.search(), Duration::from_secs(20));
        assert_eq!(settings.timeouts.save(), Duration::from_secs(10));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let content = format!("{MINIMAL}\nbase_uri = \"typo\"\n");
        let err = Settings::from_toml_with_env(&content, no_env).unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let timeouts = Timeouts {
            poll_interval_ms: 0,
            ..Timeouts::default()
        };
        let err = Settings::builder()
            .base_url("http://localhost")
            .credentials("Admin", "pw")
            .timeouts(timeouts)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("poll_interval_ms"));
    }

    #[test]
    fn test_from_file_missing_is_io_error() {
        let err = Settings::from_file("/nonexistent/e2e.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
