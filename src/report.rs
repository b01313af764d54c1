//! Diagnostic attachments and where they go.
//!
//! The harness only needs one capability from a reporting system: publish a
//! named blob for a test and its outcome. [`ArtifactSink`] is that seam.
//!
//! | Sink | Storage |
//! |------|---------|
//! | [`DirectorySink`] | `<root>/<test>/<outcome>/<name>.<ext>` on disk |
//! | [`MemorySink`] | In memory, for tests and embedders |

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::error::Result;

// ============================================================================
// Outcome
// ============================================================================

/// Result of one test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The body completed without error.
    Passed,
    /// The body returned an error or panicked.
    Failed,
}

impl Outcome {
    /// Lowercase name used in paths.
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
        }
    }

    /// Status word used in the test log.
    #[inline]
    #[must_use]
    pub fn status(self) -> &'static str {
        match self {
            Self::Passed => "PASS",
            Self::Failed => "FAIL",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Attachment
// ============================================================================

/// A named diagnostic blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Display name, e.g. "Failure Screenshot".
    pub name: String,
    /// MIME type.
    pub content_type: &'static str,
    /// Raw bytes.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Creates a PNG screenshot attachment.
    #[must_use]
    pub fn png(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: "image/png",
            data,
        }
    }

    /// Creates an animated GIF attachment.
    #[must_use]
    pub fn gif(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: "image/gif",
            data,
        }
    }

    /// Creates a plain-text attachment.
    #[must_use]
    pub fn text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content_type: "text/plain",
            data: text.into().into_bytes(),
        }
    }

    /// File extension for the content type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self.content_type {
            "image/png" => "png",
            "image/gif" => "gif",
            "text/plain" => "txt",
            _ => "bin",
        }
    }

    /// Returns the data as text, if it is valid UTF-8.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

// ============================================================================
// ArtifactSink
// ============================================================================

/// Receives attachments keyed by test name and outcome.
pub trait ArtifactSink: Send + Sync {
    /// Publishes one attachment.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the harness logs and ignores sink errors.
    fn publish(&self, test: &str, outcome: Outcome, attachment: &Attachment) -> Result<()>;
}

// ============================================================================
// DirectorySink
// ============================================================================

/// Writes attachments under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates a sink rooted at `root`. Directories are created on demand.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an attachment is written to.
    #[must_use]
    pub fn path_for(&self, test: &str, outcome: Outcome, attachment: &Attachment) -> PathBuf {
        self.root
            .join(sanitize(test))
            .join(outcome.as_str())
            .join(format!("{}.{}", sanitize(&attachment.name), attachment.extension()))
    }
}

impl ArtifactSink for DirectorySink {
    fn publish(&self, test: &str, outcome: Outcome, attachment: &Attachment) -> Result<()> {
        let path = self.path_for(test, outcome, attachment);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &attachment.data)?;
        debug!(path = %path.display(), bytes = attachment.data.len(), "Attachment written");
        Ok(())
    }
}

/// Replaces anything outside `[A-Za-z0-9._-]` with `_`.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    match cleaned.trim_matches('.') {
        "" => "_".to_string(),
        _ => cleaned,
    }
}

// ============================================================================
// MemorySink
// ============================================================================

/// Keeps attachments in memory, grouped by test name.
#[derive(Debug, Default)]
pub struct MemorySink {
    published: Mutex<FxHashMap<String, Vec<(Outcome, Attachment)>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attachments published for `test`, in publication order.
    #[must_use]
    pub fn attachments(&self, test: &str) -> Vec<(Outcome, Attachment)> {
        self.published.lock().get(test).cloned().unwrap_or_default()
    }

    /// The attachment named `name` for `test`, if any.
    #[must_use]
    pub fn find(&self, test: &str, name: &str) -> Option<(Outcome, Attachment)> {
        self.attachments(test)
            .into_iter()
            .find(|(_, attachment)| attachment.name == name)
    }

    /// Total number of attachments across all tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.published.lock().values().map(Vec::len).sum()
    }

    /// Returns `true` if nothing has been published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn publish(&self, test: &str, outcome: Outcome, attachment: &Attachment) -> Result<()> {
        self.published
            .lock()
            .entry(test.to_string())
            .or_default()
            .push((outcome, attachment.clone()));
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
