//! Notification severity levels ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How loudly a notification should be presented.
///
/// Ordered by declaration, so `Note < Warning < Error`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, e.g. "block updated".
    Note,
    /// Rejected user input; the form stays open for correction.
    Warning,
    /// Input that cannot be used at all, such as a malformed composite file.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
