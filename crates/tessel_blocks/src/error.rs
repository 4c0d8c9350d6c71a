//! Validation errors raised by the block pipeline.

use tessel_diagnostics::{Category, Diagnostic, DiagnosticCode, Severity};

/// Result alias used throughout the block pipeline.
pub type BlockResult<T> = Result<T, BlockError>;

/// Everything that can stop a label from becoming a block.
///
/// All variants are recoverable: nothing has been committed when one is
/// returned, and each carries the raw text needed to point the user at the
/// problem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlockError {
    /// The name part of a label is empty or contains illegal characters.
    #[error("invalid identifier in label '{text}'")]
    InvalidIdentifier {
        /// The label as typed.
        text: String,
    },

    /// The bracket part of a label is malformed.
    #[error("invalid bit range in label '{text}'")]
    InvalidRange {
        /// The label as typed.
        text: String,
    },

    /// Two ports or parameters of one block share a name.
    #[error("duplicated block attribute '{name}'")]
    DuplicateName {
        /// The repeated name.
        name: String,
    },

    /// A code block declares no input and no output port.
    #[error("code block needs at least one input or one output")]
    InsufficientPorts,

    /// A composite source lacks the nested lists needed to infer its ports.
    #[error("wrong block format '{kind}': missing {missing}")]
    MalformedComposite {
        /// The composite's type name.
        kind: String,
        /// The missing section, e.g. `design.graph.wires`.
        missing: &'static str,
    },

    /// A clock label also declares a multi-bit range.
    #[error("clock not allowed for data bus '{text}'")]
    ClockRangeConflict {
        /// The label as typed.
        text: String,
    },

    /// An edit was requested for a block of a different kind.
    #[error("cannot apply {expected} edit to block of type '{found}'")]
    WrongKind {
        /// The kind the edit operation handles.
        expected: &'static str,
        /// The type name of the block that was passed in.
        found: String,
    },
}

impl BlockError {
    /// The stable diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            BlockError::InvalidIdentifier { .. } => DiagnosticCode::new(Category::Label, 101),
            BlockError::InvalidRange { .. } => DiagnosticCode::new(Category::Label, 102),
            BlockError::ClockRangeConflict { .. } => DiagnosticCode::new(Category::Label, 103),
            BlockError::DuplicateName { .. } => DiagnosticCode::new(Category::Block, 201),
            BlockError::InsufficientPorts => DiagnosticCode::new(Category::Block, 202),
            BlockError::WrongKind { .. } => DiagnosticCode::new(Category::Block, 203),
            BlockError::MalformedComposite { .. } => DiagnosticCode::new(Category::Composite, 301),
        }
    }

    /// Input the user can fix is a warning; unusable source data is an error.
    pub fn severity(&self) -> Severity {
        match self {
            BlockError::MalformedComposite { .. } | BlockError::WrongKind { .. } => {
                Severity::Error
            }
            _ => Severity::Warning,
        }
    }

    /// The offending raw text or name, if the error has one.
    pub fn subject(&self) -> Option<&str> {
        match self {
            BlockError::InvalidIdentifier { text }
            | BlockError::InvalidRange { text }
            | BlockError::ClockRangeConflict { text } => Some(text),
            BlockError::DuplicateName { name } => Some(name),
            BlockError::MalformedComposite { kind, .. } => Some(kind),
            BlockError::WrongKind { found, .. } => Some(found),
            BlockError::InsufficientPorts => None,
        }
    }

    /// Converts this error into a notification for display.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::new(self.severity(), self.code(), self.to_string());
        if let Some(subject) = self.subject() {
            diag = diag.with_subject(subject);
        }
        match self {
            BlockError::InvalidIdentifier { .. } => diag.with_help(
                "names start with a letter or '_' and contain only letters, digits and '_'",
            ),
            BlockError::InvalidRange { .. } => {
                diag.with_help("ranges are written as [hi:lo] or [idx] with non-negative indices")
            }
            BlockError::ClockRangeConflict { .. } => {
                diag.with_help("clock ports must be a single bit")
            }
            BlockError::DuplicateName { .. } => {
                diag.with_note("input, output and parameter names share one namespace")
            }
            BlockError::InsufficientPorts => {
                diag.with_help("declare at least one input or one output port")
            }
            BlockError::MalformedComposite { missing, .. } => {
                diag.with_note(format!("'{missing}' is required to infer the block's ports"))
            }
            BlockError::WrongKind { .. } => diag,
        }
    }
}
