//! User-facing notifications for block creation and editing.
//!
//! A pipeline call that fails hands back one [`Diagnostic`] describing the
//! offending label text. Callers decide how to show it: [`TerminalRenderer`]
//! formats it for a console, and every type serializes for JSON consumers.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
