//! Seam for translating user-visible strings.

/// Translates text shown on blocks (read-only notes, composite tooltips).
pub trait Localizer {
    /// Returns the translation of `text`, or `text` itself.
    fn translate(&self, text: &str) -> String;
}

/// Returns every string unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Passthrough;

impl Localizer for Passthrough {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}
