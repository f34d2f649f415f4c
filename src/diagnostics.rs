// Two-severity diagnostics: fatal rejections and accumulated warnings

use serde::Serialize;
use thiserror::Error;

/// Fatal parse outcome. A rejection aborts the whole parse before any
/// record parsing and surfaces a single human-readable reason; everything
/// else is a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// A recognized top-level section never appeared.
    #[error("Section \"{name}\" missing")]
    MissingSection { name: String },

    /// The Save section has no Entities key.
    #[error("Section \"Save\" missing entities")]
    SaveMissingEntities,

    /// The Save section has no Constraints key.
    #[error("Section \"Save\" missing constraints")]
    SaveMissingConstraints,
}

/// Ordered warning accumulator. Order is discovery order and is part of the
/// contract handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Append another batch, prefixing each entry. Used to scope section and
    /// save-key warnings to their origin.
    pub fn extend_prefixed(&mut self, prefix: &str, warnings: Warnings) {
        self.0
            .extend(warnings.0.into_iter().map(|w| format!("{prefix}{w}")));
    }

    pub fn extend(&mut self, warnings: Warnings) {
        self.0.extend(warnings.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Warnings> for Vec<String> {
    fn from(w: Warnings) -> Self {
        w.0
    }
}
