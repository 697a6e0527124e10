//! Core types for answer resolution.

use serde::{Deserialize, Serialize};

/// Persona mode controlling prompt and template selection.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Patient-facing persona (default).
    #[default]
    Patient,
    /// Clinician-facing persona.
    Doctor,
}

impl Mode {
    /// Get the wire name of the mode.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }

    /// Parse a mode from an optional request parameter.
    ///
    /// Absent or unrecognized values normalize to [`Mode::Patient`];
    /// this never fails.
    #[must_use]
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some(value) if value.eq_ignore_ascii_case("doctor") => Self::Doctor,
            _ => Self::Patient,
        }
    }

    /// System prompt sent to hosted chat-completion providers for this mode.
    #[must_use]
    pub const fn system_prompt(&self) -> &'static str {
        match self {
            Self::Doctor => {
                "You are Cura AI, a helpful assistant for healthcare professionals. Be concise and clinical."
            }
            Self::Patient => {
                "You are Cura AI, a friendly healthcare assistant for patients. Provide clear general guidance and encourage consulting professionals."
            }
        }
    }
}
