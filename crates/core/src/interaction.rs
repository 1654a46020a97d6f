//! Interaction subject and kind vocabulary.
//!
//! Interactions attach to either a lead or a client via a
//! `(subject_type, subject_id)` pair. When a lead is converted the
//! workflow re-points its interactions at the new client so the contact
//! history follows the person.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Subject types
// ---------------------------------------------------------------------------

pub const SUBJECT_LEAD: &str = "lead";
pub const SUBJECT_CLIENT: &str = "client";

/// All valid interaction subject types.
pub const VALID_SUBJECT_TYPES: &[&str] = &[SUBJECT_LEAD, SUBJECT_CLIENT];

/// Which entity an interaction is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectType {
    Lead,
    Client,
}

impl SubjectType {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => SUBJECT_LEAD,
            Self::Client => SUBJECT_CLIENT,
        }
    }

    /// Parse from a string, returning an error for unknown subject types.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            SUBJECT_LEAD => Ok(Self::Lead),
            SUBJECT_CLIENT => Ok(Self::Client),
            other => Err(CoreError::Validation(format!(
                "Unknown interaction subject type: '{other}'. Valid types: {}",
                VALID_SUBJECT_TYPES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Interaction kinds
// ---------------------------------------------------------------------------

pub const KIND_CALL: &str = "call";
pub const KIND_EMAIL: &str = "email";
pub const KIND_MEETING: &str = "meeting";
pub const KIND_NOTE: &str = "note";

/// All valid interaction kinds.
pub const VALID_KINDS: &[&str] = &[KIND_CALL, KIND_EMAIL, KIND_MEETING, KIND_NOTE];

/// What kind of contact an interaction records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Call,
    Email,
    Meeting,
    Note,
}

impl InteractionKind {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Call => KIND_CALL,
            Self::Email => KIND_EMAIL,
            Self::Meeting => KIND_MEETING,
            Self::Note => KIND_NOTE,
        }
    }

    /// Parse from a string, returning an error for unknown kinds.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            KIND_CALL => Ok(Self::Call),
            KIND_EMAIL => Ok(Self::Email),
            KIND_MEETING => Ok(Self::Meeting),
            KIND_NOTE => Ok(Self::Note),
            other => Err(CoreError::Validation(format!(
                "Unknown interaction kind: '{other}'. Valid kinds: {}",
                VALID_KINDS.join(", ")
            ))),
        }
    }
}
