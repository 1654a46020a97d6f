//! Client status vocabulary.
//!
//! Unlike leads and contracts, clients move freely between statuses;
//! there is no transition table. Clients are never hard-deleted, so
//! `archived` is the strongest form of removal.

use crate::error::CoreError;

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
pub const STATUS_ARCHIVED: &str = "archived";

/// All valid client statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_INACTIVE, STATUS_ARCHIVED];

/// Client status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    Active,
    Inactive,
    Archived,
}

impl ClientStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Inactive => STATUS_INACTIVE,
            Self::Archived => STATUS_ARCHIVED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_INACTIVE => Ok(Self::Inactive),
            STATUS_ARCHIVED => Ok(Self::Archived),
            other => Err(CoreError::Validation(format!(
                "Unknown client status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}
