//! Lead pipeline statuses and the allowed transitions between them.
//!
//! `converted` is terminal and is never a valid transition target here:
//! it is set only by the conversion workflow, which promotes a lead to a
//! client inside one transaction.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_NEW: &str = "new";
pub const STATUS_CONTACTED: &str = "contacted";
pub const STATUS_QUALIFIED: &str = "qualified";
pub const STATUS_PROPOSAL: &str = "proposal";
pub const STATUS_NEGOTIATION: &str = "negotiation";
pub const STATUS_WON: &str = "won";
pub const STATUS_LOST: &str = "lost";
pub const STATUS_CONVERTED: &str = "converted";

/// All valid lead statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_NEW,
    STATUS_CONTACTED,
    STATUS_QUALIFIED,
    STATUS_PROPOSAL,
    STATUS_NEGOTIATION,
    STATUS_WON,
    STATUS_LOST,
    STATUS_CONVERTED,
];

// ---------------------------------------------------------------------------
// Status enum
// ---------------------------------------------------------------------------

/// Lead pipeline status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
    Converted,
}

impl LeadStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => STATUS_NEW,
            Self::Contacted => STATUS_CONTACTED,
            Self::Qualified => STATUS_QUALIFIED,
            Self::Proposal => STATUS_PROPOSAL,
            Self::Negotiation => STATUS_NEGOTIATION,
            Self::Won => STATUS_WON,
            Self::Lost => STATUS_LOST,
            Self::Converted => STATUS_CONVERTED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_NEW => Ok(Self::New),
            STATUS_CONTACTED => Ok(Self::Contacted),
            STATUS_QUALIFIED => Ok(Self::Qualified),
            STATUS_PROPOSAL => Ok(Self::Proposal),
            STATUS_NEGOTIATION => Ok(Self::Negotiation),
            STATUS_WON => Ok(Self::Won),
            STATUS_LOST => Ok(Self::Lost),
            STATUS_CONVERTED => Ok(Self::Converted),
            other => Err(CoreError::Validation(format!(
                "Unknown lead status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }

    /// Returns the set of statuses reachable from `self` via a plain
    /// status update. `lost` leads may be revived back to `contacted`.
    pub fn valid_transitions(self) -> &'static [LeadStatus] {
        match self {
            Self::New => &[Self::Contacted, Self::Qualified, Self::Lost],
            Self::Contacted => &[Self::Qualified, Self::Proposal, Self::Lost],
            Self::Qualified => &[Self::Proposal, Self::Negotiation, Self::Lost],
            Self::Proposal => &[Self::Negotiation, Self::Won, Self::Lost],
            Self::Negotiation => &[Self::Won, Self::Lost],
            Self::Lost => &[Self::Contacted],
            Self::Won | Self::Converted => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: LeadStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning a descriptive error for invalid ones.
    pub fn validate_transition(self, to: LeadStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid lead transition: {} -> {}",
                self.as_str(),
                to.as_str()
            )))
        }
    }
}
