//! Contract, charge and payment vocabulary.
//!
//! Monetary amounts are integer cents throughout (`Cents` in `types`),
//! never floats.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Contract statuses
// ---------------------------------------------------------------------------

pub const CONTRACT_DRAFT: &str = "draft";
pub const CONTRACT_SENT: &str = "sent";
pub const CONTRACT_SIGNED: &str = "signed";
pub const CONTRACT_ACTIVE: &str = "active";
pub const CONTRACT_COMPLETED: &str = "completed";
pub const CONTRACT_CANCELLED: &str = "cancelled";

/// All valid contract statuses.
pub const VALID_CONTRACT_STATUSES: &[&str] = &[
    CONTRACT_DRAFT,
    CONTRACT_SENT,
    CONTRACT_SIGNED,
    CONTRACT_ACTIVE,
    CONTRACT_COMPLETED,
    CONTRACT_CANCELLED,
];

/// Contract lifecycle status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractStatus {
    Draft,
    Sent,
    Signed,
    Active,
    Completed,
    Cancelled,
}

impl ContractStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => CONTRACT_DRAFT,
            Self::Sent => CONTRACT_SENT,
            Self::Signed => CONTRACT_SIGNED,
            Self::Active => CONTRACT_ACTIVE,
            Self::Completed => CONTRACT_COMPLETED,
            Self::Cancelled => CONTRACT_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            CONTRACT_DRAFT => Ok(Self::Draft),
            CONTRACT_SENT => Ok(Self::Sent),
            CONTRACT_SIGNED => Ok(Self::Signed),
            CONTRACT_ACTIVE => Ok(Self::Active),
            CONTRACT_COMPLETED => Ok(Self::Completed),
            CONTRACT_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown contract status: '{other}'. Valid statuses: {}",
                VALID_CONTRACT_STATUSES.join(", ")
            ))),
        }
    }

    /// Returns the set of statuses reachable from `self`.
    pub fn valid_transitions(self) -> &'static [ContractStatus] {
        match self {
            Self::Draft => &[Self::Sent, Self::Cancelled],
            Self::Sent => &[Self::Signed, Self::Cancelled],
            Self::Signed => &[Self::Active, Self::Cancelled],
            Self::Active => &[Self::Completed, Self::Cancelled],
            Self::Completed | Self::Cancelled => &[],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: ContractStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// Validate a transition, returning a descriptive error for invalid ones.
    pub fn validate_transition(self, to: ContractStatus) -> Result<(), CoreError> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Invalid contract transition: {} -> {}",
                self.as_str(),
                to.as_str()
            )))
        }
    }
}

// ---------------------------------------------------------------------------
// Charge statuses
// ---------------------------------------------------------------------------

pub const CHARGE_PENDING: &str = "pending";
pub const CHARGE_PAID: &str = "paid";
pub const CHARGE_OVERDUE: &str = "overdue";
pub const CHARGE_CANCELLED: &str = "cancelled";

/// All valid charge statuses.
pub const VALID_CHARGE_STATUSES: &[&str] =
    &[CHARGE_PENDING, CHARGE_PAID, CHARGE_OVERDUE, CHARGE_CANCELLED];

/// Charge lifecycle status with string conversion.
///
/// `paid` is set automatically when recorded payments cover the charge
/// amount; `overdue` is set by the due-date sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStatus {
    Pending,
    Paid,
    Overdue,
    Cancelled,
}

impl ChargeStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => CHARGE_PENDING,
            Self::Paid => CHARGE_PAID,
            Self::Overdue => CHARGE_OVERDUE,
            Self::Cancelled => CHARGE_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            CHARGE_PENDING => Ok(Self::Pending),
            CHARGE_PAID => Ok(Self::Paid),
            CHARGE_OVERDUE => Ok(Self::Overdue),
            CHARGE_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown charge status: '{other}'. Valid statuses: {}",
                VALID_CHARGE_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether the charge can still accept payments.
    pub fn accepts_payments(self) -> bool {
        matches!(self, Self::Pending | Self::Overdue)
    }
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

pub const METHOD_CASH: &str = "cash";
pub const METHOD_CARD: &str = "card";
pub const METHOD_BANK_TRANSFER: &str = "bank_transfer";
pub const METHOD_OTHER: &str = "other";

/// All valid payment methods.
pub const VALID_PAYMENT_METHODS: &[&str] =
    &[METHOD_CASH, METHOD_CARD, METHOD_BANK_TRANSFER, METHOD_OTHER];

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => METHOD_CASH,
            Self::Card => METHOD_CARD,
            Self::BankTransfer => METHOD_BANK_TRANSFER,
            Self::Other => METHOD_OTHER,
        }
    }

    /// Parse from a string, returning an error for unknown methods.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            METHOD_CASH => Ok(Self::Cash),
            METHOD_CARD => Ok(Self::Card),
            METHOD_BANK_TRANSFER => Ok(Self::BankTransfer),
            METHOD_OTHER => Ok(Self::Other),
            other => Err(CoreError::Validation(format!(
                "Unknown payment method: '{other}'. Valid methods: {}",
                VALID_PAYMENT_METHODS.join(", ")
            ))),
        }
    }
}
