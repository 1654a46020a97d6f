//! Payment entity model and DTOs.

use atrio_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::charge::Charge;

/// A payment row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub charge_id: DbId,
    /// Amount paid in integer cents.
    pub amount_cents: Cents,
    /// `"cash"`, `"card"`, `"bank_transfer"` or `"other"`.
    pub method: String,
    pub paid_at: Timestamp,
    /// External reference (receipt or transfer number).
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a payment against a charge.
#[derive(Debug, Deserialize)]
pub struct RecordPayment {
    pub amount_cents: Cents,
    pub method: String,
    /// Defaults to now when omitted.
    pub paid_at: Option<Timestamp>,
    pub reference: Option<String>,
    pub notes: Option<String>,
}

/// A recorded payment together with the charge in its post-payment state.
#[derive(Debug, Serialize)]
pub struct RecordedPayment {
    pub payment: Payment,
    pub charge: Charge,
}

/// Outcome of a payment attempt.
#[derive(Debug)]
pub enum PaymentOutcome {
    /// The payment was recorded; the charge may have flipped to `paid`.
    Recorded(Box<RecordedPayment>),
    /// No charge with the given id exists.
    ChargeNotFound,
    /// The charge is `paid` or `cancelled` and accepts no further payments.
    NotPayable { status: String },
}
