//! Repository for the `payments` table.

use atrio_core::billing::{ChargeStatus, CHARGE_PAID};
use atrio_core::types::DbId;
use sqlx::PgPool;

use crate::models::charge::Charge;
use crate::models::payment::{Payment, PaymentOutcome, RecordPayment, RecordedPayment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, charge_id, amount_cents, method, paid_at, \
                        reference, notes, created_at, updated_at";

/// Column list for the charge row returned alongside a payment.
const CHARGE_COLUMNS: &str = "id, client_id, contract_id, description, amount_cents, \
                               due_on, status, created_at, updated_at";

/// Provides payment recording and lookup.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Record a payment against a charge inside a single transaction.
    ///
    /// The charge row is locked with `FOR UPDATE` first; charges that no
    /// longer accept payments (`paid`, `cancelled`) reject it. After the
    /// insert the sum of all payments is compared against the charge
    /// amount and the charge flips to `paid` once covered.
    pub async fn record(
        pool: &PgPool,
        charge_id: DbId,
        input: &RecordPayment,
    ) -> Result<PaymentOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let lock_query = format!("SELECT {CHARGE_COLUMNS} FROM charges WHERE id = $1 FOR UPDATE");
        let Some(charge) = sqlx::query_as::<_, Charge>(&lock_query)
            .bind(charge_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(PaymentOutcome::ChargeNotFound);
        };

        let payable = ChargeStatus::parse(&charge.status)
            .map(ChargeStatus::accepts_payments)
            .unwrap_or(false);
        if !payable {
            return Ok(PaymentOutcome::NotPayable {
                status: charge.status,
            });
        }

        let insert_query = format!(
            "INSERT INTO payments (charge_id, amount_cents, method, paid_at, reference, notes)
             VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6)
             RETURNING {COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&insert_query)
            .bind(charge_id)
            .bind(input.amount_cents)
            .bind(&input.method)
            .bind(input.paid_at)
            .bind(&input.reference)
            .bind(&input.notes)
            .fetch_one(&mut *tx)
            .await?;

        let paid_total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments WHERE charge_id = $1",
        )
        .bind(charge_id)
        .fetch_one(&mut *tx)
        .await?;

        let charge = if paid_total >= charge.amount_cents {
            let update_query =
                format!("UPDATE charges SET status = $2 WHERE id = $1 RETURNING {CHARGE_COLUMNS}");
            sqlx::query_as::<_, Charge>(&update_query)
                .bind(charge_id)
                .bind(CHARGE_PAID)
                .fetch_one(&mut *tx)
                .await?
        } else {
            charge
        };

        tx.commit().await?;

        Ok(PaymentOutcome::Recorded(Box::new(RecordedPayment {
            payment,
            charge,
        })))
    }

    /// List all payments for a charge, oldest first.
    pub async fn list_for_charge(
        pool: &PgPool,
        charge_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments WHERE charge_id = $1 ORDER BY paid_at ASC, id ASC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(charge_id)
            .fetch_all(pool)
            .await
    }
}
