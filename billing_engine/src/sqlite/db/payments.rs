use log::*;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewPayment, OrderId, Payment, PaymentConfirmation},
    traits::PaymentFlowError,
};

/// Insert a new pending ledger entry. The unique index on `gateway_order_id` is what enforces one
/// ledger entry per gateway order.
pub async fn insert_pending_payment(
    payment: NewPayment,
    conn: &mut SqliteConnection,
) -> Result<Payment, PaymentFlowError> {
    let result = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (user_id, company_id, plan_id, amount, currency, billing_cycle, gateway_order_id, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'Pending')
        RETURNING *
        "#,
    )
    .bind(&payment.user_id)
    .bind(&payment.company_id)
    .bind(&payment.plan_id)
    .bind(payment.amount)
    .bind(&payment.currency)
    .bind(payment.billing_cycle)
    .bind(&payment.gateway_order_id)
    .fetch_one(conn)
    .await;
    match result {
        Ok(p) => Ok(p),
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => {
            warn!("🗃️ Order {} is already in the ledger", payment.gateway_order_id);
            Err(PaymentFlowError::OrderAlreadyExists(payment.gateway_order_id))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_payment_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as(r#"SELECT * FROM payments WHERE gateway_order_id = $1"#)
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(payment)
}

pub async fn fetch_payment_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as(r#"SELECT * FROM payments WHERE id = $1"#).bind(id).fetch_optional(conn).await?;
    Ok(payment)
}

/// Compare-and-set the entry from pending to success, recording the gateway references. Returns
/// `None` when the entry was not pending anymore, i.e. another confirmation got there first or the
/// order was already closed.
pub async fn mark_payment_success(
    confirmation: &PaymentConfirmation,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as(
        r#"
        UPDATE payments
        SET status = 'Success', gateway_payment_id = $2, gateway_signature = $3, updated_at = CURRENT_TIMESTAMP
        WHERE gateway_order_id = $1 AND status = 'Pending'
        RETURNING *
        "#,
    )
    .bind(&confirmation.order_id)
    .bind(&confirmation.payment_id)
    .bind(&confirmation.signature)
    .fetch_optional(conn)
    .await?;
    Ok(payment)
}

/// Compare-and-set the entry from pending to failed.
pub async fn mark_payment_failed(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Payment>, sqlx::Error> {
    let payment = sqlx::query_as(
        r#"
        UPDATE payments
        SET status = 'Failed', updated_at = CURRENT_TIMESTAMP
        WHERE gateway_order_id = $1 AND status = 'Pending'
        RETURNING *
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    Ok(payment)
}
