use sqlx::SqliteConnection;

use crate::traits::InvoiceApiError;

/// Assign the next invoice number to a payment, or return the one it already carries.
///
/// The sequence table issues the number: `INSERT OR IGNORE` claims at most one sequence row per
/// payment, and the guarded `UPDATE` only fills an empty `invoice_number`. Running the whole thing
/// again (including from a concurrent request, serialized by the surrounding transaction) lands on
/// the same number. The claiming insert comes first so the transaction takes the write lock before
/// reading.
pub async fn assign_invoice_number(payment_id: i64, conn: &mut SqliteConnection) -> Result<String, InvoiceApiError> {
    sqlx::query(r#"INSERT OR IGNORE INTO invoice_sequence (payment_id) VALUES ($1)"#)
        .bind(payment_id)
        .execute(&mut *conn)
        .await?;
    let seq: i64 = sqlx::query_scalar(r#"SELECT id FROM invoice_sequence WHERE payment_id = $1"#)
        .bind(payment_id)
        .fetch_one(&mut *conn)
        .await?;
    let number = format!("INV-{seq:06}");
    sqlx::query(
        r#"
        UPDATE payments SET invoice_number = $1, updated_at = CURRENT_TIMESTAMP
        WHERE id = $2 AND invoice_number IS NULL
        "#,
    )
    .bind(&number)
    .bind(payment_id)
    .execute(&mut *conn)
    .await?;
    let assigned: Option<Option<String>> = sqlx::query_scalar(r#"SELECT invoice_number FROM payments WHERE id = $1"#)
        .bind(payment_id)
        .fetch_optional(&mut *conn)
        .await?;
    match assigned {
        Some(Some(number)) => Ok(number),
        Some(None) => {
            Err(InvoiceApiError::DatabaseError(format!("Invoice number for payment {payment_id} was not assigned")))
        },
        None => Err(InvoiceApiError::PaymentNotFound(payment_id)),
    }
}
