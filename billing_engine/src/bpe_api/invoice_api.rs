use std::fmt::Debug;

use log::*;

use crate::{
    helpers::{render_invoice, InvoiceData, InvoiceDocument},
    traits::{InvoiceApiError, InvoiceManagement},
};

/// Generates invoice documents for settled payments, on behalf of the company that was billed.
pub struct InvoiceApi<B> {
    db: B,
}

impl<B: Debug> Debug for InvoiceApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InvoiceApi ({:?})", self.db)
    }
}

impl<B> InvoiceApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> InvoiceApi<B>
where B: InvoiceManagement
{
    /// Render the invoice for `payment_id`, assigning an invoice number on first access.
    ///
    /// The requester's company must be the company the payment was billed to. The access check
    /// happens before the number assignment, so probing someone else's payment never consumes a
    /// number.
    pub async fn generate_invoice(
        &self,
        requester_company_id: &str,
        payment_id: i64,
    ) -> Result<InvoiceDocument, InvoiceApiError> {
        let payment =
            self.db.fetch_payment(payment_id).await?.ok_or(InvoiceApiError::PaymentNotFound(payment_id))?;
        if payment.company_id != requester_company_id {
            warn!(
                "⚠️ Invoice access denied. Payment #{payment_id} was billed to company {}, but company \
                 {requester_company_id} asked for it.",
                payment.company_id
            );
            return Err(InvoiceApiError::AccessDenied);
        }
        let number = match &payment.invoice_number {
            Some(n) => n.clone(),
            None => {
                let n = self.db.assign_invoice_number(payment_id).await?;
                info!("🧾️ Invoice {n} issued for payment #{payment_id}");
                n
            },
        };
        let plan = self
            .db
            .fetch_plan_for_invoice(&payment.plan_id)
            .await?
            .ok_or_else(|| InvoiceApiError::PlanNotFound(payment.plan_id.clone()))?;
        let company = self
            .db
            .fetch_company(&payment.company_id)
            .await?
            .ok_or_else(|| InvoiceApiError::CompanyNotFound(payment.company_id.clone()))?;
        let data = InvoiceData { number, payment, plan_name: plan.name, company };
        Ok(render_invoice(&data))
    }
}
