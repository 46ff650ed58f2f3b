use thiserror::Error;

use crate::db_types::{Company, Payment, Plan, PlanId};

#[derive(Debug, Clone, Error)]
pub enum InvoiceApiError {
    #[error("We have an internal database engine error: {0}")]
    DatabaseError(String),
    #[error("The payment {0} does not exist")]
    PaymentNotFound(i64),
    #[error("Invoices may only be retrieved by the company that was billed")]
    AccessDenied,
    #[error("The company {0} referenced by the payment does not exist")]
    CompanyNotFound(String),
    #[error("The plan {0} referenced by the payment does not exist")]
    PlanNotFound(PlanId),
}

impl From<sqlx::Error> for InvoiceApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

/// The storage operations behind invoice generation.
#[allow(async_fn_in_trait)]
pub trait InvoiceManagement: Clone {
    async fn fetch_payment(&self, payment_id: i64) -> Result<Option<Payment>, InvoiceApiError>;

    async fn fetch_plan_for_invoice(&self, plan_id: &PlanId) -> Result<Option<Plan>, InvoiceApiError>;

    async fn fetch_company(&self, company_id: &str) -> Result<Option<Company>, InvoiceApiError>;

    /// Assign the next invoice number to the payment, or return the one it already has.
    ///
    /// Numbers are issued from a monotone sequence on first assignment. Assigning twice, including
    /// from concurrent requests, yields the same number.
    async fn assign_invoice_number(&self, payment_id: i64) -> Result<String, InvoiceApiError>;
}
