use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{
    db_types::{ActivationResult, NewPayment, OrderId, Payment, PaymentConfirmation, Plan, PlanId, Subscription},
    helpers::SignatureError,
};

#[derive(Debug, Clone, Error)]
pub enum PaymentFlowError {
    #[error("We have an internal database engine error: {0}")]
    DatabaseError(String),
    #[error("The plan {0} does not exist")]
    PlanNotFound(PlanId),
    #[error("Cannot insert order {0}, since it already exists in the ledger")]
    OrderAlreadyExists(OrderId),
    #[error("The order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The signature for order {0} does not match the payment")]
    SignatureMismatch(OrderId),
    #[error("Order {0} has already been closed as failed")]
    OrderClosed(OrderId),
    #[error("Illegal payment status change. {0}")]
    PaymentStatusUpdateError(String),
    #[error("Invalid payment confirmation. {0}")]
    InvalidInput(String),
}

impl From<sqlx::Error> for PaymentFlowError {
    fn from(e: sqlx::Error) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

impl From<SignatureError> for PaymentFlowError {
    fn from(e: SignatureError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// The primary backend trait of the billing engine. It owns the plan catalog, the payment ledger
/// and the subscription table, and guarantees that a ledger entry settles exactly once.
#[allow(async_fn_in_trait)]
pub trait BillingDatabase: Clone {
    /// The URL of the database backing this instance.
    fn url(&self) -> &str;

    async fn fetch_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, PaymentFlowError>;

    /// Record a new pending ledger entry for a freshly opened gateway order.
    ///
    /// Fails with [`PaymentFlowError::OrderAlreadyExists`] if an entry for the same gateway order
    /// id is already present.
    async fn insert_pending_payment(&self, payment: NewPayment) -> Result<Payment, PaymentFlowError>;

    async fn fetch_payment_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, PaymentFlowError>;

    /// Settle a pending ledger entry as successful and activate the subscription it pays for, in
    /// one atomic step.
    ///
    /// The status transition is a compare-and-set on the pending status, so two concurrent
    /// confirmations of the same order settle it exactly once; the loser observes the settled
    /// entry and reports `newly_activated = false`. The subscription period starts at
    /// `activated_at` and runs for the entry's billing cycle, replacing any previous subscription
    /// of the company.
    async fn confirm_payment(
        &self,
        confirmation: &PaymentConfirmation,
        activated_at: DateTime<Utc>,
    ) -> Result<ActivationResult, PaymentFlowError>;

    /// Close a pending ledger entry as failed. The subscription table is not touched.
    async fn fail_payment(&self, order_id: &OrderId) -> Result<Payment, PaymentFlowError>;

    async fn fetch_subscription(&self, company_id: &str) -> Result<Option<Subscription>, PaymentFlowError>;

    async fn close(&mut self) -> Result<(), PaymentFlowError> {
        Ok(())
    }
}
