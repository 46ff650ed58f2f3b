//! `SqliteDatabase` is a concrete implementation of a billing engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::db::{companies, db_url, invoices, new_pool, payments, plans, subscriptions};
use crate::{
    db_types::{
        ActivationResult,
        Company,
        NewPayment,
        OrderId,
        Payment,
        PaymentConfirmation,
        PaymentStatus,
        Plan,
        PlanId,
        Subscription,
    },
    traits::{BillingDatabase, InvoiceApiError, InvoiceManagement, PaymentFlowError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl BillingDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_plan(&self, plan_id: &PlanId) -> Result<Option<Plan>, PaymentFlowError> {
        let mut conn = self.pool.acquire().await?;
        let plan = plans::fetch_plan(plan_id, &mut conn).await?;
        Ok(plan)
    }

    async fn insert_pending_payment(&self, payment: NewPayment) -> Result<Payment, PaymentFlowError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::insert_pending_payment(payment, &mut conn).await?;
        debug!("🗃️ Ledger entry #{} saved for order {}", payment.id, payment.gateway_order_id);
        Ok(payment)
    }

    async fn fetch_payment_by_order_id(&self, order_id: &OrderId) -> Result<Option<Payment>, PaymentFlowError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::fetch_payment_by_order_id(order_id, &mut conn).await?;
        Ok(payment)
    }

    /// Settles a payment and activates the subscription in a single atomic transaction,
    /// * `mark_payment_success` moves the entry from pending to success. If the entry is no longer
    ///   pending, nothing is written and the settled entry decides the outcome.
    /// * the company's subscription row is created or replaced for the new billing period.
    async fn confirm_payment(
        &self,
        confirmation: &PaymentConfirmation,
        activated_at: DateTime<Utc>,
    ) -> Result<ActivationResult, PaymentFlowError> {
        let order_id = &confirmation.order_id;
        let mut tx = self.pool.begin().await?;
        match payments::mark_payment_success(confirmation, &mut tx).await? {
            Some(payment) => {
                let period_end = payment.billing_cycle.period_end(activated_at);
                let subscription = subscriptions::upsert_subscription(
                    &payment.company_id,
                    &payment.plan_id,
                    activated_at,
                    period_end,
                    &mut tx,
                )
                .await?;
                tx.commit().await?;
                debug!(
                    "🗃️ Order {order_id} settled; subscription for company {} runs until {period_end}",
                    payment.company_id
                );
                Ok(ActivationResult { payment, subscription, newly_activated: true })
            },
            None => {
                let payment = payments::fetch_payment_by_order_id(order_id, &mut tx)
                    .await?
                    .ok_or_else(|| PaymentFlowError::OrderNotFound(order_id.clone()))?;
                tx.commit().await?;
                match payment.status {
                    PaymentStatus::Success => {
                        debug!("🗃️ Order {order_id} was already settled. Returning the existing subscription.");
                        let subscription =
                            self.fetch_subscription(&payment.company_id).await?.ok_or_else(|| {
                                PaymentFlowError::DatabaseError(format!(
                                    "Order {order_id} is settled but company {} has no subscription",
                                    payment.company_id
                                ))
                            })?;
                        Ok(ActivationResult { payment, subscription, newly_activated: false })
                    },
                    PaymentStatus::Failed => Err(PaymentFlowError::OrderClosed(order_id.clone())),
                    PaymentStatus::Pending => Err(PaymentFlowError::PaymentStatusUpdateError(format!(
                        "Order {order_id} reports pending after a failed compare-and-set"
                    ))),
                }
            },
        }
    }

    async fn fail_payment(&self, order_id: &OrderId) -> Result<Payment, PaymentFlowError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::mark_payment_failed(order_id, &mut conn).await?.ok_or_else(|| {
            PaymentFlowError::PaymentStatusUpdateError(format!("Order {order_id} is not pending, so it cannot fail"))
        })?;
        info!("🗃️ Order {order_id} closed as failed");
        Ok(payment)
    }

    async fn fetch_subscription(&self, company_id: &str) -> Result<Option<Subscription>, PaymentFlowError> {
        let mut conn = self.pool.acquire().await?;
        let subscription = subscriptions::fetch_subscription(company_id, &mut conn).await?;
        Ok(subscription)
    }
}

impl InvoiceManagement for SqliteDatabase {
    async fn fetch_payment(&self, payment_id: i64) -> Result<Option<Payment>, InvoiceApiError> {
        let mut conn = self.pool.acquire().await?;
        let payment = payments::fetch_payment_by_id(payment_id, &mut conn).await?;
        Ok(payment)
    }

    async fn fetch_plan_for_invoice(&self, plan_id: &PlanId) -> Result<Option<Plan>, InvoiceApiError> {
        let mut conn = self.pool.acquire().await?;
        let plan = plans::fetch_plan(plan_id, &mut conn).await?;
        Ok(plan)
    }

    async fn fetch_company(&self, company_id: &str) -> Result<Option<Company>, InvoiceApiError> {
        let mut conn = self.pool.acquire().await?;
        let company = companies::fetch_company(company_id, &mut conn).await?;
        Ok(company)
    }

    async fn assign_invoice_number(&self, payment_id: i64) -> Result<String, InvoiceApiError> {
        let mut tx = self.pool.begin().await.map_err(|e| InvoiceApiError::DatabaseError(e.to_string()))?;
        let number = invoices::assign_invoice_number(payment_id, &mut tx).await?;
        tx.commit().await.map_err(|e| InvoiceApiError::DatabaseError(e.to_string()))?;
        debug!("🗃️ Payment #{payment_id} carries invoice number {number}");
        Ok(number)
    }
}
