use std::fmt::Debug;

use bpg_common::Money;
use chrono::Utc;
use log::*;

use crate::{
    db_types::{ActivationResult, BillingCycle, NewPayment, Payment, PaymentConfirmation, PaymentStatus, Plan, PlanId},
    helpers::{pricing, CallbackVerifier},
    traits::{BillingDatabase, PaymentFlowError},
};

/// The `PaymentFlowApi` carries a payment from plan selection to an active subscription:
/// quoting the amount due, recording the pending ledger entry for a gateway order, and
/// reconciling the signed completion callback.
pub struct PaymentFlowApi<B> {
    db: B,
    verifier: CallbackVerifier,
}

impl<B: Debug> Debug for PaymentFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentFlowApi ({:?})", self.db)
    }
}

impl<B> PaymentFlowApi<B> {
    pub fn new(db: B, verifier: CallbackVerifier) -> Self {
        Self { db, verifier }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> PaymentFlowApi<B>
where B: BillingDatabase
{
    /// Look up the plan and the amount due for one period of the given billing cycle.
    pub async fn amount_due(&self, plan_id: &PlanId, cycle: BillingCycle) -> Result<(Plan, Money), PaymentFlowError> {
        let plan =
            self.db.fetch_plan(plan_id).await?.ok_or_else(|| PaymentFlowError::PlanNotFound(plan_id.clone()))?;
        let amount = pricing::amount_due(plan.monthly_price, cycle);
        trace!("💰️ Amount due for plan {} ({cycle}): {amount}", plan.id);
        Ok((plan, amount))
    }

    /// Record the pending ledger entry for a gateway order that has just been opened.
    pub async fn open_order(&self, payment: NewPayment) -> Result<Payment, PaymentFlowError> {
        let payment = self.db.insert_pending_payment(payment).await?;
        debug!(
            "💰️ Pending ledger entry #{} recorded for order {} ({} {})",
            payment.id, payment.gateway_order_id, payment.amount, payment.currency
        );
        Ok(payment)
    }

    /// Reconcile a payment confirmation against the ledger.
    ///
    /// The signature is checked before anything else; a mismatch leaves the ledger entry pending
    /// so that a later, correctly signed confirmation can still settle it. A confirmation for an
    /// already settled order is a no-op replay and returns the existing subscription with
    /// `newly_activated = false`.
    pub async fn reconcile(&self, confirmation: PaymentConfirmation) -> Result<ActivationResult, PaymentFlowError> {
        let order_id = confirmation.order_id.clone();
        let payment = self
            .db
            .fetch_payment_by_order_id(&order_id)
            .await?
            .ok_or_else(|| PaymentFlowError::OrderNotFound(order_id.clone()))?;
        let valid = self.verifier.verify(order_id.as_str(), &confirmation.payment_id, &confirmation.signature)?;
        if !valid {
            warn!("⚠️ Signature mismatch for order {order_id}. The ledger entry stays pending.");
            return Err(PaymentFlowError::SignatureMismatch(order_id));
        }
        match payment.status {
            PaymentStatus::Pending => {
                let result = self.db.confirm_payment(&confirmation, Utc::now()).await?;
                if result.newly_activated {
                    info!(
                        "💰️ Order {order_id} settled. Subscription for company {} is active on plan {} until {}",
                        result.subscription.company_id, result.subscription.plan_id, result.subscription.current_period_end
                    );
                }
                Ok(result)
            },
            PaymentStatus::Success => {
                debug!("💰️ Replayed confirmation for settled order {order_id}. No state was changed.");
                let subscription =
                    self.db.fetch_subscription(&payment.company_id).await?.ok_or_else(|| {
                        PaymentFlowError::DatabaseError(format!(
                            "Order {order_id} is settled but company {} has no subscription",
                            payment.company_id
                        ))
                    })?;
                Ok(ActivationResult { payment, subscription, newly_activated: false })
            },
            PaymentStatus::Failed => Err(PaymentFlowError::OrderClosed(order_id)),
        }
    }
}
