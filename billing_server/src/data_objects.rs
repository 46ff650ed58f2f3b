use billing_engine::db_types::BillingCycle;
use bpg_common::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub plan_id: String,
    pub billing_cycle: BillingCycle,
    pub company_id: String,
}

/// Everything the client needs to hand to the gateway checkout: the order id, the exact amount
/// that was persisted, and the public key id of the gateway account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResult {
    pub order_id: String,
    pub amount: Money,
    pub currency: String,
    pub key_id: String,
}

/// The confirmation payload the client relays from the gateway. Clients also echo the plan and
/// company they believe the order was for; the ledger entry is authoritative and the echoes are
/// ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    #[serde(default)]
    pub company_id: Option<String>,
    #[serde(default)]
    pub plan_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResult {
    pub success: bool,
    pub order_id: String,
    pub newly_activated: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceQuery {
    pub payment_id: i64,
}
