use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for opening an order with the gateway.
///
/// `amount` is in currency sub-units (see [`bpg_common::SUBUNITS_PER_UNIT`]). The `receipt` is a
/// merchant-supplied string that is unique per request and acts as the idempotency key on the
/// gateway side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGatewayOrder {
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// The gateway's record of an opened order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    pub status: String,
    // The gateway reports creation time as a unix epoch.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub created_at: Option<DateTime<Utc>>,
}
