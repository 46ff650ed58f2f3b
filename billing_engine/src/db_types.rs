//! Definitions of the core data types used in the billing engine.

use std::fmt::{Display, Formatter};

use bpg_common::Money;
use chrono::{DateTime, Months, Utc};
use log::*;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

//--------------------------------------     PlanId       ---------------------------------------------------------

/// Identifier of a plan in the catalog, e.g. `starter` or `pro`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for PlanId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PlanId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for PlanId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------     OrderId       --------------------------------------------------------

/// The gateway-assigned order identifier. It is the correlation key between the ledger, the
/// gateway and the signed completion callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//--------------------------------------    BillingCycle   --------------------------------------------------------

/// How often a subscription renews. Stored and serialized in lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

impl BillingCycle {
    /// The end of a billing period that starts at `start`, using calendar months rather than a
    /// fixed number of days.
    pub fn period_end(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Self::Monthly => Months::new(1),
            Self::Yearly => Months::new(12),
        };
        start + months
    }
}

impl Display for BillingCycle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "monthly"),
            Self::Yearly => write!(f, "yearly"),
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            s => Err(ConversionError(format!("Invalid billing cycle: {s}"))),
        }
    }
}

impl From<String> for BillingCycle {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|e| {
            error!("Illegal billing cycle [{value}] in the database. {e} Defaulting to monthly. This is a bug.");
            Self::Monthly
        })
    }
}

//--------------------------------------   PaymentStatus   --------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Success => write!(f, "Success"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Success" => Ok(Self::Success),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

//------------------------------------  SubscriptionStatus  -------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl Display for SubscriptionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

//--------------------------------------       Plan        --------------------------------------------------------

/// An entry in the plan catalog. Prices are stored as the monthly rate; the yearly rate is always
/// derived (see [`crate::helpers::pricing`]).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub monthly_price: Money,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Company      --------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub billing_address: Option<String>,
    pub tax_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Payment      --------------------------------------------------------

/// One row of the payment ledger. A row is created as `Pending` when the gateway order is opened
/// and is moved to `Success` or `Failed` exactly once.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub user_id: String,
    pub company_id: String,
    pub plan_id: PlanId,
    pub amount: Money,
    pub currency: String,
    // Decoded through `From<String>` so an unrecognized stored cycle degrades to monthly
    // instead of failing the whole fetch.
    #[sqlx(try_from = "String")]
    pub billing_cycle: BillingCycle,
    pub gateway_order_id: OrderId,
    pub gateway_payment_id: Option<String>,
    pub gateway_signature: Option<String>,
    pub status: PaymentStatus,
    pub invoice_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The fields of a ledger entry the caller supplies. Everything else (id, status, timestamps) is
/// assigned by the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayment {
    pub user_id: String,
    pub company_id: String,
    pub plan_id: PlanId,
    pub amount: Money,
    pub currency: String,
    pub billing_cycle: BillingCycle,
    pub gateway_order_id: OrderId,
}

//--------------------------------   PaymentConfirmation   --------------------------------------------------------

/// What the client relays from the gateway after completing a payment. The signature covers
/// `order_id|payment_id` and is verified before any state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub order_id: OrderId,
    pub payment_id: String,
    pub signature: String,
}

//--------------------------------------   Subscription    --------------------------------------------------------

/// The current subscription of a company. There is at most one row per company; a successful
/// payment replaces the plan and period in place.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Subscription {
    pub company_id: String,
    pub plan_id: PlanId,
    pub status: SubscriptionStatus,
    pub current_period_start: DateTime<Utc>,
    pub current_period_end: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------  ActivationResult --------------------------------------------------------

/// The outcome of reconciling a payment confirmation. `newly_activated` is false when the
/// confirmation was a replay of an already-settled order.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationResult {
    pub payment: Payment,
    pub subscription: Subscription,
    pub newly_activated: bool,
}
