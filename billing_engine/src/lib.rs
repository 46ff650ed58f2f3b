//! # Billing engine
//!
//! The engine owns the payment ledger and everything that hangs off it: plan pricing, callback
//! signature verification, the pending → success/failed state machine, subscription activation and
//! invoice generation. It knows nothing about HTTP; the server crate drives it through the
//! [`PaymentFlowApi`] and [`InvoiceApi`] facades, which in turn are generic over the storage
//! traits in [`traits`].
//!
//! ## Architecture
//!
//! ```text
//!    PaymentFlowApi / InvoiceApi      (use-case orchestration, backend-agnostic)
//!              │
//!    BillingDatabase / InvoiceManagement   (storage traits)
//!              │
//!        SqliteDatabase                (sqlite implementation, one facade over the pool)
//! ```
//!
//! The sqlite implementation keeps all SQL in free functions over `&mut SqliteConnection` so that
//! multi-step operations (payment confirmation, invoice numbering) can share a single transaction.

mod bpe_api;
pub mod db_types;
pub mod helpers;
#[cfg(feature = "sqlite")]
mod sqlite;
pub mod traits;

pub use bpe_api::{InvoiceApi, PaymentFlowApi};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
