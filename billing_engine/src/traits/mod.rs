//! The traits that must be implemented by a storage backend for the billing engine.
//!
//! Each trait covers one concern and carries its own error enum, so API facades and request
//! handlers can stay generic over the backend and tests can mock a single concern at a time.
//!
//! * [`BillingDatabase`] - the plan catalog, the payment ledger and subscription activation.
//! * [`InvoiceManagement`] - the reads and the number assignment behind invoice generation.

mod billing_database;
mod invoice_management;

pub use billing_database::{BillingDatabase, PaymentFlowError};
pub use invoice_management::{InvoiceApiError, InvoiceManagement};
