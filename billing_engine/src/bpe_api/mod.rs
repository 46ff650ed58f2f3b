//! The public API facades of the billing engine.
//!
//! Request handlers talk to these, never to the storage traits directly. Both facades are generic
//! over their backend trait so that endpoint tests can run against mocks.

mod invoice_api;
mod payment_flow_api;

pub use invoice_api::InvoiceApi;
pub use payment_flow_api::PaymentFlowApi;
