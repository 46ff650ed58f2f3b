pub mod callback_signature;
pub mod invoice_renderer;
pub mod pricing;

pub use callback_signature::{CallbackVerifier, SignatureError};
pub use invoice_renderer::{render_invoice, InvoiceData, InvoiceDocument};
