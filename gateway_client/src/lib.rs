//! HTTP client for the external payment gateway.
//!
//! The gateway follows the common "order first" card-payment flow: the merchant opens an order for
//! a given amount, the customer completes the payment against that order in their client, and the
//! gateway reports the outcome via a signed callback. Only the order-opening leg lives here; the
//! callback signature is verified by the billing engine.

mod api;
mod config;
mod error;

mod data_objects;

pub use api::{GatewayApi, GatewayOrders};
pub use config::GatewayConfig;
pub use data_objects::{GatewayOrder, NewGatewayOrder};
pub use error::GatewayApiError;
