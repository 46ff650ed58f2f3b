//! # BPG server
//!
//! This module hosts the REST surface of the billing payment gateway. It is responsible for:
//! * Opening payment orders against the external gateway and recording them in the ledger.
//! * Reconciling signed payment confirmations relayed by clients.
//! * Serving invoice documents to the company that was billed.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/orders`: Opens a gateway order for a plan and billing cycle.
//! * `/api/payments/verify`: Verifies a payment confirmation and activates the subscription.
//! * `/api/invoice`: Returns the invoice document for a settled payment.

pub mod auth;
pub mod cli;
pub mod config;
pub mod errors;

pub mod data_objects;
pub mod helpers;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
