//! Rendering of invoice documents.
//!
//! Invoices are plain-text documents with a fixed layout. Rendering is a pure function of the
//! ledger entry, the plan and the company: every field, including the invoice date, comes from
//! stored data, so regenerating an invoice at any later time produces an identical document.

use crate::db_types::{Company, Payment};

const RULE: &str = "================================================================";
const THIN_RULE: &str = "----------------------------------------------------------------";

/// Everything needed to render one invoice.
#[derive(Debug, Clone)]
pub struct InvoiceData {
    pub number: String,
    pub payment: Payment,
    pub plan_name: String,
    pub company: Company,
}

/// A rendered invoice, ready to be sent as a file attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn render_invoice(data: &InvoiceData) -> InvoiceDocument {
    let payment = &data.payment;
    let mut doc = String::with_capacity(1024);
    doc.push_str(RULE);
    doc.push_str("\n                            INVOICE\n");
    doc.push_str(RULE);
    doc.push('\n');
    doc.push_str(&format!("Invoice number : {}\n", data.number));
    doc.push_str(&format!("Invoice date   : {}\n", payment.created_at.format("%Y-%m-%d")));
    doc.push('\n');
    doc.push_str(&format!("Billed to      : {}\n", data.company.name));
    if let Some(address) = &data.company.billing_address {
        doc.push_str(&format!("Address        : {address}\n"));
    }
    if let Some(tax_id) = &data.company.tax_id {
        doc.push_str(&format!("Tax ID         : {tax_id}\n"));
    }
    doc.push('\n');
    doc.push_str(THIN_RULE);
    doc.push('\n');
    doc.push_str(&format!(
        "{:<40} {:>10} {:>12}\n",
        format!("{} ({})", data.plan_name, payment.billing_cycle),
        "Qty 1",
        format!("{} {}", payment.amount, payment.currency),
    ));
    doc.push_str(THIN_RULE);
    doc.push('\n');
    doc.push_str(&format!("{:<40} {:>23}\n", "TOTAL", format!("{} {}", payment.amount, payment.currency)));
    doc.push('\n');
    doc.push_str(&format!("Order reference   : {}\n", payment.gateway_order_id));
    if let Some(payment_ref) = &payment.gateway_payment_id {
        doc.push_str(&format!("Payment reference : {payment_ref}\n"));
    }
    doc.push_str(RULE);
    doc.push('\n');
    InvoiceDocument { filename: format!("{}.txt", data.number), bytes: doc.into_bytes() }
}
