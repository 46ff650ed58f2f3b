use chrono::Utc;
use rand::Rng;

/// A merchant receipt string for a new gateway order. The gateway requires these to be unique per
/// order, so a timestamp alone is not enough under concurrent requests.
pub fn new_receipt(company_id: &str) -> String {
    let nonce: u32 = rand::thread_rng().gen();
    format!("rcpt-{company_id}-{}-{nonce:08x}", Utc::now().timestamp_millis())
}
