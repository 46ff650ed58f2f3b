use bpg_common::Secret;
use log::*;

const DEFAULT_GATEWAY_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub base_url: String,
    /// The public key identifier. This is not a secret; clients embed it when completing payments.
    pub key_id: String,
    pub key_secret: Secret<String>,
}

impl GatewayConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("BPG_GATEWAY_URL").unwrap_or_else(|_| {
            info!("BPG_GATEWAY_URL not set, using {DEFAULT_GATEWAY_URL}");
            DEFAULT_GATEWAY_URL.to_string()
        });
        let key_id = std::env::var("BPG_GATEWAY_KEY_ID").unwrap_or_else(|_| {
            warn!("BPG_GATEWAY_KEY_ID not set, using (probably useless) default");
            "rzp_test_0000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("BPG_GATEWAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("BPG_GATEWAY_KEY_SECRET not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        Self { base_url, key_id, key_secret }
    }
}
