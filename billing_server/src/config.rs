use std::env;

use bpg_common::{Secret, DEFAULT_CURRENCY_CODE};
use gateway_client::GatewayConfig;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_BPG_HOST: &str = "127.0.0.1";
const DEFAULT_BPG_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The currency code every order is quoted in. The gateway account must support it.
    pub currency: String,
    pub auth: AuthConfig,
    pub gateway: GatewayConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BPG_HOST.to_string(),
            port: DEFAULT_BPG_PORT,
            database_url: String::default(),
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            auth: AuthConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BPG_HOST").ok().unwrap_or_else(|| DEFAULT_BPG_HOST.into());
        let port = env::var("BPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BPG_PORT. {e} Using the default, {DEFAULT_BPG_PORT}, instead."
                    );
                    DEFAULT_BPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BPG_PORT);
        let database_url = env::var("BPG_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ BPG_DATABASE_URL is not set. Please set it to the URL for the billing database.");
            String::default()
        });
        let currency = env::var("BPG_CURRENCY").ok().unwrap_or_else(|| {
            info!("🪛️ BPG_CURRENCY is not set. Using the default, {DEFAULT_CURRENCY_CODE}.");
            DEFAULT_CURRENCY_CODE.to_string()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to \
                 the default configuration."
            );
            AuthConfig::default()
        });
        let gateway = GatewayConfig::new_from_env_or_default();
        Self { host, port, database_url, currency, auth, gateway }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HS256 secret that access tokens are signed and verified with.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The server is using a random JWT secret for this session. Access tokens will not survive a \
             restart. Set BPG_JWT_SECRET to a long random string in production. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(48).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret = env::var("BPG_JWT_SECRET")
            .map_err(|_| ServerError::ConfigurationError("BPG_JWT_SECRET is not set".to_string()))?;
        if secret.len() < 32 {
            warn!("🪛️ BPG_JWT_SECRET is shorter than 32 characters. Consider using a longer secret.");
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}

/// The subset of the configuration that request handlers need at runtime.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub currency: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { currency: config.currency.clone() }
    }
}
