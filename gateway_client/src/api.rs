use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::GatewayConfig,
    data_objects::{GatewayOrder, NewGatewayOrder},
    GatewayApiError,
};

/// Outbound calls the billing service makes against the payment gateway.
///
/// Request handlers are generic over this trait so that endpoint tests can substitute a mock and
/// exercise the order-creation flow without a live gateway.
#[allow(async_fn_in_trait)]
pub trait GatewayOrders: Clone {
    /// Open a new order with the gateway. The returned order id is the key the signed completion
    /// callback will reference.
    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayApiError>;

    /// The public key identifier clients need to complete a payment against an order.
    fn key_id(&self) -> String;
}

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct GatewayApi {
    config: GatewayConfig,
    client: Arc<Client>,
}

impl GatewayApi {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, GatewayApiError> {
        let url = self.url(path);
        trace!("Sending gateway request: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await?;
        if response.status().is_success() {
            trace!("Gateway request successful. {}", response.status());
            response.json::<T>().await.map_err(|e| GatewayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| GatewayApiError::RequestError(e.to_string()))?;
            Err(GatewayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }
}

impl GatewayOrders for GatewayApi {
    async fn create_order(&self, order: NewGatewayOrder) -> Result<GatewayOrder, GatewayApiError> {
        debug!("Opening gateway order for {} {} (receipt {})", order.amount, order.currency, order.receipt);
        let result = self.rest_query::<GatewayOrder, NewGatewayOrder>(Method::POST, "/orders", Some(order)).await?;
        info!("Gateway order {} opened with status {}", result.id, result.status);
        Ok(result)
    }

    fn key_id(&self) -> String {
        self.config.key_id.clone()
    }
}
