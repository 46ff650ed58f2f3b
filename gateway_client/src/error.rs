use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Gateway request failed: {0}")]
    RequestError(String),
    #[error("Could not deserialize gateway response: {0}")]
    JsonError(String),
    #[error("Gateway returned an error. Status {status}. {message}")]
    QueryError { status: u16, message: String },
}

impl From<reqwest::Error> for GatewayApiError {
    fn from(e: reqwest::Error) -> Self {
        GatewayApiError::RequestError(e.to_string())
    }
}
