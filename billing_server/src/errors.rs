use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use billing_engine::traits::{InvoiceApiError, PaymentFlowError};
use gateway_client::GatewayApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    PaymentFlowError(#[from] PaymentFlowError),
    #[error("{0}")]
    InvoiceError(#[from] InvoiceApiError),
    #[error("The payment gateway rejected the request or could not be reached. {0}")]
    GatewayError(#[from] GatewayApiError),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::PaymentFlowError(e) => match e {
                PaymentFlowError::PlanNotFound(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                PaymentFlowError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                PaymentFlowError::OrderAlreadyExists(_) => StatusCode::CONFLICT,
                PaymentFlowError::SignatureMismatch(_) => StatusCode::CONFLICT,
                PaymentFlowError::OrderClosed(_) => StatusCode::CONFLICT,
                PaymentFlowError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                PaymentFlowError::PaymentStatusUpdateError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InvoiceError(e) => match e {
                InvoiceApiError::AccessDenied => StatusCode::FORBIDDEN,
                InvoiceApiError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
                InvoiceApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                InvoiceApiError::CompanyNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
                InvoiceApiError::PlanNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::GatewayError(_) => StatusCode::BAD_GATEWAY,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("An access token was not provided.")]
    MissingToken,
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Access token is invalid. {0}")]
    ValidationError(String),
    #[error("Could not issue access token. {0}")]
    TokenIssueError(String),
}
