//! Bearer-token authentication for the API routes.
//!
//! Access tokens are HS256 JWTs signed with the shared secret in [`AuthConfig`]. Token issuance is
//! the identity provider's job; this server only validates. The claims carry the verified user id
//! and the company the user belongs to, which is what the invoice access check keys on.

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The authenticated user id.
    pub sub: String,
    /// The company the user acts on behalf of.
    pub company_id: String,
    #[serde(default)]
    pub role: String,
    /// Expiry as a unix timestamp. Expired tokens fail validation.
    pub exp: i64,
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract_claims(req))
    }
}

fn extract_claims(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let config = req
        .app_data::<web::Data<AuthConfig>>()
        .ok_or_else(|| ServerError::InitializeError("The authentication configuration is not registered".to_string()))?;
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let value = header.to_str().map_err(|e| AuthError::PoorlyFormattedToken(e.to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a bearer token".to_string()))?;
    let claims = validate_access_token(token, config)?;
    Ok(claims)
}

pub fn validate_access_token(token: &str, config: &AuthConfig) -> Result<JwtClaims, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<JwtClaims>(token, &key, &validation).map_err(|e| {
        debug!("💻️ Access token failed validation. {e}");
        AuthError::ValidationError(e.to_string())
    })?;
    trace!("💻️ Access token validated for user {}", data.claims.sub);
    Ok(data.claims)
}

/// Signs access tokens with the server's secret. The server itself never issues tokens to clients;
/// this exists for tests and operator tooling.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { key: EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()) }
    }

    pub fn issue_token(&self, claims: &JwtClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key).map_err(|e| AuthError::TokenIssueError(e.to_string()))
    }
}
