//! Dealer identity from bearer tokens
//!
//! When a request carries `Authorization: Bearer <jwt>`, the token is
//! validated and the configured dealer claim is attached to the request as
//! an [`AuthenticatedDealer`]. Requests without an Authorization header pass
//! through untouched; the dealer then has to be named explicitly in the body,
//! a header or the query string.

use std::{collections::HashMap, fs, sync::Arc};

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::Value;

use crate::{config::AuthConfig, error::Error, ids::DealerId};

/// Dealer identity established by a validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedDealer(pub DealerId);

/// JWT validation state for the dealer identity middleware
#[derive(Clone)]
pub struct DealerAuth {
    decoding_key: Arc<DecodingKey>,
    validation: Validation,
    dealer_claim: String,
}

fn config_error(message: String) -> Error {
    Error::Config(Box::new(figment::Error::from(message)))
}

fn parse_algorithm(name: &str) -> Result<Algorithm, Error> {
    match name.to_uppercase().as_str() {
        "RS256" => Ok(Algorithm::RS256),
        "RS384" => Ok(Algorithm::RS384),
        "RS512" => Ok(Algorithm::RS512),
        "ES256" => Ok(Algorithm::ES256),
        "ES384" => Ok(Algorithm::ES384),
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        alg => Err(config_error(format!("Unsupported JWT algorithm: {}", alg))),
    }
}

impl DealerAuth {
    /// Load the verification key and build validation rules
    pub fn new(config: &AuthConfig) -> Result<Self, Error> {
        let key = fs::read(&config.public_key_path).map_err(|e| {
            config_error(format!(
                "Failed to read JWT key from path '{}': {}",
                config.public_key_path.display(),
                e
            ))
        })?;

        let algorithm = parse_algorithm(&config.algorithm)?;
        let decoding_key = match algorithm {
            Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512 => {
                DecodingKey::from_rsa_pem(&key)?
            }
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(&key)?,
            _ => DecodingKey::from_secret(&key),
        };

        let mut validation = Validation::new(algorithm);
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &config.audience {
            validation.set_audience(&[audience]);
        }

        Ok(Self {
            decoding_key: Arc::new(decoding_key),
            validation,
            dealer_claim: config.dealer_claim.clone(),
        })
    }

    /// Validate `token` and read the dealer claim
    pub fn validate_token(&self, token: &str) -> Result<DealerId, Error> {
        let data = decode::<HashMap<String, Value>>(token, &self.decoding_key, &self.validation)?;

        match data.claims.get(&self.dealer_claim) {
            Some(Value::String(s)) if !s.is_empty() => Ok(DealerId::new(s.as_str())),
            Some(Value::Number(n)) => Ok(DealerId::new(n.to_string())),
            _ => Err(Error::Unauthorized(format!(
                "Token has no '{}' claim",
                self.dealer_claim
            ))),
        }
    }

    /// Attach [`AuthenticatedDealer`] when a valid bearer token is present
    pub async fn middleware(
        State(auth): State<Self>,
        mut request: Request,
        next: Next,
    ) -> Result<Response, Error> {
        let token = bearer_token(request.headers())?.map(str::to_owned);
        if let Some(token) = token {
            let dealer = auth.validate_token(&token).map_err(|e| {
                tracing::warn!(error = %e, "rejected bearer token");
                e
            })?;
            tracing::debug!(dealer_id = %dealer, "authenticated dealer");
            request.extensions_mut().insert(AuthenticatedDealer(dealer));
        }

        Ok(next.run(request).await)
    }
}

/// The bearer token, if an Authorization header is present
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(Some)
        .ok_or_else(|| Error::Unauthorized("Invalid Authorization header format".to_string()))
}
