//! Gathering [`ParamSources`] from an axum request

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::middleware::AuthenticatedDealer;
use crate::params::ParamSources;

/// Every parameter source of a request: path, JSON body, headers, query
/// string and the authenticated dealer, if any
///
/// Consumes the body, so it must be the last extractor of a handler.
#[derive(Debug, Clone)]
pub struct RequestParams(pub ParamSources);

impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();

        let path = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();

        let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(params)| params)
            .unwrap_or_default();

        let identity = parts
            .extensions
            .get::<AuthenticatedDealer>()
            .map(|dealer| dealer.0.clone());

        let mut params = ParamSources::new()
            .with_path_params(path)
            .with_query_params(query)
            .with_identity(identity);

        for (name, value) in &parts.headers {
            if let Ok(value) = value.to_str() {
                params = params.with_header(name.as_str(), value);
            }
        }

        let bytes = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(IntoResponse::into_response)?;

        if !bytes.is_empty() {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(body) => params = params.with_json_body(&body),
                Err(e) => tracing::debug!(error = %e, "ignoring non-JSON request body"),
            }
        }

        Ok(Self(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::DealerId;
    use axum::body::Body;

    async fn extract(request: Request) -> ParamSources {
        let RequestParams(params) = RequestParams::from_request(request, &()).await.unwrap();
        params
    }

    #[tokio::test]
    async fn test_collects_query_header_and_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/vehicles?limit=5")
            .header("DealerID", "d1")
            .body(Body::from(r#"{"vehicleID": "v9", "page": 2}"#))
            .unwrap();

        let params = extract(request).await;
        assert_eq!(params.dealer_id().unwrap().as_str(), "d1");
        assert_eq!(params.vehicle_id().unwrap().as_str(), "v9");
        assert_eq!(params.page(), Some("2"));
        assert_eq!(params.limit(), Some("5"));
    }

    #[tokio::test]
    async fn test_non_json_body_is_empty_source() {
        let request = Request::builder()
            .method("POST")
            .uri("/vehicles?dealerID=d2")
            .body(Body::from("dealerID=d1"))
            .unwrap();

        let params = extract(request).await;
        assert_eq!(params.dealer_id().unwrap().as_str(), "d2");
    }

    #[tokio::test]
    async fn test_identity_from_extension() {
        let mut request = Request::builder().uri("/vehicles").body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(AuthenticatedDealer(DealerId::new("d5")));

        let params = extract(request).await;
        assert_eq!(params.dealer_id().unwrap().as_str(), "d5");
    }
}
