use std::convert::Infallible;

use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::{header, request::Parts},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// Custom query-string extractor with the same error envelope as [`AppJson`]
pub struct AppQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(QueryRejection::FailedToDeserializeQueryString(err)) => Err(
                AppError::BadRequest(format!("Invalid query parameters: {}", err.body_text())),
            ),
            Err(_) => Err(AppError::BadRequest(
                "Failed to parse query parameters".to_string(),
            )),
        }
    }
}

/// Scheme and host the client used to reach us, e.g. `https://city.example`.
///
/// Taken from `X-Forwarded-Proto` (default `http`) and the `Host` header.
/// `None` when the request carries no usable host.
pub struct RequestBaseUrl(pub Option<String>);

impl<S> FromRequestParts<S> for RequestBaseUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|h| !h.is_empty());

        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or("http");

        Ok(Self(host.map(|h| format!("{}://{}", scheme, h))))
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Window {
        limit: Option<i64>,
    }

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn test_base_url_from_host_and_forwarded_proto() {
        let mut p = parts(
            HttpRequest::builder()
                .uri("/api/issues")
                .header("host", "reports.example.org")
                .header("x-forwarded-proto", "https"),
        );

        let RequestBaseUrl(base) = RequestBaseUrl::from_request_parts(&mut p, &())
            .await
            .unwrap();

        assert_eq!(base.as_deref(), Some("https://reports.example.org"));
    }

    #[tokio::test]
    async fn test_base_url_defaults_to_http() {
        let mut p = parts(HttpRequest::builder().header("host", "localhost:3000"));

        let RequestBaseUrl(base) = RequestBaseUrl::from_request_parts(&mut p, &())
            .await
            .unwrap();

        assert_eq!(base.as_deref(), Some("http://localhost:3000"));
    }

    #[tokio::test]
    async fn test_base_url_absent_without_host() {
        let mut p = parts(HttpRequest::builder().uri("/api/issues"));

        let RequestBaseUrl(base) = RequestBaseUrl::from_request_parts(&mut p, &())
            .await
            .unwrap();

        assert!(base.is_none());
    }

    #[tokio::test]
    async fn test_app_query_rejects_bad_values() {
        let mut ok = parts(HttpRequest::builder().uri("/x?limit=5"));
        let AppQuery(window) = AppQuery::<Window>::from_request_parts(&mut ok, &())
            .await
            .unwrap();
        assert_eq!(window.limit, Some(5));

        let mut bad = parts(HttpRequest::builder().uri("/x?limit=lots"));
        let result = AppQuery::<Window>::from_request_parts(&mut bad, &()).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
