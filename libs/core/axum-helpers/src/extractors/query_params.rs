//! Query string extractor rejecting with the standard error body.

use crate::errors::AppError;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

/// Deserialized query string.
///
/// Same as [`Query`], but a malformed query (e.g. `?page=abc`) is rejected
/// with a "Bad request" error body instead of plain text.
///
/// ```ignore
/// async fn list(QueryParams(query): QueryParams<PageQuery>) -> impl IntoResponse { ... }
/// ```
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
        routing::get,
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Paging {
        page: Option<u64>,
    }

    async fn page_number(QueryParams(paging): QueryParams<Paging>) -> String {
        paging.page.unwrap_or_default().to_string()
    }

    fn app() -> Router {
        Router::new().route("/", get(page_number))
    }

    #[tokio::test]
    async fn test_valid_query_reaches_handler() {
        let response = app()
            .oneshot(Request::get("/?page=3").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"3");
    }

    #[tokio::test]
    async fn test_malformed_query_is_bad_request_body() {
        let response = app()
            .oneshot(Request::get("/?page=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 400);
        assert_eq!(body["error"], "Bad request");
        assert!(body["message"].as_str().unwrap().contains("page"));
    }
}
