use axum::{
    Json,
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// 201 response carrying `body`, with a `Location` of `/api/{collection}/{id}`.
pub(crate) fn created<T: Serialize>(collection: &str, id: Option<i64>, body: T) -> Response {
    let mut response = (StatusCode::CREATED, Json(body)).into_response();
    let location = id.and_then(|id| HeaderValue::from_str(&format!("/api/{collection}/{id}")).ok());
    if let Some(location) = location {
        response.headers_mut().insert(LOCATION, location);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_sets_location() {
        let response = created("products", Some(26), serde_json::json!({"id": 26}));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[LOCATION], "/api/products/26");
    }

    #[test]
    fn test_created_without_id_has_no_location() {
        let response = created("products", None, serde_json::json!({}));
        assert!(response.headers().get(LOCATION).is_none());
    }
}
