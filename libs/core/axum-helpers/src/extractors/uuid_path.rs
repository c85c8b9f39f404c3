//! UUID path parameter extractors.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// Single UUID path parameter.
///
/// ```ignore
/// async fn get_brand(UuidPath(id): UuidPath) -> String {
///     format!("Brand {}", id)
/// }
///
/// let app = Router::new().route("/{id}", get(get_brand));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(UuidPath(parse(&raw)?))
    }
}

/// Two UUID path parameters, in route order, e.g. `/{id}/related/{generic}`.
#[derive(Debug, Clone, Copy)]
pub struct UuidPathPair(pub Uuid, pub Uuid);

impl<S> FromRequestParts<S> for UuidPathPair
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)) = Path::<(String, String)>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        Ok(UuidPathPair(parse(&first)?, parse(&second)?))
    }
}

fn parse(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|e| {
        tracing::debug!(value = raw, "Rejected path parameter");
        AppError::UuidError(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/{id}", get(|UuidPath(id): UuidPath| async move { id.to_string() }))
            .route(
                "/{id}/related/{other}",
                get(|UuidPathPair(a, b): UuidPathPair| async move { format!("{a}/{b}") }),
            )
    }

    async fn status_of(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_valid_uuid_paths() {
        let id = Uuid::now_v7();
        assert_eq!(status_of(&format!("/{id}")).await, StatusCode::OK);
        assert_eq!(status_of(&format!("/{id}/related/{id}")).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_uuid_is_400() {
        assert_eq!(status_of("/not-a-uuid").await, StatusCode::BAD_REQUEST);
        let id = Uuid::now_v7();
        assert_eq!(status_of(&format!("/{id}/related/nope")).await, StatusCode::BAD_REQUEST);
    }
}
