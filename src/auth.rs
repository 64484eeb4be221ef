//! Actor identity extraction.
//!
//! Session and token handling live in the platform gateway in front of this
//! service. The gateway authenticates the caller and forwards the resolved
//! user id in a trusted header; the core never parses credentials itself.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::ApiError;

/// Header installed by the upstream gateway after authentication.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Opaque authenticated actor attached to every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub id: Uuid,
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let id = Uuid::parse_str(header).map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthenticatedActor { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn extracts_actor_from_header() {
        let actor_id = Uuid::new_v4();
        let request = Request::builder()
            .header(ACTOR_ID_HEADER, actor_id.to_string())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let actor = AuthenticatedActor::from_request_parts(&mut parts, &())
            .await
            .expect("actor expected");
        assert_eq!(actor.id, actor_id);
    }

    #[tokio::test]
    async fn rejects_missing_or_malformed_header() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();
        assert!(AuthenticatedActor::from_request_parts(&mut parts, &())
            .await
            .is_err());

        let request = Request::builder()
            .header(ACTOR_ID_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        assert!(AuthenticatedActor::from_request_parts(&mut parts, &())
            .await
            .is_err());
    }
}
