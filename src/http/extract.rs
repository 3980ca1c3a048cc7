use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::AppState;
use crate::auth::{self, Actor};
use crate::error::EnarvaError;

/// JSON extractor whose rejection is our 400 error body, with the
/// deserializer's diagnostics as validation details.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = EnarvaError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(EnarvaError::Validation(rejection_detail(&rejection))),
        }
    }
}

fn rejection_detail(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "expected Content-Type: application/json".to_string()
        }
        other => other.body_text(),
    }
}

/// Resolves the bearer token to an authenticated actor. Missing or
/// unknown tokens reject with 401 before the handler runs.
impl FromRequestParts<AppState> for Actor {
    type Rejection = EnarvaError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(EnarvaError::Unauthorized)?;

        state
            .db
            .with_conn(|conn| auth::find_actor_by_token(conn, token))?
            .ok_or(EnarvaError::Unauthorized)
    }
}
