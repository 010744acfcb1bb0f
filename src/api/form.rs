use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::de::DeserializeOwned;

use super::ErrorResponse;

/// Request body that may arrive as JSON or as a URL-encoded HTML form.
///
/// `application/x-www-form-urlencoded` is parsed as a form; everything else is
/// parsed as JSON whatever its declared content type.
pub struct JsonOrForm<T>(pub T);

/// Body could not be read or decoded.
#[derive(Debug)]
pub struct BodyRejection(pub String);

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Invalid request body: {}", self.0),
            }),
        )
            .into_response()
    }
}

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| BodyRejection(e.body_text()))?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| BodyRejection(e.body_text()))?;
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| BodyRejection(e.to_string()))
    }
}
