//! Extractors whose rejections use the `ApiResponse` envelope instead of
//! axum's plain-text bodies.

use axum::{
    body::Body,
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::Credential;

/// JSON request body
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(AppJsonRejection)
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            JsonRejection::JsonDataError(err) => {
                format!("Request body has the wrong shape: {}", err.body_text())
            }
            JsonRejection::JsonSyntaxError(err) => {
                format!("Request body is not valid JSON: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Request body must be sent as application/json".to_string()
            }
            other => format!("Could not read request body: {}", other.body_text()),
        };

        AppError::BadRequest(message).into_response()
    }
}

/// URL path parameters; a segment that does not parse is a 400 validation error
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| match rejection {
                PathRejection::FailedToDeserializePathParams(err) => {
                    AppError::Validation(format!("Invalid path parameter: {}", err.body_text()))
                }
                other => AppError::Internal(other.body_text()),
            })
    }
}

/// Bearer credential captured by `credential_middleware`
impl<S> FromRequestParts<S> for Credential
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Credential>().cloned().ok_or_else(|| {
            AppError::Unauthorized("A bearer token is required to reach the case API".to_string())
        })
    }
}
