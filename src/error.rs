use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::pipeline::GenerateError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Generate(
                GenerateError::MissingCredential | GenerateError::MissingPrompt,
            ) => StatusCode::BAD_REQUEST,
            ApiError::Generate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(err) => {
                error!("Internal error: {err:#}");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failures_map_to_bad_request() {
        assert_eq!(
            ApiError::Generate(GenerateError::MissingCredential).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Generate(GenerateError::MissingPrompt).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("bad".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn hard_generation_failures_map_to_server_errors() {
        let all_failed = ApiError::Generate(GenerateError::AllBackendsFailed {
            errors: vec!["flux-schnell: down".to_string()],
        });
        assert_eq!(all_failed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let extraction = ApiError::Generate(GenerateError::ExtractionFailed { raw_type: "object" });
        assert_eq!(extraction.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn missing_resources_map_to_not_found() {
        let err = ApiError::NotFound("Persona");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Persona not found");
    }

    #[tokio::test]
    async fn rejected_bodies_map_to_bad_request() {
        use axum::body::Body;
        use axum::extract::FromRequest;
        use axum::http::{header, Request};

        let request = Request::builder()
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let rejection = Json::<u32>::from_request(request, &()).await.unwrap_err();

        let err = ApiError::from(rejection);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn responses_carry_the_error_message_as_json() {
        let response = ApiError::Generate(GenerateError::MissingPrompt).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed, json!({ "error": "Prompt is required." }));
    }
}
