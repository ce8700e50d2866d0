use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Extract(extract::Error),
    Render(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    rule: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl From<extract::Error> for ApiError {
    fn from(e: extract::Error) -> Self {
        ApiError::Extract(e)
    }
}

impl From<extract::ValidationError> for ApiError {
    fn from(e: extract::ValidationError) -> Self {
        ApiError::Extract(e.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Extract(extract::Error::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Extract(extract::Error::Upstream(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Extract(extract::Error::Config(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Extract(extract::Error::Io(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(msg) => ErrorBody { error: msg.clone(), rule: None, path: None },
            ApiError::Render(msg) => ErrorBody {
                error: format!("Failed to render graph: {}", msg),
                rule: None,
                path: None,
            },
            ApiError::Extract(extract::Error::Validation(v)) => ErrorBody {
                error: v.to_string(),
                rule: Some(v.rule()),
                path: Some(v.path().to_string()),
            },
            ApiError::Extract(e) => ErrorBody { error: e.to_string(), rule: None, path: None },
        };
        (status, Json(body)).into_response()
    }
}
