use crate::db::store::StoreError;
use crate::services::certificate_renderer::RenderError;
use crate::services::youtube::YouTubeError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Serialize)]
pub struct APIError {
    pub cause: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseType<T = String> {
    pub data: Option<T>,
    pub error: Option<APIError>,
}

impl<T: Serialize> ResponseType<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to fetch playlist data from YouTube")]
    Upstream(#[from] YouTubeError),

    #[error("Failed to access certificate storage")]
    Storage(#[from] StoreError),

    #[error("Failed to render certificate")]
    Render(#[from] RenderError),
}

impl ApiError {
    fn cause(&self) -> &'static str {
        match self {
            ApiError::InvalidInput(_) => "invalid_input",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Storage(_) => "storage_error",
            ApiError::Render(_) => "render_error",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::InvalidInput(_) => log::warn!("Rejected request: {}", self),
            ApiError::Upstream(e) => log::error!("{}: {}", self, e),
            ApiError::Storage(e) => log::error!("{}: {}", self, e),
            ApiError::Render(e) => log::error!("{}: {}", self, e),
        }

        HttpResponse::build(self.status_code()).json(ResponseType::<String> {
            data: None,
            error: Some(APIError {
                cause: self.cause().to_string(),
                message: self.to_string(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn invalid_input_is_bad_request_envelope() {
        let err = ApiError::InvalidInput("Invalid YouTube playlist URL.".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert!(json["data"].is_null());
        assert_eq!(json["error"]["cause"], "invalid_input");
        assert_eq!(json["error"]["message"], "Invalid YouTube playlist URL.");
    }

    #[test]
    fn upstream_and_storage_are_server_errors() {
        let upstream = ApiError::Upstream(YouTubeError::Api {
            status: reqwest::StatusCode::FORBIDDEN,
            message: "quotaExceeded".to_string(),
        });
        let storage = ApiError::Storage(StoreError::Query(diesel::result::Error::NotFound));

        assert_eq!(upstream.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.cause(), "upstream_error");
        assert_eq!(storage.cause(), "storage_error");
    }
}
