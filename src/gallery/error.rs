use super::crop::CropRect;
use crate::botmodels::RecognitionError;
use crate::drive::StorageError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Invalid bounding box: {0}")]
    InvalidBoundingBox(String),
    #[error("Invalid crop rectangle: {0:?}")]
    InvalidCrop(CropRect),
    #[error(transparent)]
    Recognition(#[from] RecognitionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<diesel::result::Error> for GalleryError {
    fn from(e: diesel::result::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for GalleryError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        Self::Database(format!("Failed to get database connection: {}", e))
    }
}

impl GalleryError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidBoundingBox(_)
            | Self::InvalidCrop(_)
            | Self::Storage(StorageError::InvalidPath(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Storage(StorageError::NotFound(_)) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
