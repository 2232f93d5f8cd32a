//! Photo gallery: upload, headcount and face-similarity grouping, and face
//! thumbnails.

pub mod crop;
pub mod error;
pub mod grouping;
pub mod handlers;
pub mod html_renderers;
pub mod records;
pub mod types;
pub mod upload;

use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

pub use crop::{crop_rect, CropRect, NormalizedBox, CROP_ENLARGEMENT};
pub use error::GalleryError;
pub use grouping::{group_by_face, group_by_headcount, FACE_CONFIDENCE_THRESHOLD};
pub use types::{ClusterFile, FaceCluster, GalleryView, HeadcountGroups, HeadcountKey, StoredFile};

/// Directory of the image store that holds every uploaded photo.
pub const PHOTOS_DIR: &str = "photos";

pub fn configure() -> Router<Arc<AppState>> {
    Router::new()
        .route(ApiUrls::INDEX, get(handlers::index))
        .route(ApiUrls::GALLERY, get(handlers::gallery_json))
        .route(ApiUrls::UPLOAD, post(handlers::upload))
        .route(ApiUrls::RESET, post(handlers::reset))
        .route(ApiUrls::FACE, get(handlers::show_face))
}
