//! Face recognition collaborators
//!
//! The gallery never detects or compares faces itself. Everything goes through
//! a [`FaceRecognizer`], backed in production by AWS Rekognition.

pub mod rekognition;

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

pub use rekognition::RekognitionClient;

#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("Collection already exists: {0}")]
    CollectionAlreadyExists(String),
    #[error("Recognition service error in {operation}: {message}")]
    Service { operation: String, message: String },
}

/// Face location as fractions of the source image dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    pub top: f32,
    pub left: f32,
}

/// A face stored in a recognition collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    pub face_id: String,
    pub image_id: String,
    /// Name of the stored photo the face was indexed under.
    pub external_image_id: String,
    pub confidence: f32,
    pub bounding_box: BoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceMatch {
    pub similarity: f32,
    pub face: Face,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnindexedFace {
    pub reasons: Vec<String>,
    pub bounding_box: Option<BoundingBox>,
}

/// One face the service indexed. The service may omit the stored face for a
/// record; the record still counts toward the headcount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub face: Option<Face>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexFacesResponse {
    pub face_records: Vec<FaceRecord>,
    pub unindexed_faces: Vec<UnindexedFace>,
}

impl IndexFacesResponse {
    /// Faces the service refused to index still count as people in the photo.
    pub fn headcount(&self) -> usize {
        self.face_records.len() + self.unindexed_faces.len()
    }
}

#[async_trait]
pub trait FaceRecognizer: Send + Sync {
    async fn create_collection(&self, collection_id: &str) -> Result<(), RecognitionError>;

    async fn delete_collection(&self, collection_id: &str) -> Result<(), RecognitionError>;

    async fn index_faces(
        &self,
        collection_id: &str,
        image_bytes: Vec<u8>,
        external_image_id: &str,
    ) -> Result<IndexFacesResponse, RecognitionError>;

    /// Every face in the collection, with pagination already resolved.
    async fn list_faces(&self, collection_id: &str) -> Result<Vec<Face>, RecognitionError>;

    async fn search_faces(
        &self,
        collection_id: &str,
        face_id: &str,
    ) -> Result<Vec<FaceMatch>, RecognitionError>;
}

/// Creates the collection unless it is already there. Any other failure is
/// returned unchanged.
pub async fn ensure_collection(
    recognizer: &dyn FaceRecognizer,
    collection_id: &str,
) -> Result<(), RecognitionError> {
    match recognizer.create_collection(collection_id).await {
        Ok(()) => {
            info!("Created face collection '{}'", collection_id);
            Ok(())
        }
        Err(RecognitionError::CollectionAlreadyExists(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::shared::test_utils::MockRecognizer;

    #[tokio::test]
    async fn test_ensure_collection_creates_missing_collection() {
        let recognizer = MockRecognizer::new();
        ensure_collection(&recognizer, "gallery").await.unwrap();
        assert_eq!(recognizer.created_collections(), vec!["gallery".to_string()]);
    }

    #[tokio::test]
    async fn test_ensure_collection_swallows_already_exists() {
        let recognizer = MockRecognizer::new().with_existing_collection("gallery");
        assert!(ensure_collection(&recognizer, "gallery").await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_collection_propagates_other_errors() {
        let recognizer = MockRecognizer::new().failing_create("AccessDeniedException");
        let err = ensure_collection(&recognizer, "gallery").await.unwrap_err();
        assert!(matches!(err, RecognitionError::Service { .. }));
    }

    #[test]
    fn test_headcount_includes_unindexed_faces() {
        let face = Face {
            face_id: "f1".to_string(),
            image_id: "i1".to_string(),
            external_image_id: "a.jpg".to_string(),
            confidence: 99.9,
            bounding_box: BoundingBox::default(),
        };
        let response = IndexFacesResponse {
            face_records: vec![
                FaceRecord { face: Some(face) },
                FaceRecord { face: None },
            ],
            unindexed_faces: vec![UnindexedFace {
                reasons: vec!["LOW_SHARPNESS".to_string()],
                bounding_box: None,
            }],
        };
        assert_eq!(response.headcount(), 3);
    }
}
