use super::{
    BoundingBox, Face, FaceMatch, FaceRecognizer, FaceRecord, IndexFacesResponse,
    RecognitionError, UnindexedFace,
};
use crate::core::config::RecognitionConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::config::{Credentials, Region};
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{self as rk, Attribute, Image};
use aws_sdk_rekognition::Client;
use log::{debug, trace};

pub struct RekognitionClient {
    client: Client,
}

impl RekognitionClient {
    pub async fn new(config: &RecognitionConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(key), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(
                key.clone(),
                secret.clone(),
                None,
                None,
                "static",
            ));
        }

        let base_config = loader.load().await;
        Self::from_client(Client::new(&base_config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

fn service_error(operation: &str, err: impl std::error::Error) -> RecognitionError {
    RecognitionError::Service {
        operation: operation.to_string(),
        message: DisplayErrorContext(&err).to_string(),
    }
}

fn bounding_box_from_sdk(bounding_box: &rk::BoundingBox) -> BoundingBox {
    BoundingBox {
        width: bounding_box.width().unwrap_or_default(),
        height: bounding_box.height().unwrap_or_default(),
        top: bounding_box.top().unwrap_or_default(),
        left: bounding_box.left().unwrap_or_default(),
    }
}

fn face_from_sdk(face: &rk::Face) -> Face {
    Face {
        face_id: face.face_id().unwrap_or_default().to_string(),
        image_id: face.image_id().unwrap_or_default().to_string(),
        external_image_id: face.external_image_id().unwrap_or_default().to_string(),
        confidence: face.confidence().unwrap_or_default(),
        bounding_box: face
            .bounding_box()
            .map(bounding_box_from_sdk)
            .unwrap_or_default(),
    }
}

fn unindexed_face_from_sdk(face: &rk::UnindexedFace) -> UnindexedFace {
    UnindexedFace {
        reasons: face
            .reasons()
            .iter()
            .map(|reason| reason.as_str().to_string())
            .collect(),
        bounding_box: face
            .face_detail()
            .and_then(|detail| detail.bounding_box())
            .map(bounding_box_from_sdk),
    }
}

#[async_trait]
impl FaceRecognizer for RekognitionClient {
    async fn create_collection(&self, collection_id: &str) -> Result<(), RecognitionError> {
        match self
            .client
            .create_collection()
            .collection_id(collection_id)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => {
                let exists = err
                    .as_service_error()
                    .map(|e| e.is_resource_already_exists_exception())
                    .unwrap_or(false);
                if exists {
                    Err(RecognitionError::CollectionAlreadyExists(
                        collection_id.to_string(),
                    ))
                } else {
                    Err(service_error("CreateCollection", err))
                }
            }
        }
    }

    async fn delete_collection(&self, collection_id: &str) -> Result<(), RecognitionError> {
        self.client
            .delete_collection()
            .collection_id(collection_id)
            .send()
            .await
            .map_err(|e| service_error("DeleteCollection", e))?;
        Ok(())
    }

    async fn index_faces(
        &self,
        collection_id: &str,
        image_bytes: Vec<u8>,
        external_image_id: &str,
    ) -> Result<IndexFacesResponse, RecognitionError> {
        let image = Image::builder().bytes(Blob::new(image_bytes)).build();

        let output = self
            .client
            .index_faces()
            .collection_id(collection_id)
            .image(image)
            .external_image_id(external_image_id)
            .detection_attributes(Attribute::Default)
            .send()
            .await
            .map_err(|e| service_error("IndexFaces", e))?;

        let response = IndexFacesResponse {
            face_records: output
                .face_records()
                .iter()
                .map(|record| FaceRecord {
                    face: record.face().map(face_from_sdk),
                })
                .collect(),
            unindexed_faces: output
                .unindexed_faces()
                .iter()
                .map(unindexed_face_from_sdk)
                .collect(),
        };

        debug!(
            "Indexed {} faces ({} unindexed) for {}",
            response.face_records.len(),
            response.unindexed_faces.len(),
            external_image_id
        );
        Ok(response)
    }

    async fn list_faces(&self, collection_id: &str) -> Result<Vec<Face>, RecognitionError> {
        let mut faces = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_faces()
                .collection_id(collection_id)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| service_error("ListFaces", e))?;

            faces.extend(output.faces().iter().map(face_from_sdk));

            match output.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        trace!("Listed {} faces in collection '{}'", faces.len(), collection_id);
        Ok(faces)
    }

    async fn search_faces(
        &self,
        collection_id: &str,
        face_id: &str,
    ) -> Result<Vec<FaceMatch>, RecognitionError> {
        let output = self
            .client
            .search_faces()
            .collection_id(collection_id)
            .face_id(face_id)
            .send()
            .await
            .map_err(|e| service_error("SearchFaces", e))?;

        Ok(output
            .face_matches()
            .iter()
            .filter_map(|face_match| {
                face_match.face().map(|face| FaceMatch {
                    similarity: face_match.similarity().unwrap_or_default(),
                    face: face_from_sdk(face),
                })
            })
            .collect())
    }
}
