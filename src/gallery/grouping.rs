//! Grouping of stored photos for the gallery page.
//!
//! Both groupings are recomputed from scratch on every render; nothing here
//! caches or mutates face data.

use super::types::{ClusterFile, FaceCluster, HeadcountGroups, HeadcountKey, StoredFile};
use crate::botmodels::{Face, FaceMatch, FaceRecognizer, RecognitionError};
use crate::drive::ImageStore;
use log::warn;
use std::collections::HashMap;
use std::future::Future;

/// Faces detected with less confidence never seed a cluster.
pub const FACE_CONFIDENCE_THRESHOLD: f32 = 99.0;

/// Buckets `files` by the headcount stored for each name, keeping input order
/// inside each bucket. Files without a headcount go to [`HeadcountKey::Unknown`].
pub fn group_by_headcount(
    files: &[StoredFile],
    headcounts: &HashMap<String, i32>,
) -> HeadcountGroups {
    let mut groups = HeadcountGroups::new();
    for file in files {
        let key = match headcounts.get(&file.name) {
            Some(count) => HeadcountKey::People(*count),
            None => {
                warn!(
                    "No image record for {}, grouping it under an unknown headcount",
                    file.name
                );
                HeadcountKey::Unknown
            }
        };
        groups.entry(key).or_default().push(file.clone());
    }
    groups
}

/// Clusters the collection's faces by similarity. An empty gallery returns
/// immediately without touching the recognition service.
pub async fn group_by_face(
    files: &[StoredFile],
    recognizer: &dyn FaceRecognizer,
    collection_id: &str,
    store: &dyn ImageStore,
) -> Result<Vec<FaceCluster>, RecognitionError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let faces = recognizer.list_faces(collection_id).await?;
    cluster_faces(&faces, store, |face_id: String| async move {
        recognizer.search_faces(collection_id, &face_id).await
    })
    .await
}

/// Walks `faces` in order; every confident face not already swept into an
/// earlier cluster seeds a new one made of itself and its search matches.
pub async fn cluster_faces<F, Fut>(
    faces: &[Face],
    store: &dyn ImageStore,
    mut search: F,
) -> Result<Vec<FaceCluster>, RecognitionError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<FaceMatch>, RecognitionError>>,
{
    let mut clusters: Vec<FaceCluster> = Vec::new();

    for face in faces {
        if is_processed_face(face, &clusters) || face.confidence < FACE_CONFIDENCE_THRESHOLD {
            continue;
        }

        let matches = search(face.face_id.clone()).await?;
        clusters.push(FaceCluster {
            face_id: face.face_id.clone(),
            url: format!("/face/{}", face.external_image_id),
            bounding_box: face.bounding_box,
            files: similar_face_files(face, &matches, store),
        });
    }

    Ok(clusters)
}

/// True when the same `(image_id, face_id)` is already a member of any cluster.
pub fn is_processed_face(face: &Face, clusters: &[FaceCluster]) -> bool {
    clusters.iter().any(|cluster| {
        cluster
            .files
            .iter()
            .any(|file| file.image_id == face.image_id && file.face_id == face.face_id)
    })
}

fn similar_face_files(seed: &Face, matches: &[FaceMatch], store: &dyn ImageStore) -> Vec<ClusterFile> {
    let mut files = Vec::with_capacity(matches.len() + 1);
    files.push(ClusterFile::from_face(seed, store));
    files.extend(
        matches
            .iter()
            .map(|face_match| ClusterFile::from_face(&face_match.face, store)),
    );
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}
