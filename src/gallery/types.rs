use crate::botmodels::{BoundingBox, Face};
use crate::drive::ImageStore;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use super::PHOTOS_DIR;

/// An uploaded photo as the page sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredFile {
    pub name: String,
    pub url: String,
}

/// Bucket key for the headcount grouping. Photos without a stored record land
/// in `Unknown`, which sorts after every known count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HeadcountKey {
    People(i32),
    Unknown,
}

impl fmt::Display for HeadcountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::People(count) => write!(f, "{}", count),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for HeadcountKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

pub type HeadcountGroups = BTreeMap<HeadcountKey, Vec<StoredFile>>;

/// One member of a similarity cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterFile {
    pub name: String,
    pub url: String,
    pub image_id: String,
    pub face_id: String,
}

impl ClusterFile {
    pub fn from_face(face: &Face, store: &dyn ImageStore) -> Self {
        Self {
            name: face.external_image_id.clone(),
            url: store.url(&format!("{}/{}", PHOTOS_DIR, face.external_image_id)),
            image_id: face.image_id.clone(),
            face_id: face.face_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceCluster {
    /// Face that seeded the cluster.
    pub face_id: String,
    /// Thumbnail route of the seed face, without the bounding box query.
    pub url: String,
    pub bounding_box: BoundingBox,
    /// Seed plus matches, sorted by name.
    pub files: Vec<ClusterFile>,
}

impl FaceCluster {
    pub fn thumbnail_url(&self) -> String {
        format!(
            "{}?width={}&height={}&left={}&top={}",
            self.url,
            self.bounding_box.width,
            self.bounding_box.height,
            self.bounding_box.left,
            self.bounding_box.top
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryView {
    pub images_by_number_of_people: HeadcountGroups,
    pub images_by_face: Vec<FaceCluster>,
}
