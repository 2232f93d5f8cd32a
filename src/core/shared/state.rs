use crate::botmodels::FaceRecognizer;
use crate::core::config::AppConfig;
use crate::core::shared::utils::DbPool;
use crate::drive::ImageStore;
use std::sync::Arc;

pub struct AppState {
    pub config: AppConfig,
    pub conn: DbPool,
    pub recognizer: Arc<dyn FaceRecognizer>,
    pub store: Arc<dyn ImageStore>,
}

impl AppState {
    pub fn collection_id(&self) -> &str {
        &self.config.recognition.collection_id
    }
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            conn: self.conn.clone(),
            recognizer: Arc::clone(&self.recognizer),
            store: Arc::clone(&self.store),
        }
    }
}
