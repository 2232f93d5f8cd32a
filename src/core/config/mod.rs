use anyhow::{anyhow, bail};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub recognition: RecognitionConfig,
    pub storage: StorageConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct RecognitionConfig {
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Every photo is indexed into this single collection.
    pub collection_id: String,
}

#[derive(Clone, Debug)]
pub enum StorageConfig {
    Local(LocalStorageConfig),
    S3(DriveConfig),
}

#[derive(Clone, Debug)]
pub struct LocalStorageConfig {
    pub root: PathBuf,
    pub public_url: String,
}

#[derive(Clone, Debug)]
pub struct DriveConfig {
    pub server: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub public_url: String,
}

const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

impl AppConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_str = |key: &str, default: &str| -> String {
            get(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database_url = get("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let server = ServerConfig {
            host: get_str("SERVER_HOST", "127.0.0.1"),
            port: get("SERVER_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        let recognition = RecognitionConfig {
            region: get_str("AWS_DEFAULT_REGION", "us-east-1"),
            access_key_id: get("AWS_ACCESS_KEY_ID").filter(|v| !v.is_empty()),
            secret_access_key: get("AWS_SECRET_ACCESS_KEY").filter(|v| !v.is_empty()),
            collection_id: get_str("COLLECTION_ID", "collectionId"),
        };

        let storage = match get_str("STORAGE_DRIVER", "local").to_lowercase().as_str() {
            "local" => StorageConfig::Local(LocalStorageConfig {
                root: PathBuf::from(get_str("STORAGE_ROOT", "./storage/app/public")),
                public_url: get_str("STORAGE_URL", "/storage"),
            }),
            "s3" => {
                let server = {
                    let server = get_str("DRIVE_SERVER", "http://localhost:9000");
                    if !server.starts_with("http://") && !server.starts_with("https://") {
                        format!("http://{}", server)
                    } else {
                        server
                    }
                };
                let bucket = get_str("DRIVE_BUCKET", "photos");
                let public_url = get_str(
                    "DRIVE_PUBLIC_URL",
                    &format!("{}/{}", server.trim_end_matches('/'), bucket),
                );
                StorageConfig::S3(DriveConfig {
                    server,
                    access_key: get_str("DRIVE_ACCESSKEY", "minioadmin"),
                    secret_key: get_str("DRIVE_SECRET", "minioadmin"),
                    bucket,
                    public_url,
                })
            }
            other => bail!("Unknown STORAGE_DRIVER '{}', expected 'local' or 's3'", other),
        };

        Ok(AppConfig {
            server,
            database_url,
            recognition,
            storage,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
