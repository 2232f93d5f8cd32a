use super::{join_url, validate_path, ImageStore, StorageError};
use crate::core::config::DriveConfig;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Builder as S3ConfigBuilder, Client as S3Client};
use log::info;

pub struct S3Store {
    client: S3Client,
    bucket: String,
    public_url: String,
}

impl S3Store {
    pub async fn new(config: &DriveConfig) -> Self {
        let endpoint = if !config.server.ends_with('/') {
            format!("{}/", config.server)
        } else {
            config.server.clone()
        };

        let base_config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(endpoint)
            .region("auto")
            .credentials_provider(aws_sdk_s3::config::Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "static",
            ))
            .load()
            .await;

        let s3_config = S3ConfigBuilder::from(&base_config)
            .force_path_style(true)
            .build();

        Self::from_client(
            S3Client::from_conf(s3_config),
            config.bucket.clone(),
            config.public_url.clone(),
        )
    }

    pub fn from_client(client: S3Client, bucket: String, public_url: String) -> Self {
        Self {
            client,
            bucket,
            public_url,
        }
    }

    /// Keys under `prefix`, sorted. With `delimited` only direct children are
    /// returned; without it the listing recurses into nested prefixes.
    async fn list_keys(&self, prefix: &str, delimited: bool) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation_token.take());
            if delimited {
                request = request.delimiter("/");
            }
            let output = request
                .send()
                .await
                .map_err(|e| backend_error("ListObjectsV2", e))?;

            for object in output.contents() {
                if let Some(key) = object.key() {
                    if key.len() > prefix.len() {
                        keys.push(key.to_string());
                    }
                }
            }

            match output.next_continuation_token() {
                Some(token) => continuation_token = Some(token.to_string()),
                None => break,
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn backend_error(operation: &str, err: impl std::error::Error) -> StorageError {
    StorageError::Backend(format!("{}: {}", operation, DisplayErrorContext(&err)))
}

#[async_trait]
impl ImageStore for S3Store {
    async fn put(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let key = validate_path(path)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| backend_error("PutObject", e))?;
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let key = validate_path(path)?;
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let missing = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                if missing {
                    return Err(StorageError::NotFound(path.to_string()));
                }
                return Err(backend_error("GetObject", err));
            }
        };

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| backend_error("GetObject body", e))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn files(&self, directory: &str) -> Result<Vec<String>, StorageError> {
        let prefix = format!("{}/", validate_path(directory)?);
        self.list_keys(&prefix, true).await
    }

    async fn delete_directory(&self, directory: &str) -> Result<(), StorageError> {
        let prefix = format!("{}/", validate_path(directory)?);
        let keys = self.list_keys(&prefix, false).await?;
        for key in &keys {
            self.client
                .delete_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|e| backend_error("DeleteObject", e))?;
        }
        info!(
            "Deleted {} objects under s3://{}/{}",
            keys.len(),
            self.bucket,
            directory
        );
        Ok(())
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.public_url, path)
    }
}
