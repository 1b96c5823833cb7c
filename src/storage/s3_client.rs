//! S3 storage client
//!
//! Wraps the AWS SDK. Works against AWS proper or any S3-compatible
//! endpoint when `S3_ENDPOINT` is set.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    primitives::ByteStream,
    Client,
};

use crate::config::StorageConfig;
use crate::error::StorageError;

use super::types::StorageObject;
use super::ObjectStore;

/// S3 storage client
#[derive(Clone)]
pub struct S3Client {
    client: Client,
}

impl S3Client {
    /// Create a new S3 client from the shared AWS config
    pub async fn new(sdk_config: &SdkConfig, config: &StorageConfig) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);
        if let Some(endpoint) = &config.endpoint {
            // Required for MinIO and other S3-compatible services
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        for bucket in [&config.pdf_bucket, &config.xml_bucket] {
            match client.head_bucket().bucket(bucket).send().await {
                Ok(_) => tracing::info!("Connected to S3 bucket: {}", bucket),
                Err(e) => tracing::warn!(
                    "Could not verify bucket {}: {}. Will attempt operations anyway.",
                    bucket,
                    DisplayErrorContext(&e)
                ),
            }
        }

        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<StorageObject, StorageError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, key))?;

        let content_type = response.content_type().map(|s| s.to_string());
        let metadata = response.metadata().cloned().unwrap_or_default();

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::SdkError(format!("Failed to read object body: {}", e)))?
            .into_bytes()
            .to_vec();

        Ok(StorageObject {
            key: key.to_string(),
            data,
            content_type,
            metadata,
        })
    }

    async fn put_object(&self, bucket: &str, object: StorageObject) -> Result<(), StorageError> {
        let key = object.key;
        let size = object.data.len();

        self.client
            .put_object()
            .bucket(bucket)
            .key(&key)
            .body(ByteStream::from(object.data))
            .set_content_type(object.content_type)
            .set_metadata(Some(object.metadata))
            .send()
            .await
            .map_err(|e| map_sdk_error(e, bucket, &key))?;

        tracing::debug!(bucket = %bucket, key = %key, bytes = size, "Stored object");
        Ok(())
    }
}

fn map_sdk_error<E, R>(err: SdkError<E, R>, bucket: &str, key: &str) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err.code() {
        Some("NoSuchKey") | Some("NotFound") => StorageError::ObjectNotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        Some("NoSuchBucket") => StorageError::BucketNotFound(bucket.to_string()),
        _ => StorageError::SdkError(format!("{}/{}: {}", bucket, key, DisplayErrorContext(&err))),
    }
}
