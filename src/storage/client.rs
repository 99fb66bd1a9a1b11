use super::StorageService;
use crate::{Error, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{types::ObjectCannedAcl, Client as S3Client};
use std::time::Duration;

pub struct StorageClient {
    client: S3Client,
}

impl StorageClient {
    /// Wrap an existing SDK client.
    pub fn new(client: S3Client) -> Self {
        Self { client }
    }

    /// Build a client from ambient AWS configuration (environment, profile,
    /// or instance metadata). `S3_ENDPOINT_URL` overrides the endpoint for
    /// S3-compatible stores such as MinIO.
    pub async fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Ok(endpoint) = std::env::var("S3_ENDPOINT_URL") {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        Self {
            client: S3Client::new(&config),
        }
    }
}

#[async_trait]
impl StorageService for StorageClient {
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::StorageRead(format!("Failed to fetch s3://{bucket}/{key}: {e}")))?;

        let bytes = response.body.collect().await.map_err(|e| {
            Error::StorageRead(format!("Failed to read body of s3://{bucket}/{key}: {e}"))
        })?;

        Ok(bytes.to_vec())
    }

    async fn store_object(
        &self,
        bucket: &str,
        key: &str,
        data: &[u8],
        content_type: &str,
        cache_control: &str,
        public_read: bool,
    ) -> Result<()> {
        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data.to_vec()))
            .content_type(content_type)
            .cache_control(cache_control);

        if public_read {
            request = request.acl(ObjectCannedAcl::PublicRead);
        }

        request
            .send()
            .await
            .map_err(|e| Error::StorageWrite(format!("Failed to store s3://{bucket}/{key}: {e}")))?;

        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigning_config = PresigningConfig::expires_in(expires_in)
            .map_err(|e| Error::Presign(format!("Invalid presigning config: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| Error::Presign(format!("Failed to presign s3://{bucket}/{key}: {e}")))?;

        Ok(presigned.uri().to_string())
    }
}
