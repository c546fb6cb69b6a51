use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use podlogs_config::shared::ObjectStoreConfig;
use secrecy::ExposeSecret;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{ErrorKind, PodLogsResult};
use crate::podlogs_error;
use crate::store::ContentStore;

/// Upper bound for list, stat and read calls.
const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound for uploads.
const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

const CONTENT_TYPE: &str = "application/octet-stream";

/// Name attached to the static credentials for SDK diagnostics.
const CREDENTIALS_PROVIDER_NAME: &str = "podlogs-static";

/// [`ContentStore`] backed by an S3 compatible bucket.
///
/// Every call is bounded by a short timeout so a slow store cannot stall the
/// reconciliation loop.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Builds a client for the bucket described by `config`. Uses path-style
    /// addressing so that self-hosted endpoints such as MinIO work unchanged.
    pub async fn new(config: &ObjectStoreConfig) -> S3Store {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.expose_secret().to_string(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url())
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        info!(
            endpoint = config.endpoint_url(),
            bucket = config.bucket,
            "created s3 store"
        );

        S3Store {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    /// Verifies that the bucket is reachable with the configured credentials.
    pub async fn check_connection(&self) -> PodLogsResult<()> {
        with_timeout(READ_TIMEOUT, async {
            self.client
                .head_bucket()
                .bucket(&self.bucket)
                .send()
                .await
                .map_err(|err| {
                    podlogs_error!(
                        ErrorKind::StoreConnectionFailed,
                        "failed to reach bucket",
                        DisplayErrorContext(&err)
                    )
                })?;

            Ok(())
        })
        .await
    }

    async fn list_all(&self) -> PodLogsResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|err| {
                    podlogs_error!(
                        ErrorKind::StoreReadFailed,
                        "failed to list objects",
                        DisplayErrorContext(&err)
                    )
                })?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key())
                    .map(str::to_string),
            );

            match response.next_continuation_token() {
                Some(token) if response.is_truncated().unwrap_or(false) => {
                    continuation_token = Some(token.to_string());
                }
                _ => break,
            }
        }

        Ok(keys)
    }
}

#[async_trait]
impl ContentStore for S3Store {
    async fn list(&self) -> PodLogsResult<Vec<String>> {
        let keys = with_timeout(READ_TIMEOUT, self.list_all()).await?;
        debug!(bucket = self.bucket, count = keys.len(), "listed objects");

        Ok(keys)
    }

    async fn has(&self, key: &str) -> PodLogsResult<bool> {
        with_timeout(READ_TIMEOUT, async {
            match self
                .client
                .head_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
            {
                Ok(_) => Ok(true),
                Err(err)
                    if err
                        .as_service_error()
                        .is_some_and(|service_err| service_err.is_not_found())
                        || err
                            .raw_response()
                            .is_some_and(|response| response.status().as_u16() == 404) =>
                {
                    Ok(false)
                }
                Err(err) => Err(podlogs_error!(
                    ErrorKind::StoreReadFailed,
                    "failed to stat object",
                    DisplayErrorContext(&err)
                )),
            }
        })
        .await
    }

    async fn get(&self, key: &str) -> PodLogsResult<Vec<u8>> {
        with_timeout(READ_TIMEOUT, async {
            let response = self
                .client
                .get_object()
                .bucket(&self.bucket)
                .key(key)
                .send()
                .await
                .map_err(|err| {
                    if err
                        .as_service_error()
                        .is_some_and(|service_err| service_err.is_no_such_key())
                    {
                        podlogs_error!(ErrorKind::StoreObjectNotFound, "object does not exist", key)
                    } else {
                        podlogs_error!(
                            ErrorKind::StoreReadFailed,
                            "failed to get object",
                            DisplayErrorContext(&err)
                        )
                    }
                })?;

            let data = response.body.collect().await.map_err(|err| {
                podlogs_error!(ErrorKind::StoreReadFailed, "failed to read object", err)
            })?;

            Ok(data.into_bytes().to_vec())
        })
        .await
    }

    async fn put(&self, key: &str, data: Vec<u8>) -> PodLogsResult<()> {
        let size = data.len();
        with_timeout(WRITE_TIMEOUT, async {
            self.client
                .put_object()
                .bucket(&self.bucket)
                .key(key)
                .body(ByteStream::from(data))
                .content_type(CONTENT_TYPE)
                .send()
                .await
                .map_err(|err| {
                    podlogs_error!(
                        ErrorKind::StoreWriteFailed,
                        "failed to put object",
                        DisplayErrorContext(&err)
                    )
                })?;

            Ok(())
        })
        .await?;

        debug!(bucket = self.bucket, key, size, "stored object");

        Ok(())
    }
}

async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = PodLogsResult<T>>,
) -> PodLogsResult<T> {
    timeout(duration, future).await?
}
