use std::time::Duration;

use anyhow::Context;

use crate::foundation::core::ContentAddress;
use crate::foundation::error::{TraitstackError, TraitstackResult};
use crate::publish::store::Publisher;

/// Upload endpoint of the pinning service.
pub const DEFAULT_UPLOAD_URL: &str = "https://uploads.pinata.cloud/v3/files";

/// Timeout for a single archive upload.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Environment variable holding the pinning-service JWT.
pub const ENV_JWT: &str = "PINATA_JWT";

/// Publishes archives to an IPFS pinning service with a bearer token.
pub struct PinataPublisher {
    upload_url: String,
    jwt: String,
    client: reqwest::blocking::Client,
}

#[derive(serde::Deserialize)]
struct UploadResponse {
    data: Option<UploadData>,
}

#[derive(serde::Deserialize)]
struct UploadData {
    cid: Option<String>,
}

impl PinataPublisher {
    /// Publisher posting to `upload_url` with `jwt`, failing any upload that exceeds `timeout`.
    pub fn new(
        upload_url: impl Into<String>,
        jwt: impl Into<String>,
        timeout: Duration,
    ) -> TraitstackResult<Self> {
        let jwt = jwt.into();
        if jwt.trim().is_empty() {
            return Err(TraitstackError::configuration(
                "pinning service JWT must be non-empty",
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            upload_url: upload_url.into(),
            jwt,
            client,
        })
    }

    /// Publisher for the default endpoint, reading the JWT from `PINATA_JWT`.
    pub fn from_env() -> TraitstackResult<Self> {
        let jwt = std::env::var(ENV_JWT)
            .map_err(|_| TraitstackError::configuration(format!("{ENV_JWT} is not set")))?;
        Self::new(DEFAULT_UPLOAD_URL, jwt, DEFAULT_TIMEOUT)
    }
}

impl Publisher for PinataPublisher {
    #[tracing::instrument(skip(self, bytes), fields(bytes = bytes.len()))]
    fn publish(&self, name: &str, bytes: &[u8]) -> TraitstackResult<ContentAddress> {
        let part = reqwest::blocking::multipart::Part::bytes(bytes.to_vec())
            .file_name(format!("{name}.zip"))
            .mime_str("application/zip")
            .context("build upload part")?;
        let form = reqwest::blocking::multipart::Form::new()
            .part("file", part)
            .text("name", name.to_string())
            .text("network", "public");

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.jwt)
            .multipart(form)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    TraitstackError::Other(anyhow::anyhow!("upload timed out: {e}"))
                } else {
                    TraitstackError::Other(anyhow::anyhow!("upload request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TraitstackError::Other(anyhow::anyhow!(
                "upload rejected with status {status}: {body}"
            )));
        }

        let parsed: UploadResponse = response.json().context("parse upload response")?;
        let cid = parsed
            .data
            .and_then(|d| d.cid)
            .ok_or_else(|| TraitstackError::Other(anyhow::anyhow!("upload response has no cid")))?;
        tracing::info!(cid = %cid, "archive pinned");
        ContentAddress::new(cid)
    }
}
