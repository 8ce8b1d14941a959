use crate::domain::model::SourcePayload;
use crate::domain::ports::MetadataSource;
use crate::utils::error::{ExplorerError, Result};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds the client shared by every remote load.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("metadata-explorer/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// A metadata file served over http(s).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(client: Client, url: impl Into<String>) -> Result<Self> {
        let url = url.into().trim().to_string();
        validate_url("url", &url)?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MetadataSource for HttpSource {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<SourcePayload> {
        tracing::debug!("Requesting {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        tracing::debug!("Response status for {}: {}", self.url, status);

        if !status.is_success() {
            return Err(ExplorerError::UpstreamError {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let bytes = response.bytes().await?.to_vec();
        tracing::debug!("Downloaded {} bytes from {}", bytes.len(), self.url);

        Ok(SourcePayload {
            name: self.url.clone(),
            bytes,
        })
    }
}
