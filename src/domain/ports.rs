use crate::domain::model::SourcePayload;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Somewhere a metadata file can be read from.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Human-readable origin, used in logs and the load summary.
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<SourcePayload>;
}

pub trait ConfigProvider: Send + Sync {
    fn cache_ttl(&self) -> Duration;
    fn cache_capacity(&self) -> usize;
    fn session_ttl(&self) -> Duration;
    fn session_capacity(&self) -> usize;
    fn category_limit(&self) -> usize;
    fn min_unique_values(&self) -> usize;
    fn request_timeout(&self) -> Duration;
}
