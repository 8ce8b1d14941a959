use crate::domain::model::SourcePayload;
use crate::domain::ports::MetadataSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// A metadata file on the local disk.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetadataSource for LocalFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<SourcePayload> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(SourcePayload {
            name: self.describe(),
            bytes,
        })
    }
}

/// Bytes the browser sent through the file input.
#[derive(Debug, Clone)]
pub struct UploadSource {
    file_name: String,
    bytes: Vec<u8>,
}

impl UploadSource {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

#[async_trait]
impl MetadataSource for UploadSource {
    fn describe(&self) -> String {
        format!("uploaded file {}", self.file_name)
    }

    async fn fetch(&self) -> Result<SourcePayload> {
        Ok(SourcePayload {
            name: self.file_name.clone(),
            bytes: self.bytes.clone(),
        })
    }
}
