// Adapters layer: where metadata bytes come from and how they are unpacked.

pub mod decompress;
pub mod http;
pub mod local;

pub use http::HttpSource;
pub use local::{LocalFileSource, UploadSource};
