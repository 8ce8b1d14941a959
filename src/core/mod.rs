pub mod aggregate;
pub mod cache;
pub mod explorer;
pub mod metadata;

pub use crate::domain::model::{
    ColumnOption, Dataset, LoadSummary, LoadedDataset, MetadataTable, PlotSpec, Series,
};
pub use crate::domain::ports::{ConfigProvider, MetadataSource};
pub use crate::utils::error::Result;
