use crate::adapters::decompress::{decompress, Compression};
use crate::adapters::http::{build_client, HttpSource};
use crate::core::aggregate::{per_month, selector_options, stacked_per_month};
use crate::core::cache::TtlCache;
use crate::core::metadata::{parse_tsv, summarize};
use crate::core::{
    ColumnOption, ConfigProvider, LoadedDataset, MetadataSource, MetadataTable, PlotSpec,
};
use crate::utils::error::{ExplorerError, Result};
use crate::utils::monitor::SystemMonitor;
use reqwest::Client;
use std::sync::Arc;
use std::time::Instant;

/// Loads metadata files and answers chart queries for the sessions that hold
/// them. Parsed remote files are shared between sessions until they expire.
pub struct ExplorerEngine<C: ConfigProvider> {
    config: C,
    client: Client,
    files: TtlCache<String, Arc<MetadataTable>>,
    sessions: TtlCache<String, Arc<MetadataTable>>,
    monitor: SystemMonitor,
}

impl<C: ConfigProvider> ExplorerEngine<C> {
    pub fn new(config: C) -> Result<Self> {
        Self::new_with_monitoring(config, false)
    }

    pub fn new_with_monitoring(config: C, monitor_enabled: bool) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        let files = TtlCache::new(config.cache_ttl(), config.cache_capacity());
        let sessions = TtlCache::sliding(config.session_ttl(), config.session_capacity());

        Ok(Self {
            config,
            client,
            files,
            sessions,
            monitor: SystemMonitor::new(monitor_enabled),
        })
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Fetches `url`, reusing a cached parse of the same URL when available.
    pub async fn load_url(&self, url: &str) -> Result<LoadedDataset> {
        let source = HttpSource::new(self.client.clone(), url)?;
        let key = source.url().to_string();

        let table = match self.files.get(&key).await {
            Some(table) => {
                tracing::info!("Using cached metadata for {}", key);
                table
            }
            None => {
                let table = self.read(&source).await?;
                self.files.insert(key.clone(), table.clone()).await;
                table
            }
        };

        self.open_session(key, table).await
    }

    /// Loads from any source without caching the result.
    pub async fn load<S: MetadataSource + ?Sized>(&self, source: &S) -> Result<LoadedDataset> {
        let table = self.read(source).await?;
        self.open_session(source.describe(), table).await
    }

    pub async fn columns(&self, session_id: &str) -> Result<Vec<ColumnOption>> {
        let table = self.session(session_id).await?;
        Ok(selector_options(&table, self.config.min_unique_values()))
    }

    /// The per-month chart, or the stacked chart when `color_by` names a column.
    pub async fn plot(&self, session_id: &str, color_by: Option<&str>) -> Result<PlotSpec> {
        let table = self.session(session_id).await?;
        let column = color_by.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);
        let limit = self.config.category_limit();

        let started = Instant::now();
        let plot = tokio::task::spawn_blocking(move || match column {
            Some(column) => stacked_per_month(&table, &column, limit),
            None => Ok(per_month(&table)),
        })
        .await
        .map_err(|e| ExplorerError::ProcessingError {
            message: format!("plot task failed: {}", e),
        })??;

        tracing::debug!(
            session = session_id,
            series = plot.series.len(),
            months = plot.months.len(),
            "built plot in {:?}",
            started.elapsed()
        );
        Ok(plot)
    }

    async fn read<S: MetadataSource + ?Sized>(&self, source: &S) -> Result<Arc<MetadataTable>> {
        tracing::info!("Loading {}...", source.describe());
        let started = Instant::now();

        let payload = source.fetch().await?;
        self.monitor.log_phase("fetch");

        let table = tokio::task::spawn_blocking(move || {
            let compression = Compression::detect(&payload.name, &payload.bytes);
            let bytes = decompress(compression, payload.bytes)?;
            parse_tsv(&bytes)
        })
        .await
        .map_err(|e| ExplorerError::ProcessingError {
            message: format!("parse task failed: {}", e),
        })??;
        self.monitor.log_phase("parse");

        tracing::info!(
            rows = table.total_rows,
            kept = table.valid_rows(),
            "Loaded {} in {:?}",
            source.describe(),
            started.elapsed()
        );
        Ok(Arc::new(table))
    }

    async fn open_session(&self, source: String, table: Arc<MetadataTable>) -> Result<LoadedDataset> {
        let session_id = uuid::Uuid::new_v4().to_string();
        let summary = summarize(&table);
        let columns = selector_options(&table, self.config.min_unique_values());
        let plot = per_month(&table);

        self.sessions.insert(session_id.clone(), table).await;
        tracing::debug!(session = %session_id, "opened session for {}", source);

        Ok(LoadedDataset {
            session_id,
            source,
            summary,
            columns,
            plot,
        })
    }

    async fn session(&self, session_id: &str) -> Result<Arc<MetadataTable>> {
        self.sessions
            .get(&session_id.to_string())
            .await
            .ok_or_else(|| ExplorerError::SessionNotFound {
                id: session_id.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::UploadSource;
    use crate::config::settings::ExplorerSettings;
    use httpmock::prelude::*;
    use std::time::Duration;

    const TSV: &str = "strain\tdate\tcountry\n\
                       s1\t2020-01-05\tUSA\n\
                       s2\t2020-02-11\tChina\n\
                       s3\t2020-02-12\tPeru\n\
                       s4\t2020-XX-XX\tUSA\n";

    fn engine() -> ExplorerEngine<ExplorerSettings> {
        ExplorerEngine::new(ExplorerSettings::default()).unwrap()
    }

    #[tokio::test]
    async fn test_load_upload_opens_session() {
        let engine = engine();
        let loaded = engine
            .load(&UploadSource::new("sample.tsv", TSV.as_bytes().to_vec()))
            .await
            .unwrap();

        assert_eq!(loaded.summary.total_rows, 4);
        assert_eq!(loaded.summary.dropped_rows, 1);
        assert_eq!(loaded.plot.months, vec!["2020-01", "2020-02"]);
        assert_eq!(loaded.columns[0].column, "");
        assert_eq!(loaded.columns.len(), 4);
        assert!(loaded.columns.iter().any(|c| c.label == "country (n=3)"));

        let stacked = engine
            .plot(&loaded.session_id, Some("country"))
            .await
            .unwrap();
        assert_eq!(stacked.series.len(), 3);
        assert_eq!(stacked.totals(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_blank_color_by_gives_per_month_plot() {
        let engine = engine();
        let loaded = engine
            .load(&UploadSource::new("sample.tsv", TSV.as_bytes().to_vec()))
            .await
            .unwrap();

        let plot = engine.plot(&loaded.session_id, Some("  ")).await.unwrap();
        assert_eq!(plot, loaded.plot);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let err = engine().plot("missing", None).await.unwrap_err();
        assert!(matches!(err, ExplorerError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_idle_session_expires() {
        let mut settings = ExplorerSettings::default();
        settings.sessions.ttl_seconds = 1;
        let engine = ExplorerEngine::new(settings).unwrap();

        let loaded = engine
            .load(&UploadSource::new("sample.tsv", TSV.as_bytes().to_vec()))
            .await
            .unwrap();
        assert!(engine.columns(&loaded.session_id).await.is_ok());

        tokio::time::sleep(Duration::from_millis(1300)).await;
        let err = engine.plot(&loaded.session_id, None).await.unwrap_err();
        assert!(matches!(err, ExplorerError::SessionNotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_url_is_cached() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/metadata.tsv");
            then.status(200).body(TSV);
        });

        let engine = engine();
        let first = engine.load_url(&server.url("/metadata.tsv")).await.unwrap();
        let second = engine.load_url(&server.url("/metadata.tsv")).await.unwrap();

        mock.assert_hits(1);
        assert_ne!(first.session_id, second.session_id);
        assert_eq!(first.summary, second.summary);
    }

    #[tokio::test]
    async fn test_missing_date_column_is_reported() {
        let err = engine()
            .load(&UploadSource::new("bad.tsv", b"strain\tcountry\ns1\tUSA\n".to_vec()))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Metadata must have a date column.");
    }
}
