use clap::Parser;
use metadata_explorer::config::{Command, OutputFormat};
use metadata_explorer::core::{LoadedDataset, PlotSpec};
use metadata_explorer::utils::error::{ErrorSeverity, ExplorerError};
use metadata_explorer::utils::{logger, validation::Validate};
use metadata_explorer::{CliConfig, ExplorerEngine, ExplorerSettings, LocalFileSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting metadata-explorer");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    if config.monitor {
        tracing::info!("Process monitoring enabled");
    }

    let result = match config.command.clone() {
        Command::Serve {
            config: path,
            host,
            port,
            show,
        } => serve(path, host, port, show, config.monitor).await,
        Command::Summarize {
            file,
            url,
            color_by,
            format,
        } => summarize(file, url, color_by, format, config.monitor).await,
    };

    if let Err(e) = result {
        exit_with(&e);
    }
    Ok(())
}

async fn serve(
    path: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    show: bool,
    monitor: bool,
) -> metadata_explorer::Result<()> {
    let mut settings = match path {
        Some(path) => {
            tracing::info!("Loading settings from {}", path);
            ExplorerSettings::from_file(&path)?
        }
        None => ExplorerSettings::default(),
    };
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }
    settings.validate()?;

    metadata_explorer::server::serve(settings, monitor, show).await
}

async fn summarize(
    file: Option<String>,
    url: Option<String>,
    color_by: Option<String>,
    format: OutputFormat,
    monitor: bool,
) -> metadata_explorer::Result<()> {
    let engine = ExplorerEngine::new_with_monitoring(ExplorerSettings::default(), monitor)?;

    let loaded = match (file, url) {
        (Some(file), _) => engine.load(&LocalFileSource::new(file)).await?,
        (None, Some(url)) => engine.load_url(&url).await?,
        (None, None) => {
            return Err(ExplorerError::MissingConfigError {
                field: "file or url".to_string(),
            })
        }
    };
    let plot = engine
        .plot(&loaded.session_id, color_by.as_deref())
        .await?;

    match format {
        OutputFormat::Json => print_json(&loaded, &plot)?,
        OutputFormat::Tsv => print_tsv(&loaded, &plot),
    }
    Ok(())
}

fn print_json(loaded: &LoadedDataset, plot: &PlotSpec) -> metadata_explorer::Result<()> {
    let output = serde_json::json!({
        "source": loaded.source,
        "summary": loaded.summary,
        "columns": loaded.columns.iter().skip(1).collect::<Vec<_>>(),
        "plot": plot,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(loaded: &LoadedDataset, plot: &PlotSpec) {
    eprintln!("{}", loaded.summary.message);

    let header: Vec<&str> = std::iter::once("month")
        .chain(plot.series.iter().map(|s| s.name.as_str()))
        .collect();
    println!("{}", header.join("\t"));

    for (i, month) in plot.months.iter().enumerate() {
        let counts: Vec<String> = plot.series.iter().map(|s| s.counts[i].to_string()).collect();
        println!("{}\t{}", month, counts.join("\t"));
    }
}

fn exit_with(e: &ExplorerError) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

