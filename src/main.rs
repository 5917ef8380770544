//! map-cutter - Cut a large map image into zoomable tiles.
//!
//! This binary parses the CLI, writes tiles to disk and prints a summary.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use map_cutter::{
    Config, FileImageSource, FileTileHandler, PyramidError, PyramidReport, SummaryFormat,
    TileMap, TracingObserver,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    run(config).await
}

async fn run(config: Config) -> ExitCode {
    let pyramid_config = config.pyramid_config();

    info!("Configuration:");
    info!("  Input: {}", config.input.display());
    info!("  Output: {}", config.output.display());
    info!("  Tile size: {}px", pyramid_config.tile_size);
    info!("  Filter: {:?}", pyramid_config.filter);
    info!("  Format: {}", pyramid_config.format.extension());

    let handler = FileTileHandler::new(&config.output, pyramid_config.format);
    if let Err(e) = handler.ensure_output_dir() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }

    let source = FileImageSource::new(&config.input);
    let map = match TileMap::open(&source, pyramid_config).await {
        Ok(map) => map,
        Err(e) => {
            error!("Failed to load {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Cutting {} tiles across {} zoom levels",
        map.plan().total_tiles(),
        map.plan().level_count()
    );

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let result = map
        .cut_all_tiles_with(Arc::new(handler), Arc::new(TracingObserver::new()), cancel)
        .await;

    match result {
        Ok(report) => {
            print_summary(&report, config.summary);
            ExitCode::SUCCESS
        }
        Err(PyramidError::Incomplete { report, failures }) => {
            print_summary(&report, config.summary);
            error!(
                "{} level(s) incomplete; output in {} is partial",
                failures.len(),
                config.output.display()
            );
            ExitCode::FAILURE
        }
        Err(PyramidError::WorkerPanicked {
            zoom,
            message,
            report,
            ..
        }) => {
            print_summary(&report, config.summary);
            error!("Worker for zoom {} panicked: {}", zoom, message);
            ExitCode::FAILURE
        }
        Err(PyramidError::Cancelled { report }) => {
            print_summary(&report, config.summary);
            warn!("Cancelled; output in {} is partial", config.output.display());
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Cancel the run on the first Ctrl-C.
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current tiles");
            cancel.cancel();
        }
    });
}

fn print_summary(report: &PyramidReport, format: SummaryFormat) {
    match format {
        SummaryFormat::Text => {
            for level in &report.levels {
                info!(
                    "  zoom {:>2}: {:>6}/{:<6} tiles  {:>5}px  {:?}",
                    level.zoom,
                    level.tiles_written,
                    level.tiles_expected,
                    level.resolution,
                    level.status
                );
            }
            info!(
                "Done: {} of {} tiles in {}ms",
                report.tiles_written(),
                report.tiles_expected(),
                report.elapsed_ms
            );
        }
        SummaryFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => error!("Failed to serialize report: {}", e),
        },
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "map_cutter=debug"
    } else {
        "map_cutter=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
