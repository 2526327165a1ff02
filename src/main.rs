//! Image Splitter - cut images into horizontal slices.
//!
//! This binary runs the command-line splitter and the HTTP service.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bytes::Bytes;
use image_splitter::{
    config::{Cli, Command, PlanConfig, ServeConfig, SplitConfig},
    server::{create_router, PlanResponse, RouterConfig},
    slice::{package, total_height, SliceArtifact, SliceProgress, SliceService},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Split(config) => run_split(config).await,
        Command::Plan(config) => run_plan(config),
        Command::Serve(config) => run_serve(config).await,
    }
}

// =============================================================================
// Split Command
// =============================================================================

async fn run_split(config: SplitConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let bytes = match tokio::fs::read(&config.input).await {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            error!("Failed to read {}: {}", config.input.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let options = config.split_options();
    let service = SliceService::new();

    let artifacts = match service
        .process_image_with_progress(bytes, &options, print_progress)
        .await
    {
        Ok(artifacts) => artifacts,
        Err(e) => {
            error!("Split failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "Rendered {} slice(s) covering {} rows",
        artifacts.len(),
        total_height(&artifacts)
    );

    let result = match config.out_dir {
        Some(ref dir) => write_slices(dir, &artifacts).await,
        None => write_archive(&config.archive_path(), artifacts, options.archive_name()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_progress(progress: SliceProgress) {
    info!(
        "  [{}/{}] rows {}..{}",
        progress.completed,
        progress.total,
        progress.window.offset_y,
        progress.window.end_y()
    );
}

/// Package the slices and write the archive to `path`.
async fn write_archive(
    path: &Path,
    artifacts: Vec<SliceArtifact>,
    name: String,
) -> Result<(), String> {
    let archive = package(artifacts, name)
        .await
        .map_err(|e| format!("Packaging failed: {}", e))?;

    tokio::fs::write(path, &archive.data)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    info!(
        "Wrote {} ({} entries, {} bytes)",
        path.display(),
        archive.entry_count,
        archive.data.len()
    );
    Ok(())
}

/// Write each slice as its own file inside `dir`.
async fn write_slices(dir: &Path, artifacts: &[SliceArtifact]) -> Result<(), String> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;

    for artifact in artifacts {
        let path = dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.data)
            .await
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }

    info!("Wrote {} file(s) to {}", artifacts.len(), dir.display());
    Ok(())
}

// =============================================================================
// Plan Command
// =============================================================================

fn run_plan(config: PlanConfig) -> ExitCode {
    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let plan = match PlanResponse::compute(config.height, config.slices, config.mode) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if config.json {
        match serde_json::to_string_pretty(&plan) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!(
        "{} px in {} slice(s), {} mode",
        config.height, config.slices, config.mode
    );
    if let Some(ref summary) = plan.summary {
        println!("Slice height: {}", summary);
    }
    println!();
    println!("  #   offset   height");
    println!("  ─────────────────────");
    for (i, (offset, height)) in plan.offsets.iter().zip(&plan.heights).enumerate() {
        println!("  {:<3} {:>6}   {:>6}", i + 1, offset, height);
    }

    ExitCode::SUCCESS
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Image Splitter v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!(
        "  Upload limit: {}MB",
        config.max_upload_bytes / (1024 * 1024)
    );
    info!("  Max slices: {}", config.max_slices);
    match config.cors_origins {
        Some(ref origins) => info!("  CORS origins: {}", origins.join(", ")),
        None => info!("  CORS origins: any"),
    }

    let router = create_router(SliceService::new(), build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl 'http://{}/plan?height=1000&slices=3'", addr);
    info!(
        "    curl --data-binary @image.png -o slices.zip 'http://{}/split?slices=4'",
        addr
    );
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::new()
        .with_max_upload_bytes(config.max_upload_bytes)
        .with_max_slices(config.max_slices)
        .with_tracing(!config.no_tracing);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "image_splitter=debug,tower_http=debug"
    } else {
        "image_splitter=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
