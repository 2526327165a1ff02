//! Configuration management for the image splitter.
//!
//! This module provides the command-line interface, which supports:
//! - Command-line arguments via clap
//! - Environment variables with `SPLITTER_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Commands
//!
//! - `split <INPUT>` - Split an image file into a ZIP archive or a directory
//! - `plan` - Print slice heights for a given image height
//! - `serve` - Run the HTTP service
//!
//! # Environment Variables
//!
//! - `SPLITTER_SLICES` - Number of slices (default: 2)
//! - `SPLITTER_MODE` - `balanced` or `last` (default: balanced)
//! - `SPLITTER_FORMAT` - `png` or `jpeg` (default: png)
//! - `SPLITTER_QUALITY` - JPEG quality 0.1-1.0 (default: 0.8)
//! - `SPLITTER_BACKGROUND` - JPEG background color (default: #ffffff)
//! - `SPLITTER_HOST` - Server bind address (default: 0.0.0.0)
//! - `SPLITTER_PORT` - Server port (default: 3000)
//! - `SPLITTER_MAX_UPLOAD_BYTES` - Upload limit (default: 50MB)
//! - `SPLITTER_MAX_SLICES` - Slice count limit per request (default: 50)
//! - `SPLITTER_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::codec::{is_valid_quality, BackgroundColor, OutputFormat, DEFAULT_QUALITY};
use crate::server::{DEFAULT_MAX_SLICES, DEFAULT_MAX_UPLOAD_BYTES};
use crate::slice::{
    archive_name, check_prefix, default_prefix, SplitMode, SplitOptions, DEFAULT_SLICE_COUNT,
    MIN_SLICE_COUNT,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Image Splitter - cut an image into horizontal slices.
///
/// Slices are exported as independent PNG or JPEG files and bundled into a
/// single ZIP archive.
#[derive(Parser, Debug, Clone)]
#[command(name = "image-splitter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Consume the parsed CLI and return the selected command.
    pub fn into_command(self) -> Command {
        self.command
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split an image file into slices
    Split(SplitConfig),

    /// Print the slice heights a split would produce
    Plan(PlanConfig),

    /// Run the HTTP service
    Serve(ServeConfig),
}

// =============================================================================
// Split Command
// =============================================================================

/// Options for the `split` command.
#[derive(Args, Debug, Clone)]
pub struct SplitConfig {
    /// Image file to split.
    pub input: PathBuf,

    /// Number of slices.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SLICE_COUNT, env = "SPLITTER_SLICES")]
    pub slices: u32,

    /// Remainder distribution: `balanced` or `last`.
    #[arg(long, default_value_t = SplitMode::Balanced, env = "SPLITTER_MODE")]
    pub mode: SplitMode,

    /// Output format: `png` or `jpeg`.
    #[arg(short, long, default_value_t = OutputFormat::Png, env = "SPLITTER_FORMAT")]
    pub format: OutputFormat,

    /// JPEG quality between 0.1 and 1.0.
    #[arg(short, long, default_value_t = DEFAULT_QUALITY, env = "SPLITTER_QUALITY")]
    pub quality: f32,

    /// File name prefix for the slices.
    ///
    /// Defaults to the input file name without its extension.
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// JPEG background color for transparent pixels.
    #[arg(long, default_value_t = BackgroundColor::WHITE, env = "SPLITTER_BACKGROUND")]
    pub background: BackgroundColor,

    /// Archive path (default: `<prefix>_all.zip` in the current directory).
    #[arg(short, long, conflicts_with = "out_dir")]
    pub output: Option<PathBuf>,

    /// Write the individual slice files to this directory instead of an archive.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl SplitConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.slices < MIN_SLICE_COUNT {
            return Err(format!(
                "slices must be at least {}, got {}",
                MIN_SLICE_COUNT, self.slices
            ));
        }

        if self.format == OutputFormat::Jpeg && !is_valid_quality(self.quality) {
            return Err("quality must be between 0.1 and 1.0".to_string());
        }

        check_prefix(&self.prefix())?;

        Ok(())
    }

    /// Prefix for slice names: explicit, or derived from the input path.
    pub fn prefix(&self) -> String {
        match &self.prefix {
            Some(prefix) => prefix.clone(),
            None => default_prefix(&self.input.to_string_lossy()),
        }
    }

    /// Build the split options for this invocation.
    pub fn split_options(&self) -> SplitOptions {
        SplitOptions::new(self.slices)
            .with_mode(self.mode)
            .with_format(self.format)
            .with_quality(self.quality)
            .with_prefix(self.prefix())
            .with_background(self.background)
    }

    /// Where the archive is written.
    pub fn archive_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => Path::new(".").join(archive_name(&self.prefix())),
        }
    }
}

// =============================================================================
// Plan Command
// =============================================================================

/// Options for the `plan` command.
#[derive(Args, Debug, Clone)]
pub struct PlanConfig {
    /// Image height in pixels.
    #[arg(long)]
    pub height: u32,

    /// Number of slices.
    #[arg(short = 'n', long, default_value_t = DEFAULT_SLICE_COUNT, env = "SPLITTER_SLICES")]
    pub slices: u32,

    /// Remainder distribution: `balanced` or `last`.
    #[arg(long, default_value_t = SplitMode::Balanced, env = "SPLITTER_MODE")]
    pub mode: SplitMode,

    /// Print JSON instead of a table.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

impl PlanConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.slices == 0 {
            return Err("slices must be at least 1".to_string());
        }

        if self.slices > DEFAULT_MAX_SLICES {
            return Err(format!(
                "slices must be at most {}, got {}",
                DEFAULT_MAX_SLICES, self.slices
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Serve Command
// =============================================================================

/// Options for the `serve` command.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "SPLITTER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "SPLITTER_PORT")]
    pub port: u16,

    /// Largest accepted upload in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "SPLITTER_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    /// Largest slice count a request may ask for.
    #[arg(long, default_value_t = DEFAULT_MAX_SLICES, env = "SPLITTER_MAX_SLICES")]
    pub max_slices: u32,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "SPLITTER_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }

        if self.max_slices < MIN_SLICE_COUNT {
            return Err(format!("max_slices must be at least {}", MIN_SLICE_COUNT));
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
