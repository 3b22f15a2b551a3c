use cattag::ImageSize;
use cattag::core::config::{self, CliOverrides, ConfigOrigin};
use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cattag", about = "Browse cat pictures by tag in the terminal")]
struct Args {
    /// Image service base URL (overrides CATTAG_BASE_URL and the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Image size variant requested from the service
    #[arg(short, long, value_enum)]
    size: Option<ImageSize>,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let (file_config, origin) = config::load_config().map_err(std::io::Error::other)?;
    let overrides = CliOverrides {
        base_url: args.base_url,
        image_size: args.size,
        log_level: args.log_level,
        log_file: args.log_file,
    };
    let resolved = config::resolve(&file_config, &overrides).map_err(std::io::Error::other)?;

    // File logger: the terminal belongs to the TUI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    // Config was read before the logger existed; report how it went
    match &origin {
        ConfigOrigin::File(_) | ConfigOrigin::Generated(_) => log::info!("{}", origin),
        ConfigOrigin::GenerateFailed { .. } | ConfigOrigin::NoHomeDir => log::warn!("{}", origin),
    }

    log::info!(
        "cattag starting up: base_url={}, size={:?}, {} suggestions",
        resolved.base_url,
        resolved.image_size,
        resolved.suggestions.len()
    );

    cattag::tui::run(resolved)
}
