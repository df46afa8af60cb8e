use clap::Parser;
use medichat::core::config::{self, CliOverrides, MedichatConfig};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "medichat", about = "Terminal chat with a medical clinic assistant")]
struct Args {
    /// Completion endpoint URL (overrides MEDICHAT_API_URL and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Start without the hidden clinic context turn
    #[arg(long)]
    no_context: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to medichat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("medichat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("Medichat starting up");

    let file_config = config::load_config().unwrap_or_else(|e| {
        eprintln!("Warning: {e}, using defaults");
        log::warn!("Falling back to default config: {}", e);
        MedichatConfig::default()
    });

    let overrides = CliOverrides {
        endpoint: args.endpoint,
        timeout_secs: args.timeout_secs,
        no_context: args.no_context,
    };
    let resolved = config::resolve(&file_config, &overrides);

    let provider = medichat::tui::build_provider(&resolved).map_err(|e| {
        log::error!("Startup failed: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    medichat::tui::run(resolved, provider)
}
