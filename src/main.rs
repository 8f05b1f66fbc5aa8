use anyhow::Result;
use clap::Parser;
use tracing::info;

use vibeboard::config::BoardConfig;
use vibeboard::ui::BoardUi;

#[derive(Parser)]
#[command(
    name = "vibe",
    about = "Vibe Board — terminal client for a shared task list",
    version
)]
struct Args {
    /// Base URL of the task server
    #[arg(long, env = "VIBE_SERVER")]
    server: Option<String>,

    /// Data directory for config and logs
    #[arg(long, env = "VIBE_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "VIBE_LOG")]
    log: Option<String>,

    /// Write logs to this file path (rotated daily; default: {data_dir}/vibe.log)
    #[arg(long, env = "VIBE_LOG_FILE")]
    log_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = BoardConfig::new(args.server, args.data_dir, args.log, args.log_file);

    // ── Logging setup ────────────────────────────────────────────────────────
    // Init once — must happen before any tracing calls. Stdout belongs to the
    // board, so logs only ever go to the file.
    let _file_guard = setup_logging(&config.log, &config.log_file, &config.log_format);

    info!(
        server = %config.server_url,
        data_dir = %config.data_dir.display(),
        "vibe board starting"
    );

    BoardUi::new(&config).run().await
}

/// Initialize the tracing subscriber writing to a daily-rolling file.
/// Returns a `WorkerGuard` that must stay alive for the process lifetime.
///
/// `log_format` may be `"pretty"` (default, human-readable format) or
/// `"json"` (structured JSON for log aggregators).
///
/// If the log directory cannot be created, logging is disabled with a warning
/// on stderr — never panics, and never touches the board's stdout.
fn setup_logging(
    log_level: &str,
    log_file: &std::path::Path,
    log_format: &str,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let use_json = log_format == "json";

    let dir = log_file
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."));
    let filename = log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("vibe.log"));

    // Ensure the directory exists before tracing-appender tries to open it.
    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!(
            "warn: could not create log directory '{}': {e} — logging disabled",
            dir.display()
        );
        return None;
    }

    let appender = tracing_appender::rolling::daily(dir, filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    if use_json {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().json().with_writer(non_blocking))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::new(log_level))
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .init();
    }

    Some(guard)
}
