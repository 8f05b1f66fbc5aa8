use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::error;

const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_LOG_FORMAT: &str = "pretty";

// ─── TOML config file ─────────────────────────────────────────────────────────

/// `{data_dir}/config.toml` — all fields are optional overrides.
/// Priority: CLI / env var  >  TOML  >  built-in default.
#[derive(Deserialize, Default)]
struct TomlConfig {
    /// Base URL of the task server (default: http://127.0.0.1:8000).
    server_url: Option<String>,
    /// Log level filter string, e.g. "debug", "info,vibeboard=trace" (default: "info").
    log: Option<String>,
    /// Log output format: "pretty" (default, human-readable) | "json" (structured).
    log_format: Option<String>,
    /// Log file path (default: {data_dir}/vibe.log; rotated daily).
    log_file: Option<PathBuf>,
}

fn load_toml(data_dir: &Path) -> Option<TomlConfig> {
    let path = data_dir.join("config.toml");
    let contents = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<TomlConfig>(&contents) {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            error!(path = %path.display(), err = %e, "failed to parse config.toml — using defaults");
            None
        }
    }
}

// ─── BoardConfig ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// Base URL of the task server (VIBE_SERVER env var).
    pub server_url: String,
    pub data_dir: PathBuf,
    /// Log level filter string (VIBE_LOG env var).
    pub log: String,
    /// Log output format: "pretty" (default) | "json" (VIBE_LOG_FORMAT env var).
    pub log_format: String,
    /// Where tracing output lands. Stdout belongs to the board, so logs
    /// always go to a file (VIBE_LOG_FILE env var).
    pub log_file: PathBuf,
}

impl BoardConfig {
    /// Build config from CLI/env args + optional TOML file.
    ///
    /// Priority (highest to lowest):
    ///   1. CLI / env — passed as `Some(value)` from clap
    ///   2. TOML file at `{data_dir}/config.toml`
    ///   3. Built-in defaults
    pub fn new(
        server_url: Option<String>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        log_file: Option<PathBuf>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);

        // Load TOML as the lowest-priority override layer
        let toml = load_toml(&data_dir).unwrap_or_default();

        let server_url = server_url
            .or(toml.server_url)
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let log = log
            .or(toml.log)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_format = std::env::var("VIBE_LOG_FORMAT")
            .ok()
            .filter(|s| !s.is_empty())
            .or(toml.log_format)
            .unwrap_or_else(|| DEFAULT_LOG_FORMAT.to_string());

        let log_file = log_file
            .or(toml.log_file)
            .unwrap_or_else(|| data_dir.join("vibe.log"));

        Self {
            server_url,
            data_dir,
            log,
            log_format,
            log_file,
        }
    }
}

fn default_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        // ~/Library/Application Support/vibeboard
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("vibeboard");
        }
    }
    #[cfg(target_os = "linux")]
    {
        // $XDG_DATA_HOME/vibeboard or ~/.local/share/vibeboard
        if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("vibeboard");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home)
                .join(".local")
                .join("share")
                .join("vibeboard");
        }
    }
    #[cfg(target_os = "windows")]
    {
        // %APPDATA%\vibeboard
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("vibeboard");
        }
    }
    // Fallback
    PathBuf::from(".vibeboard")
}
