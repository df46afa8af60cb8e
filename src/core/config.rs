//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.medichat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Everything is read once at startup.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::inference::providers::gemini::endpoint_host;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MedichatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub context_prompt: Option<String>,
    pub context_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const ENDPOINT_ENV_VAR: &str = "MEDICHAT_API_URL";

const DEFAULT_CONTEXT_PROMPT: &str = "You are the assistant of a medical clinic's patient portal. \
    Help visitors find the right department, explain how to book, reschedule or cancel an appointment, \
    and answer general questions about opening hours, doctors and services. \
    Keep answers short and friendly. Never give a diagnosis or medication advice; \
    suggest booking an appointment with a doctor instead. \
    If a question is unrelated to the clinic, politely say you can only help with clinic matters.";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Completion endpoint; `None` if no layer supplied one.
    pub endpoint_url: Option<String>,
    pub request_timeout: Duration,
    /// Hidden context turn; `None` disables seeding.
    pub context_prompt: Option<String>,
}

impl ResolvedConfig {
    /// Displayable endpoint host (the URL itself may carry an API key).
    pub fn endpoint_label(&self) -> String {
        self.endpoint_url
            .as_deref()
            .map(endpoint_host)
            .unwrap_or_else(|| "no endpoint".to_string())
    }
}

/// Values taken from the command line.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
    pub no_context: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    MissingEndpoint,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingEndpoint => write!(
                f,
                "no completion endpoint configured (set {ENDPOINT_ENV_VAR}, [endpoint] url in the config file, or pass --endpoint)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.medichat/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".medichat"))
}

/// Returns the path to `~/.medichat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.medichat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MedichatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MedichatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MedichatConfig::default());
        }
    };
    load_config_from(&path)
}

/// Load config from an explicit path (see [`load_config`]).
pub fn load_config_from(path: &Path) -> Result<MedichatConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(MedichatConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: MedichatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: context_prompt set={}, context_file={:?}, timeout={:?}",
        config.general.context_prompt.is_some(),
        config.general.context_file,
        config.endpoint.timeout_secs,
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Medichat Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# context_prompt = "You are the assistant of a medical clinic."
# context_file = "context.md"        # Path relative to ~/.medichat/

# [endpoint]
# url = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=..."
#                                    # Or set MEDICHAT_API_URL env var
# timeout_secs = 60
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &MedichatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, std::env::var(ENDPOINT_ENV_VAR).ok())
}

fn resolve_with_env(
    config: &MedichatConfig,
    cli: &CliOverrides,
    env_endpoint: Option<String>,
) -> ResolvedConfig {
    // Endpoint: CLI → env → config
    let endpoint_url = cli
        .endpoint
        .clone()
        .or(env_endpoint)
        .or_else(|| config.endpoint.url.clone())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let timeout_secs = cli
        .timeout_secs
        .or(config.endpoint.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let context_prompt = if cli.no_context {
        None
    } else {
        Some(resolve_context_prompt(config, config_dir().as_deref()))
    };

    ResolvedConfig {
        endpoint_url,
        request_timeout: Duration::from_secs(timeout_secs),
        context_prompt,
    }
}

/// Resolves the hidden context prompt: inline wins over file, both win over default.
fn resolve_context_prompt(config: &MedichatConfig, base_dir: Option<&Path>) -> String {
    if let Some(ref prompt) = config.general.context_prompt {
        return prompt.clone();
    }

    if let (Some(file), Some(base)) = (&config.general.context_file, base_dir) {
        let prompt_path = base.join(file);
        match fs::read_to_string(&prompt_path) {
            Ok(contents) => {
                let trimmed = contents.trim().to_string();
                if !trimmed.is_empty() {
                    info!("Loaded context prompt from {}", prompt_path.display());
                    return trimmed;
                }
                warn!("Context prompt file is empty: {}", prompt_path.display());
            }
            Err(e) => {
                warn!(
                    "Failed to read context prompt file {}: {}",
                    prompt_path.display(),
                    e
                );
            }
        }
    }

    DEFAULT_CONTEXT_PROMPT.to_string()
}
