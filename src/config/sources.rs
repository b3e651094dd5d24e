use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "ROSTERBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/rosterbox.toml";
const ENV_PREFIX: &str = "ROSTERBOX";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load(path: Option<PathBuf>) -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = path.unwrap_or_else(|| {
        env::var(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    });

    let mut config = load_from_sources(config_path)?;

    apply_legacy_env(&mut config);

    Ok(config)
}

/// Honour the plain variables older deployments already set.
/// The connection string is a secret and never belongs in the TOML file.
fn apply_legacy_env(config: &mut Config) {
    if let Ok(uri) = env::var("MONGO_URI") {
        config.database.uri = uri;
    }

    if let Ok(port) = env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => {
                config.server.bind_addr = SocketAddr::new(config.server.bind_addr.ip(), port);
            }
            Err(_) => tracing::warn!(%port, "Ignoring PORT, not a valid port number"),
        }
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // ROSTERBOX__DATABASE__BACKEND -> database.backend
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
