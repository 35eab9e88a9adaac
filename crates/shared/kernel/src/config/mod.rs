use crate::domain::constants::{ENV_PREFIX, ENV_SEPARATOR};
use config::{Config, Environment, File, Map};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default config file name, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "server.toml";

#[slotbook_derive::slotbook_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered settings: optional file first, then `SLOTBOOK__*` environment overrides.
///
/// Nested keys use a double underscore, so `SLOTBOOK__BOOKING__ALLOW_RESET=true` maps to
/// `booking.allow_reset`. A missing file is not an error; every field has a default.
///
/// # Errors
/// Returns [`ConfigError::Config`] if the file is malformed or a value has the wrong type.
///
/// # Example
/// ```rust
/// use slotbook_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// #[serde(default)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local.toml")).unwrap_or_default();
/// assert_eq!(cfg.port, 0);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, None)
}

/// Same as [`load_config`], but environment overrides come from `env` instead of the process.
///
/// # Errors
/// See [`load_config`].
pub fn load_config_with_env<T>(
    path: Option<impl AsRef<Path>>,
    env: Map<String, String>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    load_layered(path, Some(env))
}

fn load_layered<T>(
    path: Option<impl AsRef<Path>>,
    env: Option<Map<String, String>>,
) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    if effective_path.exists() {
        info!("Loading config from {}", effective_path.display());
    } else {
        warn!("Config file {} not found, using defaults", effective_path.display());
    }

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .source(env),
        );

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
