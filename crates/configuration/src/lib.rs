use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
#[cfg(feature = "clap")]
pub use settings::ServerOverrides;
pub use settings::{AnalyticsSettings, DataSettings, LoggingSettings, ServerSettings, Settings};

/// Prefix for environment overrides, e.g. `RIPPLE__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "RIPPLE";

/// Loads the application settings.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `RIPPLE__SECTION__KEY` environment variables. The merged
/// result is validated before it is returned.
pub fn load_config(path: &Path) -> Result<Settings, ConfigError> {
    build(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.cors_origins")
        .with_list_parse_key("analytics.correlation_columns")
        .try_parsing(true)
}

fn build(path: &Path, environment: config::Environment) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // A missing file is fine; every key has a default.
        .add_source(config::File::from(path).required(false))
        .add_source(environment)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    tracing::debug!(path = %path.display(), "Loaded settings.");
    Ok(settings)
}
