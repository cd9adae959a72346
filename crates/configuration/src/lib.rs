use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalyticsSettings, Config, DashboardDefaults};

/// Prefix for environment overrides, e.g. `SALES_PULSE__ANALYTICS__MOVING_AVERAGE_WINDOW=4`.
pub const ENV_PREFIX: &str = "SALES_PULSE";

/// Loads the application configuration.
///
/// The TOML file at `path` is optional; environment variables prefixed with
/// `SALES_PULSE__` are layered on top. The result is validated before it is
/// returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), ?config, "Configuration loaded.");
    Ok(config)
}
