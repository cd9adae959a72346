use thiserror::Error;

/// Errors raised while assembling the layered settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The optional TOML file is present but malformed, or a `SALES_PULSE__*`
    /// variable could not be coerced into the field it overrides.
    #[error("Could not read settings from the config file or SALES_PULSE__ overrides: {0}")]
    Source(#[from] config::ConfigError),

    /// The settings parsed but are unusable by the analytics engine.
    #[error("Invalid analytics settings: {0}")]
    Invalid(String),
}
