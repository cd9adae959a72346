use thiserror::Error;

/// Failures while setting up the analytics engine.
///
/// Recomputing a dashboard never fails: malformed input is excluded and
/// reported through `Diagnostics` instead.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid analytics parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),
}
