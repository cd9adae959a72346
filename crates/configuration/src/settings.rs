use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::Granularity;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `config.toml`; missing sections fall back to
/// their `Default` implementation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub dashboard: DashboardDefaults,
}

/// Tunables for the analytics engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyticsSettings {
    /// Number of trailing periods in the moving average, current period included.
    pub moving_average_window: usize,
    /// Relative deviation from the moving average above which a point is an anomaly.
    /// 0.20 corresponds to 20%.
    pub anomaly_threshold: Decimal,
    /// Pins "today" for the period-to-date cards. Unset means the current local date.
    pub reference_date: Option<NaiveDate>,
}

/// The filter state used when the caller does not supply one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardDefaults {
    pub granularity: Granularity,
    pub show_anomalies: bool,
    pub show_moving_average: bool,
    pub show_past_period: bool,
}

// --- Default Implementations ---
// This allows a user to omit any section from their toml
// and still have it work with sensible defaults.

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            moving_average_window: 3,
            anomaly_threshold: dec!(0.20),
            reference_date: None,
        }
    }
}

impl Default for DashboardDefaults {
    fn default() -> Self {
        Self {
            granularity: Granularity::Month,
            show_anomalies: true,
            show_moving_average: true,
            show_past_period: true,
        }
    }
}

impl AnalyticsSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.moving_average_window == 0 {
            return Err(ConfigError::Invalid(
                "analytics.moving_average_window must be at least 1".to_string(),
            ));
        }
        if self.anomaly_threshold.is_sign_negative() {
            return Err(ConfigError::Invalid(format!(
                "analytics.anomaly_threshold must not be negative (got {})",
                self.anomaly_threshold
            )));
        }
        Ok(())
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analytics.validate()
    }
}
