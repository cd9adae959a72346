use crate::error::AnalyticsError;
use core_types::GroupedPoint;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Flags points that stray too far from their trailing simple moving average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnomalyDetector {
    window_size: usize,
    threshold: Decimal,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            window_size: Self::DEFAULT_WINDOW,
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

impl AnomalyDetector {
    pub const DEFAULT_WINDOW: usize = 3;
    pub const DEFAULT_THRESHOLD: Decimal = dec!(0.20);

    /// Creates a detector over `window_size` trailing periods.
    ///
    /// `threshold` is the relative deviation (0.20 = 20%) a point must exceed
    /// to be flagged.
    pub fn new(window_size: usize, threshold: Decimal) -> Result<Self, AnalyticsError> {
        if window_size == 0 {
            return Err(AnalyticsError::InvalidParameters(
                "Moving average window must cover at least one period".to_string(),
            ));
        }
        if threshold.is_sign_negative() {
            return Err(AnalyticsError::InvalidParameters(format!(
                "Anomaly threshold must not be negative (got {threshold})"
            )));
        }
        Ok(Self {
            window_size,
            threshold,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Sets `moving_average` and `is_anomaly` on every point of an ordered series.
    ///
    /// The first `window_size - 1` points lack a full window: they keep an
    /// undefined average and are never flagged.
    pub fn annotate(&self, series: &mut [GroupedPoint]) {
        let divisor = Decimal::from(self.window_size);
        let mut window_sum = Decimal::ZERO;
        let mut flagged = 0usize;

        for i in 0..series.len() {
            window_sum += series[i].total_amount;
            if i >= self.window_size {
                window_sum -= series[i - self.window_size].total_amount;
            }

            let point = &mut series[i];
            if i + 1 < self.window_size {
                point.moving_average = None;
                point.is_anomaly = false;
                continue;
            }

            let average = window_sum / divisor;
            point.moving_average = Some(average);
            point.is_anomaly = self.deviates(point.total_amount, average);
            if point.is_anomaly {
                flagged += 1;
            }
        }

        tracing::debug!(
            window = self.window_size,
            points = series.len(),
            anomalies = flagged,
            "Annotated series with moving average."
        );
    }

    fn deviates(&self, value: Decimal, average: Decimal) -> bool {
        if average.is_zero() {
            return false;
        }
        // A quotient too large to represent is far beyond any threshold.
        (value - average)
            .abs()
            .checked_div(average.abs())
            .is_none_or(|deviation| deviation > self.threshold)
    }
}
