use crate::aggregator::Aggregator;
use crate::anomaly::AnomalyDetector;
use crate::comparison::ComparisonEngine;
use crate::error::AnalyticsError;
use crate::ledger::SalesLedger;
use crate::report::{DashboardSnapshot, Diagnostics};
use crate::summary::MetricsSummarizer;
use chrono::NaiveDate;
use configuration::AnalyticsSettings;
use core_types::{FilterState, RawSalesRecord};

/// The single entry point the rendering layer calls whenever filters change.
///
/// The engine holds no state between calls. Its reference date is fixed at
/// construction, so `recompute` is a pure function of its two arguments.
#[derive(Debug, Clone)]
pub struct DashboardEngine {
    aggregator: Aggregator,
    detector: AnomalyDetector,
    comparison: ComparisonEngine,
    summarizer: MetricsSummarizer,
    reference_date: NaiveDate,
}

impl DashboardEngine {
    pub fn new(detector: AnomalyDetector, reference_date: NaiveDate) -> Self {
        Self {
            aggregator: Aggregator::new(),
            detector,
            comparison: ComparisonEngine::new(),
            summarizer: MetricsSummarizer::new(),
            reference_date,
        }
    }

    /// Builds an engine from configuration.
    ///
    /// `today` is used as the reference date unless the settings pin one.
    pub fn from_settings(
        settings: &AnalyticsSettings,
        today: NaiveDate,
    ) -> Result<Self, AnalyticsError> {
        settings.validate()?;
        let detector =
            AnomalyDetector::new(settings.moving_average_window, settings.anomaly_threshold)?;
        Ok(Self::new(detector, settings.reference_date.unwrap_or(today)))
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    /// Validates the raw records and runs one full recompute.
    pub fn recompute(&self, records: &[RawSalesRecord], filter: &FilterState) -> DashboardSnapshot {
        let ledger = SalesLedger::from_raw(records);
        self.recompute_ledger(&ledger, filter)
    }

    /// Runs one full recompute over an already validated ledger.
    ///
    /// Stages run in order: grouping, then the moving-average pass when either
    /// overlay is requested, then the prior-year pairing when requested. The
    /// summary cards are always computed.
    pub fn recompute_ledger(
        &self,
        ledger: &SalesLedger,
        filter: &FilterState,
    ) -> DashboardSnapshot {
        let range = filter.range();
        if range.is_inverted() {
            tracing::warn!(
                start = %filter.start_date,
                end = %filter.end_date,
                "Filter range is inverted; the series will be empty."
            );
        }

        // --- Series ---
        let mut series = self.aggregator.group(ledger, range, filter.granularity);

        if filter.wants_moving_average() {
            self.detector.annotate(&mut series);
        }

        if filter.show_past_period {
            self.comparison
                .pair_with_prior_year(&mut series, ledger, range, filter.granularity);
        }

        // --- Summary cards ---
        let summary = self.summarizer.summarize(ledger, self.reference_date);

        let diagnostics = Diagnostics {
            excluded_records: ledger.rejected().len(),
            rejections: ledger.rejected().to_vec(),
            inverted_range: range.is_inverted(),
        };

        let snapshot = DashboardSnapshot {
            series,
            summary,
            diagnostics,
        };

        tracing::info!(
            granularity = %filter.granularity,
            points = snapshot.series.len(),
            anomalies = snapshot.anomaly_count(),
            excluded = snapshot.diagnostics.excluded_records,
            reference_date = %self.reference_date,
            "Dashboard recomputed."
        );
        snapshot
    }
}
