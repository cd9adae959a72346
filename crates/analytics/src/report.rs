use crate::ledger::RejectedRecord;
use core_types::{GroupedPoint, SummaryMetric};
use serde::{Deserialize, Serialize};

/// What the engine skipped or noticed while producing a snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub excluded_records: usize,
    pub rejections: Vec<RejectedRecord>,
    /// The filter's start date was after its end date; the series is empty.
    pub inverted_range: bool,
}

/// The complete, atomically produced result of one recompute.
///
/// This struct is the only thing handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub series: Vec<GroupedPoint>,
    pub summary: Vec<SummaryMetric>,
    pub diagnostics: Diagnostics,
}

impl DashboardSnapshot {
    pub fn anomaly_count(&self) -> usize {
        self.series.iter().filter(|p| p.is_anomaly).count()
    }
}
