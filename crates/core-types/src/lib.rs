//! # Sales Pulse Core Types
//!
//! The shared vocabulary of the workspace: raw and validated sales records, the
//! grouping granularities, the derived series points and summary cards, and the
//! filter state supplied by the UI on every interaction.
//!
//! As a Layer 0 crate, it has no knowledge of any other workspace crate.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Direction, Granularity, MetricWindow};
pub use error::CoreError;
pub use structs::{
    DateRange, FilterState, GroupedPoint, RawField, RawSalesRecord, SalesRecord, SummaryMetric,
};
