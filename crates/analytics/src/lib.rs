//! # Sales Pulse Analytics Engine
//!
//! This crate turns an irregular stream of dated sales transactions into the
//! numbers a sales dashboard displays.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It performs no I/O and has no
//!   knowledge of rendering. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** Every component is a pure function of immutable
//!   inputs. `DashboardEngine::recompute` rebuilds everything on each call, so
//!   identical inputs always give identical snapshots and concurrent calls with
//!   different filters never interfere.
//!
//! ## Pipeline
//!
//! 1. `SalesLedger` validates and date-sorts the raw records.
//! 2. `Aggregator` groups them into contiguous calendar buckets.
//! 3. `AnomalyDetector` adds a trailing moving average and a deviation flag.
//! 4. `ComparisonEngine` pairs every bucket with its one-year-earlier counterpart.
//! 5. `MetricsSummarizer` computes the YTD/MTD/WTD/L3M/L6M/L12M cards.

// Declare the modules that constitute this crate.
pub mod aggregator;
pub mod anomaly;
pub mod calendar;
pub mod change;
pub mod comparison;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod report;
pub mod summary;

// Re-export the key components to create a clean, public-facing API.
pub use aggregator::Aggregator;
pub use anomaly::AnomalyDetector;
pub use comparison::ComparisonEngine;
pub use engine::DashboardEngine;
pub use error::AnalyticsError;
pub use ledger::{RejectedRecord, SalesLedger};
pub use report::{DashboardSnapshot, Diagnostics};
pub use summary::MetricsSummarizer;
