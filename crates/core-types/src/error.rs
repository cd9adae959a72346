use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a raw value could not become part of the data model.
///
/// Serialized with a `reason` tag so rejections can be shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum CoreError {
    #[error("Record has no date")]
    MissingDate,

    #[error("Record has no amount")]
    MissingAmount,

    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("Invalid amount '{0}': expected a number or decimal text")]
    InvalidAmount(String),

    #[error("Amount is not a finite number")]
    NonFiniteAmount,

    #[error("Amount {0} cannot be represented as a decimal")]
    AmountOutOfRange(f64),

    #[error("Amount {0} would overflow the running sales total")]
    TotalOverflow(Decimal),

    #[error("Unknown {kind} '{value}'")]
    UnknownVariant { kind: String, value: String },
}
