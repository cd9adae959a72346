use core_types::Direction;
use rust_decimal::Decimal;

/// `(current - prior) / prior * 100`, or `None` when `prior` is zero.
pub fn percent_change(current: Decimal, prior: Decimal) -> Option<Decimal> {
    if prior.is_zero() {
        return None;
    }
    (current - prior)
        .checked_div(prior)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
}

/// Classifies a change. Two zero values are flat; a zero prior with a
/// non-zero current has no direction.
pub fn direction(current: Decimal, prior: Decimal, change: Option<Decimal>) -> Direction {
    match change {
        Some(pct) if pct.is_sign_positive() && !pct.is_zero() => Direction::Up,
        Some(pct) if pct.is_sign_negative() && !pct.is_zero() => Direction::Down,
        Some(_) => Direction::Flat,
        None if current.is_zero() && prior.is_zero() => Direction::Flat,
        None => Direction::NotApplicable,
    }
}
