//! Derived price calculations
//!
//! Effective price and discount percent are never stored; they are
//! computed at read time. Arithmetic runs through `Decimal` and
//! converts back to `f64` at the edges.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::*;

/// Whether `now` falls inside the offer window. Absent bounds leave
/// the window open on that side.
pub fn offer_active(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    if let Some(start) = start
        && now < start
    {
        return false;
    }
    if let Some(end) = end
        && now > end
    {
        return false;
    }
    true
}

/// Effective price of a product at `now`: the sale price while the
/// offer window is active, the base price otherwise.
pub fn product_effective_price(
    price: f64,
    sale_price: Option<f64>,
    offer_start: Option<DateTime<Utc>>,
    offer_end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    match sale_price {
        Some(sale) if offer_active(offer_start, offer_end, now) => sale,
        _ => price,
    }
}

/// Effective price of a variant: the sale price when present.
/// Variants carry no offer window of their own.
pub fn variant_effective_price(price: f64, sale_price: Option<f64>) -> f64 {
    sale_price.unwrap_or(price)
}

/// Whole-percent discount of `effective` against `price`, rounded
/// half-up; 0 when there is no positive discount.
pub fn discount_percent(price: f64, effective: f64) -> i64 {
    if price <= 0.0 || effective >= price {
        return 0;
    }
    let price = Decimal::from_f64(price).unwrap_or(Decimal::ZERO);
    let effective = Decimal::from_f64(effective).unwrap_or(Decimal::ZERO);
    if price <= Decimal::ZERO {
        return 0;
    }
    let percent = (price - effective) / price * Decimal::from(100);
    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn sale_applies_inside_window() {
        let now = Utc::now();
        let price = product_effective_price(
            20.0,
            Some(15.0),
            Some(now - Duration::days(1)),
            Some(now + Duration::days(1)),
            now,
        );
        assert_eq!(price, 15.0);
        assert_eq!(discount_percent(20.0, price), 25);
    }

    #[test]
    fn expired_window_falls_back_to_base_price() {
        let now = Utc::now();
        let price = product_effective_price(
            20.0,
            Some(15.0),
            Some(now - Duration::days(7)),
            Some(now - Duration::days(1)),
            now,
        );
        assert_eq!(price, 20.0);
        assert_eq!(discount_percent(20.0, price), 0);
    }

    #[test]
    fn open_ended_window_applies() {
        let now = Utc::now();
        assert_eq!(
            product_effective_price(20.0, Some(15.0), None, None, now),
            15.0
        );
        assert_eq!(
            product_effective_price(20.0, Some(15.0), Some(now - Duration::hours(1)), None, now),
            15.0
        );
        assert_eq!(
            product_effective_price(20.0, Some(15.0), None, Some(now + Duration::hours(1)), now),
            15.0
        );
    }

    #[test]
    fn window_not_yet_open_falls_back() {
        let now = Utc::now();
        assert_eq!(
            product_effective_price(20.0, Some(15.0), Some(now + Duration::hours(1)), None, now),
            20.0
        );
    }

    #[test]
    fn variant_sale_price_wins_without_window() {
        assert_eq!(variant_effective_price(10.0, Some(8.0)), 8.0);
        assert_eq!(variant_effective_price(10.0, None), 10.0);
    }

    #[test]
    fn discount_rounds_to_nearest_percent() {
        assert_eq!(discount_percent(30.0, 20.0), 33);
        assert_eq!(discount_percent(3.0, 2.0), 33);
        assert_eq!(discount_percent(8.0, 7.0), 13); // 12.5 rounds up
    }

    #[test]
    fn no_discount_when_sale_is_not_lower() {
        assert_eq!(discount_percent(10.0, 10.0), 0);
        assert_eq!(discount_percent(10.0, 12.0), 0);
        assert_eq!(discount_percent(0.0, 0.0), 0);
    }
}
