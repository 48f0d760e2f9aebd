use crate::config::DISPLAY_SCALE;
use crate::error::ConvertError;
use crate::models::RateSnapshot;
use rust_decimal::{Decimal, RoundingStrategy};

/// Outcome for a single target currency. `Unavailable` is a valid result,
/// not an error: a batch of targets may partially succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converted {
    Amount(Decimal),
    Unavailable,
}

/// The divisor taking an amount from the origin currency to the base.
/// `None` means the origin is the base itself: the rate is exactly 1 and no
/// division is performed, so no rounding error is introduced.
fn origin_divisor(snapshot: &RateSnapshot, origin: &str) -> Result<Option<Decimal>, ConvertError> {
    if origin == snapshot.base {
        return Ok(None);
    }
    match snapshot.rates.get(origin) {
        Some(rate) if rate.is_sign_positive() && !rate.is_zero() => Ok(Some(*rate)),
        _ => Err(ConvertError::UnsupportedOrigin(origin.to_string())),
    }
}

/// The multiplier taking a base amount to the target currency. The base
/// itself is exactly 1 and is never looked up in the rate table. A missing
/// or non-positive rate resolves to `None` (unavailable).
fn target_rate(snapshot: &RateSnapshot, target: &str) -> Option<Decimal> {
    if target == snapshot.base {
        return Some(Decimal::ONE);
    }
    snapshot
        .rates
        .get(target)
        .copied()
        .filter(|rate| rate.is_sign_positive() && !rate.is_zero())
}

fn round_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn exact_with_divisor(
    snapshot: &RateSnapshot,
    divisor: Option<Decimal>,
    target: &str,
    amount: Decimal,
) -> Option<Decimal> {
    let rate = target_rate(snapshot, target)?;
    let product = amount * rate;
    Some(match divisor {
        Some(origin_rate) => product / origin_rate,
        None => product,
    })
}

fn to_converted(value: Option<Decimal>) -> Converted {
    match value {
        Some(value) => Converted::Amount(round_display(value)),
        None => Converted::Unavailable,
    }
}

/// Full-precision conversion, no display rounding. All arithmetic is exact
/// decimal; the only division happens after the origin rate is validated
/// positive. `Ok(None)` means the target is unavailable in this snapshot.
pub fn convert_exact(
    snapshot: &RateSnapshot,
    origin: &str,
    target: &str,
    amount: Decimal,
) -> Result<Option<Decimal>, ConvertError> {
    let divisor = origin_divisor(snapshot, origin)?;
    Ok(exact_with_divisor(snapshot, divisor, target, amount))
}

/// Converts `amount` from `origin` to `target`, rounded to the display
/// scale at the output boundary.
pub fn convert(
    snapshot: &RateSnapshot,
    origin: &str,
    target: &str,
    amount: Decimal,
) -> Result<Converted, ConvertError> {
    Ok(to_converted(convert_exact(snapshot, origin, target, amount)?))
}

/// Converts `amount` to every target in caller order. Entries are computed
/// independently; an unavailable target never aborts the rest of the batch.
/// An origin with no usable rate fails the whole request. The origin rate
/// is resolved once for the batch, not per entry.
pub fn convert_many(
    snapshot: &RateSnapshot,
    origin: &str,
    targets: &[&str],
    amount: Decimal,
) -> Result<Vec<(String, Converted)>, ConvertError> {
    let divisor = origin_divisor(snapshot, origin)?;
    Ok(targets
        .iter()
        .map(|&target| {
            let outcome = to_converted(exact_with_divisor(snapshot, divisor, target, amount));
            (target.to_string(), outcome)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn snapshot() -> RateSnapshot {
        RateSnapshot {
            base: "USD".to_string(),
            rates: HashMap::from([
                ("USD".to_string(), dec!(1)),
                ("JPY".to_string(), dec!(150.0)),
                ("EUR".to_string(), dec!(0.9)),
                ("ZWD".to_string(), dec!(0)),
            ]),
            next_refresh_at: 0,
        }
    }

    #[test]
    fn base_origin_batch_with_missing_target() {
        let result = convert_many(&snapshot(), "USD", &["JPY", "EUR", "XYZ"], dec!(10)).unwrap();
        assert_eq!(
            result,
            vec![
                ("JPY".to_string(), Converted::Amount(dec!(1500.00))),
                ("EUR".to_string(), Converted::Amount(dec!(9.00))),
                ("XYZ".to_string(), Converted::Unavailable),
            ]
        );
    }

    #[test]
    fn non_base_origin_to_base() {
        let result = convert_many(&snapshot(), "EUR", &["USD"], dec!(9)).unwrap();
        assert_eq!(result, vec![("USD".to_string(), Converted::Amount(dec!(10.00)))]);
    }

    #[test]
    fn identity_conversion_is_lossless() {
        let amount = dec!(123.456789);
        let exact = convert_exact(&snapshot(), "USD", "USD", amount).unwrap().unwrap();
        assert_eq!(exact, amount);
    }

    #[test]
    fn base_origin_is_exact_multiplication() {
        let exact = convert_exact(&snapshot(), "USD", "JPY", dec!(10.5)).unwrap().unwrap();
        assert_eq!(exact, dec!(10.5) * dec!(150.0));
    }

    #[test]
    fn base_target_is_exact_division() {
        let exact = convert_exact(&snapshot(), "EUR", "USD", dec!(9)).unwrap().unwrap();
        assert_eq!(exact, dec!(9) / dec!(0.9));
        assert_eq!(exact, dec!(10));
    }

    #[test]
    fn round_trip_reproduces_amount() {
        let mut snap = snapshot();
        snap.rates.insert("AAA".to_string(), dec!(2));
        snap.rates.insert("BBB".to_string(), dec!(8));
        let amount = dec!(12.34);
        let there = convert_exact(&snap, "AAA", "BBB", amount).unwrap().unwrap();
        let back = convert_exact(&snap, "BBB", "AAA", there).unwrap().unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn cross_rate_rounds_at_output_only() {
        // 1 EUR in JPY: 1 * 150 / 0.9 = 166.666..., rounded half away from zero.
        let result = convert(&snapshot(), "EUR", "JPY", dec!(1)).unwrap();
        assert_eq!(result, Converted::Amount(dec!(166.67)));
    }

    #[test]
    fn zero_amount_converts_to_zero() {
        let result = convert_many(&snapshot(), "EUR", &["USD", "JPY"], dec!(0)).unwrap();
        assert_eq!(
            result,
            vec![
                ("USD".to_string(), Converted::Amount(dec!(0))),
                ("JPY".to_string(), Converted::Amount(dec!(0))),
            ]
        );
    }

    #[test]
    fn negative_amount_propagates_sign() {
        let result = convert(&snapshot(), "USD", "JPY", dec!(-10)).unwrap();
        assert_eq!(result, Converted::Amount(dec!(-1500.00)));
    }

    #[test]
    fn unknown_origin_fails_the_request() {
        let err = convert_many(&snapshot(), "XYZ", &["USD"], dec!(1)).unwrap_err();
        assert_eq!(err, ConvertError::UnsupportedOrigin("XYZ".to_string()));
    }

    #[test]
    fn zero_rate_origin_fails_the_request() {
        let err = convert(&snapshot(), "ZWD", "USD", dec!(1)).unwrap_err();
        assert_eq!(err, ConvertError::UnsupportedOrigin("ZWD".to_string()));
    }

    #[test]
    fn zero_rate_target_is_unavailable() {
        let result = convert(&snapshot(), "USD", "ZWD", dec!(1)).unwrap();
        assert_eq!(result, Converted::Unavailable);
    }

    #[test]
    fn batch_matches_single_conversions() {
        let snap = snapshot();
        let batch = convert_many(&snap, "EUR", &["USD", "JPY", "XYZ", "ZWD"], dec!(2.5)).unwrap();
        assert_eq!(batch.len(), 4);
        for (code, outcome) in &batch {
            assert_eq!(*outcome, convert(&snap, "EUR", code, dec!(2.5)).unwrap());
        }
    }

    #[test]
    fn batch_preserves_order_and_length() {
        let targets = ["XYZ", "JPY", "ABC", "EUR"];
        let result = convert_many(&snapshot(), "USD", &targets, dec!(1)).unwrap();
        assert_eq!(result.len(), targets.len());
        let codes: Vec<_> = result.iter().map(|(code, _)| code.as_str()).collect();
        assert_eq!(codes, targets);
    }
}
