//! Request payloads and JSON representations for the REST API.
//!
//! Field names follow the public API (Spanish); entities keep English names.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use validator::ValidationError;

pub mod catalog;
pub mod locations;

pub use catalog::*;
pub use locations::*;

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Prices are exposed with exactly two decimals.
pub(crate) fn money(value: Decimal) -> Decimal {
    let mut value = value;
    value.rescale(2);
    value
}

pub(crate) fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut err = ValidationError::new("precio");
        err.message = Some("precio must not be negative".into());
        return Err(err);
    }
    if value.trunc().abs() >= Decimal::from(100_000_000) {
        let mut err = ValidationError::new("precio");
        err.message = Some("precio exceeds 8 integer digits".into());
        return Err(err);
    }
    if value.normalize().scale() > 2 {
        let mut err = ValidationError::new("precio");
        err.message = Some("precio allows at most 2 decimal places".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        descripcion: Option<Option<String>>,
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.descripcion, None);
        let null: Patch = serde_json::from_str(r#"{"descripcion": null}"#).unwrap();
        assert_eq!(null.descripcion, Some(None));
        let set: Patch = serde_json::from_str(r#"{"descripcion": "x"}"#).unwrap();
        assert_eq!(set.descripcion, Some(Some("x".into())));
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money(dec!(150000)).to_string(), "150000.00");
        assert_eq!(money(dec!(12.5)).to_string(), "12.50");
    }

    #[test]
    fn price_bounds() {
        assert!(validate_price(&dec!(0)).is_ok());
        assert!(validate_price(&dec!(99999999.99)).is_ok());
        assert!(validate_price(&dec!(-1)).is_err());
        assert!(validate_price(&dec!(100000000)).is_err());
    }

    #[test]
    fn price_scale_is_capped_at_cents() {
        assert!(validate_price(&dec!(12.5)).is_ok());
        assert!(validate_price(&dec!(12.500)).is_ok());
        assert!(validate_price(&dec!(12.345)).is_err());
        assert!(validate_price(&dec!(0.001)).is_err());
    }
}
