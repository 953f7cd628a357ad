// src/common/money.rs

//! Valores monetários só são arredondados na fronteira de apresentação.
//! Internamente toda soma usa `Decimal` com precisão total.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

pub const PRESENTATION_DP: u32 = 2;

pub fn round(value: Decimal) -> Decimal {
    let rounded = value.round_dp_with_strategy(PRESENTATION_DP, RoundingStrategy::MidpointAwayFromZero);
    // evita "-0.00"
    if rounded.is_zero() { Decimal::ZERO } else { rounded }
}

/// Texto com exatamente duas casas decimais ("400.00").
pub fn format(value: Decimal) -> String {
    format!("{:.2}", round(value))
}

// Uso: #[serde(serialize_with = "money::serialize")]
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(*value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn pads_to_two_places() {
        assert_eq!(format(d("400")), "400.00");
        assert_eq!(format(d("0")), "0.00");
        assert_eq!(format(d("-200.5")), "-200.50");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(format(d("10.005")), "10.01");
        assert_eq!(format(d("-10.005")), "-10.01");
        assert_eq!(format(d("33.3333")), "33.33");
    }

    #[test]
    fn serializes_as_string() {
        #[derive(serde::Serialize)]
        struct Row {
            #[serde(serialize_with = "serialize")]
            amount: Decimal,
        }

        let json = serde_json::to_string(&Row { amount: d("12.3") }).unwrap();
        assert_eq!(json, r#"{"amount":"12.30"}"#);
    }
}
