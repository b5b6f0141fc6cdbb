//! Conversion between [`rust_decimal::Decimal`] and BSON `Decimal128`.
//!
//! `Decimal128` is the IEEE 754-2008 decimal128 type in BID encoding,
//! stored as 16 little-endian bytes:
//!
//! ```text
//! bit 127      sign
//! bits 126-113 biased exponent (bias 6176)
//! bits 112-0   coefficient
//! ```
//!
//! Every `Decimal` (96-bit mantissa, scale 0..=28) has an exact
//! `Decimal128` representation. The reverse direction fails for NaN,
//! infinities and values outside the `Decimal` range.
//!
//! Query bounds arrive as `f64` and are encoded straight into
//! `Decimal128`, whose exponent range covers every finite double.

use mongodb::bson::{Bson, Decimal128};
use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

use crate::error::{ProductError, ProductResult};

const EXPONENT_BIAS: i32 = 6176;
const COEFFICIENT_BITS: u32 = 113;
const COEFFICIENT_MASK: u128 = (1u128 << COEFFICIENT_BITS) - 1;
const EXPONENT_MASK: u128 = 0x3FFF;
const SIGN_BIT: u128 = 1u128 << 127;
const MAX_SCALE: u32 = 28;
const MAX_COEFFICIENT: u128 = 10u128.pow(34) - 1;

/// Exact `Decimal` -> `Decimal128` conversion, keeping the scale.
pub fn to_store_decimal(value: &Decimal) -> Decimal128 {
    let coefficient = value.mantissa().unsigned_abs();
    let exponent = (EXPONENT_BIAS - value.scale() as i32) as u128;

    let mut bits = (exponent << COEFFICIENT_BITS) | coefficient;
    if value.is_sign_negative() && !value.is_zero() {
        bits |= SIGN_BIT;
    }
    Decimal128::from_bytes(bits.to_le_bytes())
}

/// `Decimal128` -> `Decimal`, keeping the scale where it fits.
pub fn from_store_decimal(value: &Decimal128) -> ProductResult<Decimal> {
    let bits = u128::from_le_bytes(value.bytes());
    let negative = bits & SIGN_BIT != 0;

    // Combination field 0b11 covers NaN, infinities and non-canonical
    // coefficients, none of which a Decimal can hold.
    if (bits >> 125) & 0b11 == 0b11 {
        return Err(ProductError::Conversion(
            "stored price is NaN, infinite or non-canonical".to_string(),
        ));
    }

    let exponent = ((bits >> COEFFICIENT_BITS) & EXPONENT_MASK) as i32 - EXPONENT_BIAS;
    let mut coefficient = bits & COEFFICIENT_MASK;

    // Coefficients past 34 digits are non-canonical and read as zero.
    if coefficient == 0 || coefficient > MAX_COEFFICIENT {
        let scale = exponent.min(0).unsigned_abs().min(MAX_SCALE);
        return Decimal::try_from_i128_with_scale(0, scale).map_err(|_| out_of_range());
    }

    let (coefficient, scale) = if exponent >= 0 {
        let scaled = 10u128
            .checked_pow(exponent as u32)
            .and_then(|factor| coefficient.checked_mul(factor))
            .ok_or_else(out_of_range)?;
        (scaled, 0)
    } else {
        let mut scale = exponent.unsigned_abs();
        while scale > MAX_SCALE && coefficient % 10 == 0 {
            coefficient /= 10;
            scale -= 1;
        }
        if scale > MAX_SCALE {
            return Err(out_of_range());
        }
        (coefficient, scale)
    };

    let signed = i128::try_from(coefficient).map_err(|_| out_of_range())?;
    let signed = if negative { -signed } else { signed };
    Decimal::try_from_i128_with_scale(signed, scale).map_err(|_| out_of_range())
}

fn out_of_range() -> ProductError {
    ProductError::Conversion("stored price is outside the supported decimal range".to_string())
}

/// `Decimal128` with the same digits as the shortest text form of `value`.
///
/// `0.1` becomes `0.1`, not the exact binary expansion, and `1e-30`
/// stays `1E-30`. Whole numbers up to 34 digits get exponent 0, so `5000.0`
/// encodes like the `Decimal` `5000`. `None` for NaN and infinities. Zero is
/// stored unsigned.
pub fn f64_to_store_decimal(value: f64) -> Option<Decimal128> {
    if !value.is_finite() {
        return None;
    }

    // LowerExp prints the shortest round-trip digits, e.g. "-7.5005e3".
    let text = format!("{value:e}");
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (mantissa, exponent) = text.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut coefficient: u128 = format!("{whole}{fraction}").parse().ok()?;
    let mut exponent = exponent - fraction.len() as i32;

    if exponent > 0 {
        let expanded = 10u128
            .checked_pow(exponent as u32)
            .and_then(|factor| coefficient.checked_mul(factor))
            .filter(|expanded| *expanded <= MAX_COEFFICIENT);
        if let Some(expanded) = expanded {
            coefficient = expanded;
            exponent = 0;
        }
    }

    let mut bits = (((exponent + EXPONENT_BIAS) as u128) << COEFFICIENT_BITS) | coefficient;
    if negative && coefficient != 0 {
        bits |= SIGN_BIT;
    }
    Some(Decimal128::from_bytes(bits.to_le_bytes()))
}

/// Reads a stored price in any encoding older writers may have used:
/// `Decimal128`, text, double or integer.
pub(crate) fn deserialize_price<'de, D>(deserializer: D) -> Result<Decimal128, D::Error>
where
    D: Deserializer<'de>,
{
    let decimal = match Bson::deserialize(deserializer)? {
        Bson::Decimal128(value) => return Ok(value),
        Bson::Double(value) => {
            return f64_to_store_decimal(value)
                .ok_or_else(|| D::Error::custom(format!("price {value} is not a finite number")))
        }
        Bson::String(text) => Decimal::from_str(text.trim())
            .or_else(|_| Decimal::from_scientific(text.trim()))
            .map_err(|e| D::Error::custom(format!("invalid price text {text:?}: {e}")))?,
        Bson::Int32(value) => Decimal::from(value),
        Bson::Int64(value) => Decimal::from(value),
        other => {
            return Err(D::Error::custom(format!(
                "unsupported price encoding: {:?}",
                other.element_type()
            )))
        }
    };
    Ok(to_store_decimal(&decimal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn top_bits(value: &Decimal128) -> u16 {
        let bytes = value.bytes();
        u16::from_le_bytes([bytes[14], bytes[15]])
    }

    #[test]
    fn test_round_trip_preserves_text() {
        for text in ["8500", "7500.50", "0", "0.000001", "-42.10", "79228162514264337593543950335"] {
            let stored = to_store_decimal(&dec(text));
            assert_eq!(from_store_decimal(&stored).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_encoding_matches_bson_layout() {
        // "1" is coefficient 1 with exponent 0, i.e. 0x3040 in the top bits
        let one = to_store_decimal(&dec("1"));
        assert_eq!(top_bits(&one), 0x3040);
        assert_eq!(one.bytes()[0], 1);

        assert_eq!(top_bits(&to_store_decimal(&dec("-1"))), 0xB040);
        // exponent -2
        assert_eq!(top_bits(&to_store_decimal(&dec("7500.50"))), 0x303C);
    }

    #[test]
    fn test_positive_exponent_expands() {
        // 85E+2
        let bits: u128 = (((EXPONENT_BIAS + 2) as u128) << COEFFICIENT_BITS) | 85;
        let stored = Decimal128::from_bytes(bits.to_le_bytes());
        assert_eq!(from_store_decimal(&stored).unwrap().to_string(), "8500");
    }

    #[test]
    fn test_special_values_are_rejected() {
        let infinity = Decimal128::from_bytes((0x78u128 << 120).to_le_bytes());
        let nan = Decimal128::from_bytes((0x7Cu128 << 120).to_le_bytes());
        assert!(matches!(
            from_store_decimal(&infinity),
            Err(ProductError::Conversion(_))
        ));
        assert!(matches!(from_store_decimal(&nan), Err(ProductError::Conversion(_))));
    }

    fn parts(value: &Decimal128) -> (bool, u128, i32) {
        let bits = u128::from_le_bytes(value.bytes());
        let exponent = ((bits >> COEFFICIENT_BITS) & EXPONENT_MASK) as i32 - EXPONENT_BIAS;
        (bits & SIGN_BIT != 0, bits & COEFFICIENT_MASK, exponent)
    }

    #[test]
    fn test_f64_uses_shortest_text() {
        let encode = |value: f64| f64_to_store_decimal(value).unwrap();
        assert_eq!(from_store_decimal(&encode(5000.0)).unwrap().to_string(), "5000");
        assert_eq!(from_store_decimal(&encode(0.1)).unwrap().to_string(), "0.1");
        assert_eq!(from_store_decimal(&encode(7500.5)).unwrap().to_string(), "7500.5");
        assert_eq!(from_store_decimal(&encode(-42.1)).unwrap().to_string(), "-42.1");
        assert_eq!(parts(&encode(7500.5)), (false, 75005, -1));
        assert_eq!(encode(5000.0), to_store_decimal(&dec("5000")));
    }

    #[test]
    fn test_f64_beyond_decimal_range_is_exact() {
        assert_eq!(parts(&f64_to_store_decimal(1e30).unwrap()), (false, 10u128.pow(30), 0));
        assert_eq!(parts(&f64_to_store_decimal(1e40).unwrap()), (false, 1, 40));
        assert_eq!(parts(&f64_to_store_decimal(1e-30).unwrap()), (false, 1, -30));
        assert_eq!(parts(&f64_to_store_decimal(-2.5e300).unwrap()), (true, 25, 299));
        assert!(parts(&f64_to_store_decimal(f64::MIN_POSITIVE).unwrap()).2 < -300);
    }

    #[test]
    fn test_f64_negative_zero_is_zero() {
        let zero = f64_to_store_decimal(-0.0).unwrap();
        assert_eq!(zero, f64_to_store_decimal(0.0).unwrap());
        assert_eq!(zero, to_store_decimal(&Decimal::ZERO));
    }

    #[test]
    fn test_f64_non_finite_is_rejected() {
        assert!(f64_to_store_decimal(f64::NAN).is_none());
        assert!(f64_to_store_decimal(f64::INFINITY).is_none());
        assert!(f64_to_store_decimal(f64::NEG_INFINITY).is_none());
    }

    #[test]
    fn test_zero_with_any_exponent_reads_as_zero() {
        for exponent in [0, 39, 6111, -2, -40] {
            let bits: u128 = ((exponent + EXPONENT_BIAS) as u128) << COEFFICIENT_BITS;
            let stored = Decimal128::from_bytes(bits.to_le_bytes());
            assert!(from_store_decimal(&stored).unwrap().is_zero());
        }
        let bits: u128 = ((EXPONENT_BIAS - 2) as u128) << COEFFICIENT_BITS;
        let hundredths = Decimal128::from_bytes(bits.to_le_bytes());
        assert_eq!(from_store_decimal(&hundredths).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_oversized_coefficient_reads_as_zero() {
        let bits: u128 = ((EXPONENT_BIAS as u128) << COEFFICIENT_BITS) | (MAX_COEFFICIENT + 1);
        let stored = Decimal128::from_bytes(bits.to_le_bytes());
        assert!(from_store_decimal(&stored).unwrap().is_zero());
    }

    #[derive(Deserialize)]
    struct Priced {
        #[serde(deserialize_with = "deserialize_price")]
        price: Decimal128,
    }

    #[test]
    fn test_deserialize_price_accepts_legacy_encodings() {
        let cases = [
            doc! { "price": Bson::Decimal128(to_store_decimal(&dec("8500"))) },
            doc! { "price": "8500" },
            doc! { "price": 8500.0 },
            doc! { "price": 8500_i32 },
            doc! { "price": 8500_i64 },
        ];
        for document in cases {
            let priced: Priced = from_document(document).unwrap();
            assert_eq!(from_store_decimal(&priced.price).unwrap(), dec("8500"));
        }
    }

    #[test]
    fn test_deserialize_price_rejects_other_types() {
        let result: Result<Priced, _> = from_document(doc! { "price": true });
        assert!(result.is_err());
    }
}
