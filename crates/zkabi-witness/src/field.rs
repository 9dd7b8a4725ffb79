//! Field-element encoding of scalar inputs.
//!
//! Every scalar that reaches the witness is a non-negative integer below the
//! BN254 scalar field modulus, rendered as `0x` followed by 64 lowercase hex
//! digits. This module owns that wire format and the rules that map native
//! integers, numeric text and bytes onto it:
//!
//! - unsigned integers of width `w` must lie in `[0, 2^w)`;
//! - signed integers of width `w` must lie in `[-2^(w-1), 2^(w-1))` and
//!   negative values are stored as the `w`-bit two's complement `2^w + v`;
//! - field elements must lie below the modulus and negative values are
//!   stored as the additive inverse `p + v`;
//! - decimal text (`[-]digits`) is a mathematical value subject to the rules
//!   above, while `0x` hex text is a raw encoding that must fit the type
//!   unchanged.

use crate::error::InputFault;
use crate::value::InputValue;
use dashu::integer::UBig;
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zkabi_schema::{ParameterType, Sign};

/// Width in bytes of one encoded field element
pub const FIELD_BYTES: usize = 32;

/// BN254 scalar field modulus, big-endian
pub const FIELD_MODULUS_BYTES: [u8; FIELD_BYTES] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

static FIELD_MODULUS: Lazy<UBig> = Lazy::new(|| UBig::from_be_bytes(&FIELD_MODULUS_BYTES));

/// The field modulus as an arbitrary precision integer
pub fn field_modulus() -> &'static UBig {
    &FIELD_MODULUS
}

//-----------------------------------------------------------------------------
// Witness Value
//-----------------------------------------------------------------------------

/// One encoded field element, stored big-endian
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WitnessValue([u8; FIELD_BYTES]);

impl WitnessValue {
    pub const ZERO: WitnessValue = WitnessValue([0u8; FIELD_BYTES]);

    pub fn from_u128(v: u128) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - 16..].copy_from_slice(&v.to_be_bytes());
        WitnessValue(bytes)
    }

    pub fn from_u8(v: u8) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - 1] = v;
        WitnessValue(bytes)
    }

    /// Encode a reduced field element; `None` if it is not below the modulus
    pub fn from_ubig(v: &UBig) -> Option<Self> {
        if v >= field_modulus() {
            return None;
        }
        let be = v.to_be_bytes();
        let mut bytes = [0u8; FIELD_BYTES];
        bytes[FIELD_BYTES - be.len()..].copy_from_slice(&be);
        Some(WitnessValue(bytes))
    }

    pub fn to_ubig(&self) -> UBig {
        UBig::from_be_bytes(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8; FIELD_BYTES] {
        &self.0
    }

    /// Canonical wire form: `0x` + 64 lowercase hex digits
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse the canonical wire form. Shorter hex strings are accepted and
    /// left-padded; values at or above the modulus are rejected.
    pub fn parse_hex(s: &str) -> Result<Self, InputFault> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| InputFault::InvalidNumber(s.to_string()))?;
        if digits.is_empty()
            || digits.len() > FIELD_BYTES * 2
            || !digits.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(InputFault::InvalidNumber(s.to_string()));
        }
        let padded = format!("{:0>width$}", digits, width = FIELD_BYTES * 2);
        let mut bytes = [0u8; FIELD_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| InputFault::InvalidNumber(s.to_string()))?;
        let value = WitnessValue(bytes);
        if &value.to_ubig() >= field_modulus() {
            return Err(InputFault::OutOfRange {
                value: s.to_string(),
                ty: "Field".to_string(),
            });
        }
        Ok(value)
    }
}

impl fmt::Display for WitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for WitnessValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WitnessValue({})", self)
    }
}

impl Serialize for WitnessValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for WitnessValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        WitnessValue::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

//-----------------------------------------------------------------------------
// Scalar Conversion
//-----------------------------------------------------------------------------

/// A scalar input before it is fitted to a concrete type
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scalar {
    /// A mathematical integer given by sign and magnitude
    Number { negative: bool, magnitude: UBig },
    /// A raw, already-encoded bit pattern from hex text
    Raw(UBig),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Number {
                negative: true,
                magnitude,
            } => write!(f, "-{}", magnitude),
            Scalar::Number { magnitude, .. } => write!(f, "{}", magnitude),
            Scalar::Raw(raw) => write!(f, "0x{}", raw.in_radix(16)),
        }
    }
}

impl Scalar {
    pub(crate) fn byte(b: u8) -> Self {
        Scalar::Number {
            negative: false,
            magnitude: UBig::from(b),
        }
    }

    /// Interpret an input value as a scalar. Only integers and numeric text
    /// qualify; text is never read as anything other than a number here.
    pub(crate) fn from_input(value: &InputValue) -> Result<Self, InputFault> {
        match value {
            InputValue::Signed(v) => Ok(Scalar::Number {
                negative: *v < 0,
                magnitude: UBig::from(v.unsigned_abs()),
            }),
            InputValue::Unsigned(v) => Ok(Scalar::Number {
                negative: false,
                magnitude: UBig::from(*v),
            }),
            InputValue::Text(s) => parse_numeric(s),
            _ => Err(InputFault::NotAnInteger),
        }
    }

    /// Fit this scalar to a Field or Integer type
    pub(crate) fn encode(&self, ty: &ParameterType) -> Result<WitnessValue, InputFault> {
        let out_of_range = || InputFault::OutOfRange {
            value: self.to_string(),
            ty: ty.to_string(),
        };
        let modulus = field_modulus();
        let encoded = match (ty, self) {
            (ParameterType::Field, Scalar::Raw(raw)) => raw.clone(),
            (ParameterType::Field, Scalar::Number { negative, magnitude }) => {
                if magnitude >= modulus {
                    return Err(out_of_range());
                }
                if *negative && *magnitude != UBig::ZERO {
                    modulus - magnitude
                } else {
                    magnitude.clone()
                }
            }
            (ParameterType::Integer { width, .. }, Scalar::Raw(raw)) => {
                if raw >= &(UBig::ONE << *width as usize) {
                    return Err(out_of_range());
                }
                raw.clone()
            }
            (
                ParameterType::Integer {
                    sign: Sign::Unsigned,
                    width,
                },
                Scalar::Number { negative, magnitude },
            ) => {
                if *negative && *magnitude != UBig::ZERO {
                    return Err(out_of_range());
                }
                if magnitude >= &(UBig::ONE << *width as usize) {
                    return Err(out_of_range());
                }
                magnitude.clone()
            }
            (
                ParameterType::Integer {
                    sign: Sign::Signed,
                    width,
                },
                Scalar::Number { negative, magnitude },
            ) => {
                if *width == 0 {
                    return Err(out_of_range());
                }
                let half = UBig::ONE << (*width as usize - 1);
                if *negative {
                    if magnitude > &half {
                        return Err(out_of_range());
                    }
                    if *magnitude == UBig::ZERO {
                        UBig::ZERO
                    } else {
                        (UBig::ONE << *width as usize) - magnitude
                    }
                } else {
                    if magnitude >= &half {
                        return Err(out_of_range());
                    }
                    magnitude.clone()
                }
            }
            _ => return Err(InputFault::NotAnInteger),
        };
        WitnessValue::from_ubig(&encoded).ok_or_else(out_of_range)
    }
}

/// Parse numeric text: `[-]decimal` or `0x`/`0X` hex without a sign
fn parse_numeric(s: &str) -> Result<Scalar, InputFault> {
    let invalid = || InputFault::InvalidNumber(s.to_string());

    if let Some(digits) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let raw = UBig::from_str_radix(digits, 16).map_err(|_| invalid())?;
        return Ok(Scalar::Raw(raw));
    }

    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let magnitude = UBig::from_str_radix(digits, 10).map_err(|_| invalid())?;
    Ok(Scalar::Number {
        negative,
        magnitude,
    })
}

/// Encode one scalar input against a Field or Integer type
pub fn encode_scalar(value: &InputValue, ty: &ParameterType) -> Result<WitnessValue, InputFault> {
    Scalar::from_input(value)?.encode(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUS_ONE: &str = "0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000000";

    fn hex_of(value: InputValue, ty: ParameterType) -> String {
        encode_scalar(&value, &ty).unwrap().to_hex()
    }

    #[test]
    fn test_canonical_hex_format() {
        let v = WitnessValue::from_u128(1);
        assert_eq!(
            v.to_hex(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert_eq!(v.to_hex().len(), 66);
        assert_eq!(WitnessValue::from_u8(0xab).to_string(), format!("0x{:0>64}", "ab"));
        assert_eq!(WitnessValue::ZERO.to_hex(), format!("0x{}", "0".repeat(64)));

        let value = WitnessValue::from_u128(0x0102);
        let bytes = value.as_bytes();
        assert_eq!(bytes.len(), FIELD_BYTES);
        assert_eq!(&bytes[FIELD_BYTES - 2..], &[0x01, 0x02]);
        assert!(bytes[..FIELD_BYTES - 2].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_parse_hex() {
        let v = WitnessValue::parse_hex("0x2a").unwrap();
        assert_eq!(v, WitnessValue::from_u128(42));
        assert_eq!(WitnessValue::parse_hex(&v.to_hex()).unwrap(), v);
        assert!(WitnessValue::parse_hex("2a").is_err());
        assert!(WitnessValue::parse_hex("0x").is_err());
        assert!(WitnessValue::parse_hex("0xzz").is_err());
        assert!(matches!(
            WitnessValue::parse_hex(&format!("0x{}", hex::encode(FIELD_MODULUS_BYTES))),
            Err(InputFault::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_unsigned_integers() {
        assert_eq!(
            hex_of(InputValue::from(255u8), ParameterType::unsigned(8)),
            format!("0x{:0>64}", "ff")
        );
        let err = encode_scalar(&InputValue::from(256), &ParameterType::unsigned(8)).unwrap_err();
        assert_eq!(
            err,
            InputFault::OutOfRange {
                value: "256".to_string(),
                ty: "u8".to_string()
            }
        );
        assert!(encode_scalar(&InputValue::from(-1), &ParameterType::unsigned(32)).is_err());
    }

    #[test]
    fn test_signed_twos_complement() {
        assert_eq!(
            hex_of(InputValue::from(-1), ParameterType::signed(8)),
            format!("0x{:0>64}", "ff")
        );
        assert_eq!(
            hex_of(InputValue::from(-128), ParameterType::signed(8)),
            format!("0x{:0>64}", "80")
        );
        assert_eq!(
            hex_of(InputValue::from(127), ParameterType::signed(8)),
            format!("0x{:0>64}", "7f")
        );
        assert_eq!(
            hex_of(InputValue::from(-2), ParameterType::signed(64)),
            format!("0x{:0>64}", "fffffffffffffffe")
        );
        assert!(encode_scalar(&InputValue::from(128), &ParameterType::signed(8)).is_err());
        assert!(encode_scalar(&InputValue::from(-129), &ParameterType::signed(8)).is_err());
    }

    #[test]
    fn test_field_negation() {
        assert_eq!(hex_of(InputValue::from(-1), ParameterType::field()), MINUS_ONE);
        assert_eq!(
            hex_of(InputValue::from(0), ParameterType::field()),
            WitnessValue::ZERO.to_hex()
        );
        assert_eq!(
            hex_of(InputValue::from(u128::MAX), ParameterType::field()),
            format!("0x{:0>64}", "f".repeat(32))
        );
    }

    #[test]
    fn test_numeric_text() {
        assert_eq!(
            hex_of(InputValue::from("0x1"), ParameterType::field()),
            WitnessValue::from_u128(1).to_hex()
        );
        assert_eq!(
            hex_of(InputValue::from("0XfF"), ParameterType::unsigned(8)),
            WitnessValue::from_u128(255).to_hex()
        );
        assert_eq!(
            hex_of(InputValue::from("12345"), ParameterType::unsigned(32)),
            WitnessValue::from_u128(12345).to_hex()
        );
        assert_eq!(hex_of(InputValue::from("-1"), ParameterType::field()), MINUS_ONE);
        assert_eq!(
            hex_of(InputValue::from("-1"), ParameterType::signed(16)),
            WitnessValue::from_u128(0xffff).to_hex()
        );
        // hex text is already encoded, so the two's complement pattern is taken as is
        assert_eq!(
            hex_of(InputValue::from("0xff"), ParameterType::signed(8)),
            WitnessValue::from_u128(0xff).to_hex()
        );
        assert_eq!(
            hex_of(InputValue::from(MINUS_ONE), ParameterType::field()),
            MINUS_ONE
        );
    }

    #[test]
    fn test_large_decimal_text() {
        let p = "21888242871839275222246405745257275088548364400416034343698204186575808495617";
        let p_minus_one =
            "21888242871839275222246405745257275088548364400416034343698204186575808495616";
        assert_eq!(field_modulus().to_string(), p);
        assert_eq!(
            hex_of(InputValue::from(p_minus_one), ParameterType::field()),
            MINUS_ONE
        );
        let err = encode_scalar(&InputValue::from(p), &ParameterType::field());
        assert!(matches!(err, Err(InputFault::OutOfRange { .. })));
        let err = encode_scalar(&InputValue::from(format!("-{}", p)), &ParameterType::field());
        assert!(matches!(err, Err(InputFault::OutOfRange { .. })));
    }

    #[test]
    fn test_invalid_numeric_text() {
        for text in ["", "-", "0x", "-0x1", "+1", "1.5", " 1", "abc", "1e3"] {
            let err = encode_scalar(&InputValue::from(text), &ParameterType::field()).unwrap_err();
            assert_eq!(err, InputFault::InvalidNumber(text.to_string()), "input {:?}", text);
        }
    }

    #[test]
    fn test_non_scalar_inputs_rejected() {
        for value in [
            InputValue::bytes([1u8]),
            InputValue::List(vec![]),
            InputValue::Map(Default::default()),
        ] {
            assert_eq!(
                encode_scalar(&value, &ParameterType::field()).unwrap_err(),
                InputFault::NotAnInteger
            );
        }
    }

    #[test]
    fn test_serde_as_hex_string() {
        let v = WitnessValue::from_u128(6);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, format!("\"0x{:0>64}\"", "6"));
        let back: WitnessValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
