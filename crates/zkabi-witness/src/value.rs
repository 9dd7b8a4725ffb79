//! Caller-supplied input values.
//!
//! Inputs arrive loosely typed: a map from parameter name to an integer,
//! text, bytes, a nested list or a nested map. [`InputValue`] captures those
//! shapes as a closed set so the encoder can dispatch with a `match`.

use crate::error::{WitnessError, WitnessResult};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Named inputs for one encoding call. Iteration order never affects the
/// witness layout; the schema decides the order.
pub type InputMap = BTreeMap<String, InputValue>;

/// One loosely-typed input value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum InputValue {
    /// Signed native integer of any width up to 128 bits
    Signed(i128),
    /// Unsigned native integer of any width up to 128 bits
    Unsigned(u128),
    /// Raw byte sequence; flattens to one unsigned value per byte
    Bytes(Vec<u8>),
    /// Text, either for string parameters or as a numeric literal
    Text(String),
    /// Nested sequence
    List(Vec<InputValue>),
    /// Named sub-values for struct parameters
    Map(InputMap),
}

impl InputValue {
    pub fn bytes(data: impl AsRef<[u8]>) -> Self {
        InputValue::Bytes(data.as_ref().to_vec())
    }

    pub fn text(s: impl Into<String>) -> Self {
        InputValue::Text(s.into())
    }

    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            InputValue::Signed(_) | InputValue::Unsigned(_) => "integer",
            InputValue::Bytes(_) => "bytes",
            InputValue::Text(_) => "text",
            InputValue::List(_) => "list",
            InputValue::Map(_) => "map",
        }
    }

    /// Convert a JSON value. Integers, strings, arrays and objects map onto
    /// the matching variants; floats, booleans and null are rejected.
    pub fn from_json(value: serde_json::Value) -> WitnessResult<Self> {
        use serde_json::Value;
        match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(InputValue::Unsigned(u as u128))
                } else if let Some(i) = n.as_i64() {
                    Ok(InputValue::Signed(i as i128))
                } else {
                    Err(WitnessError::InvalidJson(format!(
                        "{} is not an integer; pass large or fractional values as strings",
                        n
                    )))
                }
            }
            Value::String(s) => Ok(InputValue::Text(s)),
            Value::Array(items) => items
                .into_iter()
                .map(InputValue::from_json)
                .collect::<WitnessResult<Vec<_>>>()
                .map(InputValue::List),
            Value::Object(entries) => entries
                .into_iter()
                .map(|(k, v)| -> WitnessResult<(String, InputValue)> {
                    Ok((k, InputValue::from_json(v)?))
                })
                .collect::<WitnessResult<InputMap>>()
                .map(InputValue::Map),
            Value::Bool(b) => Err(WitnessError::InvalidJson(format!(
                "boolean {} is not a supported input value",
                b
            ))),
            Value::Null => Err(WitnessError::InvalidJson(
                "null is not a supported input value".to_string(),
            )),
        }
    }
}

impl TryFrom<serde_json::Value> for InputValue {
    type Error = WitnessError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        InputValue::from_json(value)
    }
}

/// Parse a JSON object of named inputs
pub fn inputs_from_json(json: &str) -> WitnessResult<InputMap> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| WitnessError::InvalidJson(e.to_string()))?;
    match InputValue::from_json(value)? {
        InputValue::Map(map) => Ok(map),
        other => Err(WitnessError::InvalidJson(format!(
            "expected an object of named inputs, found {}",
            other.kind()
        ))),
    }
}

//-----------------------------------------------------------------------------
// Conversions
//-----------------------------------------------------------------------------

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for InputValue {
            fn from(v: $t) -> Self {
                InputValue::Signed(v as i128)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for InputValue {
            fn from(v: $t) -> Self {
                InputValue::Unsigned(v as u128)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, i128, isize);
impl_from_unsigned!(u8, u16, u32, u64, u128, usize);

impl From<&str> for InputValue {
    fn from(s: &str) -> Self {
        InputValue::Text(s.to_string())
    }
}

impl From<String> for InputValue {
    fn from(s: String) -> Self {
        InputValue::Text(s)
    }
}

impl From<InputMap> for InputValue {
    fn from(map: InputMap) -> Self {
        InputValue::Map(map)
    }
}

impl<T: Into<InputValue>> From<Vec<T>> for InputValue {
    fn from(items: Vec<T>) -> Self {
        InputValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<InputValue>, const N: usize> From<[T; N]> for InputValue {
    fn from(items: [T; N]) -> Self {
        InputValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// Build an [`InputMap`] from `name => value` pairs.
///
/// ```
/// use zkabi_witness::{inputs, InputValue};
///
/// let map = inputs! {
///     "factors" => inputs! { "a" => 2, "b" => 3 },
///     "result" => 6,
/// };
/// assert_eq!(map["result"], InputValue::Signed(6));
/// ```
#[macro_export]
macro_rules! inputs {
    () => {
        $crate::InputMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::InputMap::new();
        $(map.insert(::std::string::String::from($key), $crate::InputValue::from($value));)+
        map
    }};
}
