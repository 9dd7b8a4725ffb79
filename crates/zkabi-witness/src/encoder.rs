//! ABI-driven witness encoder.
//!
//! Walks a parameter list in declared order and turns each named input into
//! field elements:
//!
//! - Field and Integer inputs become one value each;
//! - strings become one value per UTF-8 byte;
//! - arrays are flattened depth-first and checked against the schema's
//!   flattened length before any element is converted;
//! - structs recurse into their fields with the matching sub-map.
//!
//! The schema alone decides the output order. The first failure aborts the
//! call and no partial sequence escapes.

use crate::error::{InputFault, WitnessError, WitnessResult};
use crate::field::{Scalar, WitnessValue};
use crate::sequence::WitnessSequence;
use crate::value::{InputMap, InputValue};
use tracing::{debug, trace};
use zkabi_schema::{CircuitSchema, Parameter, ParameterType};

/// Encode `inputs` against an ordered parameter list
pub fn encode(inputs: &InputMap, parameters: &[Parameter]) -> WitnessResult<WitnessSequence> {
    let mut out = Vec::new();
    encode_parameters(inputs, parameters, "", &mut out)?;
    debug!(
        parameters = parameters.len(),
        values = out.len(),
        "encoded witness"
    );
    Ok(WitnessSequence::from(out))
}

/// Encoder bound to one circuit schema
#[derive(Debug, Clone, Copy)]
pub struct WitnessEncoder<'a> {
    schema: &'a CircuitSchema,
}

impl<'a> WitnessEncoder<'a> {
    pub fn new(schema: &'a CircuitSchema) -> Self {
        Self { schema }
    }

    pub fn encode(&self, inputs: &InputMap) -> WitnessResult<WitnessSequence> {
        encode(inputs, self.schema.parameters())
    }

    /// Length every successful encoding produces
    pub fn expected_len(&self) -> usize {
        self.schema.witness_len()
    }
}

//-----------------------------------------------------------------------------
// Recursive Walk
//-----------------------------------------------------------------------------

fn encode_parameters(
    inputs: &InputMap,
    parameters: &[Parameter],
    scope: &str,
    out: &mut Vec<WitnessValue>,
) -> WitnessResult<()> {
    for param in parameters {
        let path = qualify(scope, &param.name);
        let value = inputs
            .get(&param.name)
            .ok_or_else(|| WitnessError::MissingInput(path.clone()))?;
        let start = out.len();
        encode_value(value, &param.ty, &path, out)?;
        trace!(parameter = %path, values = out.len() - start, "encoded parameter");
    }
    Ok(())
}

fn encode_value(
    value: &InputValue,
    ty: &ParameterType,
    path: &str,
    out: &mut Vec<WitnessValue>,
) -> WitnessResult<()> {
    match ty {
        ParameterType::Field | ParameterType::Integer { .. } => {
            let encoded = Scalar::from_input(value)
                .and_then(|s| s.encode(ty))
                .map_err(|fault| WitnessError::invalid(path, fault))?;
            out.push(encoded);
            Ok(())
        }
        ParameterType::String { length } => {
            let bytes = text_bytes(value).map_err(|fault| WitnessError::invalid(path, fault))?;
            if bytes.len() != *length {
                return Err(WitnessError::invalid(
                    path,
                    InputFault::LengthMismatch {
                        actual: bytes.len(),
                        expected: *length,
                        unit: "bytes",
                    },
                ));
            }
            out.extend(bytes.iter().copied().map(WitnessValue::from_u8));
            Ok(())
        }
        ParameterType::Array { .. } => encode_array(value, ty, path, out),
        ParameterType::Struct { fields, .. } => match value {
            InputValue::Map(map) => encode_parameters(map, fields, path, out),
            _ => Err(WitnessError::invalid(path, InputFault::NotAStruct)),
        },
    }
}

fn encode_array(
    value: &InputValue,
    ty: &ParameterType,
    path: &str,
    out: &mut Vec<WitnessValue>,
) -> WitnessResult<()> {
    let element = ty.innermost();
    match element {
        ParameterType::String { length } => {
            let expected = ty.flattened_len();
            let mut bytes = Vec::new();
            for (index, leaf) in flatten(value, false).into_iter().enumerate() {
                let text = match leaf {
                    Leaf::Value(v) => text_bytes(v),
                    Leaf::Byte(_) => Err(InputFault::NotAString),
                }
                .map_err(|fault| WitnessError::invalid(path, fault.at(index)))?;
                if text.len() != *length {
                    let fault = InputFault::LengthMismatch {
                        actual: text.len(),
                        expected: *length,
                        unit: "bytes",
                    };
                    return Err(WitnessError::invalid(path, fault.at(index)));
                }
                bytes.extend_from_slice(text);
            }
            if bytes.len() != expected {
                return Err(WitnessError::invalid(
                    path,
                    InputFault::LengthMismatch {
                        actual: bytes.len(),
                        expected,
                        unit: "bytes",
                    },
                ));
            }
            out.extend(bytes.into_iter().map(WitnessValue::from_u8));
            Ok(())
        }
        ParameterType::Struct { fields, .. } => {
            let leaves = flatten(value, false);
            let expected = ty.element_count();
            if leaves.len() != expected {
                return Err(WitnessError::invalid(
                    path,
                    InputFault::LengthMismatch {
                        actual: leaves.len(),
                        expected,
                        unit: "elements",
                    },
                ));
            }
            for (index, leaf) in leaves.into_iter().enumerate() {
                match leaf {
                    Leaf::Value(InputValue::Map(map)) => {
                        encode_parameters(map, fields, &format!("{}[{}]", path, index), out)?
                    }
                    _ => {
                        return Err(WitnessError::invalid(
                            path,
                            InputFault::NotAStruct.at(index),
                        ))
                    }
                }
            }
            Ok(())
        }
        _ => {
            let leaves = flatten(value, true);
            let expected = ty.flattened_len();
            if leaves.len() != expected {
                return Err(WitnessError::invalid(
                    path,
                    InputFault::LengthMismatch {
                        actual: leaves.len(),
                        expected,
                        unit: "elements",
                    },
                ));
            }
            for (index, leaf) in leaves.into_iter().enumerate() {
                let scalar = match leaf {
                    Leaf::Value(v) => Scalar::from_input(v),
                    Leaf::Byte(b) => Ok(Scalar::byte(b)),
                };
                let encoded = scalar
                    .and_then(|s| s.encode(element))
                    .map_err(|fault| WitnessError::invalid(path, fault.at(index)))?;
                out.push(encoded);
            }
            Ok(())
        }
    }
}

//-----------------------------------------------------------------------------
// Flattening
//-----------------------------------------------------------------------------

/// A non-sequence element reached while flattening
#[derive(Debug, Clone, Copy)]
enum Leaf<'a> {
    Value(&'a InputValue),
    Byte(u8),
}

/// Collect the leaves of a possibly nested value in traversal order. With
/// `expand_bytes`, byte sequences contribute one leaf per byte; otherwise a
/// byte sequence is a single leaf.
fn flatten(value: &InputValue, expand_bytes: bool) -> Vec<Leaf<'_>> {
    let mut leaves = Vec::new();
    collect_leaves(value, expand_bytes, &mut leaves);
    leaves
}

fn collect_leaves<'a>(value: &'a InputValue, expand_bytes: bool, leaves: &mut Vec<Leaf<'a>>) {
    match value {
        InputValue::List(items) => {
            for item in items {
                collect_leaves(item, expand_bytes, leaves);
            }
        }
        InputValue::Bytes(bytes) if expand_bytes => {
            leaves.extend(bytes.iter().copied().map(Leaf::Byte));
        }
        other => leaves.push(Leaf::Value(other)),
    }
}

/// UTF-8 bytes of a string input. Byte sequences qualify when they are
/// valid UTF-8.
fn text_bytes(value: &InputValue) -> Result<&[u8], InputFault> {
    match value {
        InputValue::Text(s) => Ok(s.as_bytes()),
        InputValue::Bytes(b) => std::str::from_utf8(b)
            .map(str::as_bytes)
            .map_err(|_| InputFault::InvalidUtf8),
        _ => Err(InputFault::NotAString),
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs;
    use zkabi_schema::Sign;

    fn hex(v: u128) -> String {
        WitnessValue::from_u128(v).to_hex()
    }

    fn param(name: &str, ty: ParameterType) -> Parameter {
        Parameter::new(name, ty)
    }

    #[test]
    fn test_two_integers() {
        let params = vec![
            param("x", ParameterType::integer(Sign::Unsigned, 32)),
            param("y", ParameterType::integer(Sign::Unsigned, 32)),
        ];
        let seq = encode(&inputs! { "x" => 1, "y" => 2 }, &params).unwrap();
        assert_eq!(seq.to_hex_strings(), vec![hex(1), hex(2)]);
    }

    #[test]
    fn test_missing_input_names_parameter() {
        let params = vec![param("x", ParameterType::field()), param("y", ParameterType::field())];
        let err = encode(&inputs! { "x" => 1 }, &params).unwrap_err();
        assert_eq!(err, WitnessError::MissingInput("y".to_string()));
    }

    #[test]
    fn test_scalar_rejects_list() {
        let params = vec![param("x", ParameterType::field())];
        let err = encode(&inputs! { "x" => vec![1, 2] }, &params).unwrap_err();
        assert_eq!(err, WitnessError::invalid("x", InputFault::NotAnInteger));
        assert_eq!(err.to_string(), "Invalid input for x: must be an integer");
    }

    #[test]
    fn test_string_bytes_in_order() {
        let params = vec![param("a", ParameterType::string(5))];
        let seq = encode(&inputs! { "a" => "hello" }, &params).unwrap();
        let expected: Vec<String> = b"hello".iter().map(|b| hex(*b as u128)).collect();
        assert_eq!(seq.to_hex_strings(), expected);
    }

    #[test]
    fn test_string_length_mismatch() {
        let params = vec![param("a", ParameterType::string(5))];
        let err = encode(&inputs! { "a" => "hi" }, &params).unwrap_err();
        assert_eq!(
            err,
            WitnessError::invalid(
                "a",
                InputFault::LengthMismatch {
                    actual: 2,
                    expected: 5,
                    unit: "bytes"
                }
            )
        );
    }

    #[test]
    fn test_string_rejects_number() {
        let params = vec![param("a", ParameterType::string(1))];
        let err = encode(&inputs! { "a" => 7 }, &params).unwrap_err();
        assert_eq!(err, WitnessError::invalid("a", InputFault::NotAString));
    }

    #[test]
    fn test_string_from_invalid_utf8_bytes() {
        let params = vec![param("a", ParameterType::string(2))];
        let mut map = InputMap::new();
        map.insert("a".to_string(), InputValue::bytes([0xff, 0xfe]));
        let err = encode(&map, &params).unwrap_err();
        assert_eq!(err, WitnessError::invalid("a", InputFault::InvalidUtf8));
    }

    #[test]
    fn test_array_length_mismatch() {
        let params = vec![param("words", ParameterType::array(13, ParameterType::unsigned(8)))];
        let short: Vec<u8> = b"Hello".to_vec();
        let err = encode(&inputs! { "words" => short }, &params).unwrap_err();
        assert_eq!(
            err,
            WitnessError::invalid(
                "words",
                InputFault::LengthMismatch {
                    actual: 5,
                    expected: 13,
                    unit: "elements"
                }
            )
        );
    }

    #[test]
    fn test_array_from_bytes() {
        let params = vec![param("words", ParameterType::array(3, ParameterType::unsigned(8)))];
        let mut map = InputMap::new();
        map.insert("words".to_string(), InputValue::bytes(b"abc"));
        let seq = encode(&map, &params).unwrap();
        assert_eq!(seq.to_hex_strings(), vec![hex(0x61), hex(0x62), hex(0x63)]);
    }

    #[test]
    fn test_array_element_fault_carries_index() {
        let params = vec![param("xs", ParameterType::array(3, ParameterType::unsigned(8)))];
        let err = encode(&inputs! { "xs" => vec![1, 300, 2] }, &params).unwrap_err();
        assert_eq!(
            err,
            WitnessError::invalid(
                "xs",
                InputFault::OutOfRange {
                    value: "300".to_string(),
                    ty: "u8".to_string()
                }
                .at(1)
            )
        );
    }

    #[test]
    fn test_multi_dimensional_flattening() {
        let ty = ParameterType::array(2, ParameterType::array(5, ParameterType::field()));
        let params = vec![param("a", ty)];
        let nested = encode(
            &inputs! { "a" => vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]] },
            &params,
        )
        .unwrap();
        let flat = encode(&inputs! { "a" => (1..=10).collect::<Vec<i32>>() }, &params).unwrap();
        assert_eq!(nested, flat);
        assert_eq!(nested.to_hex_strings(), (1..=10).map(hex).collect::<Vec<_>>());
    }

    #[test]
    fn test_scalar_accepted_for_single_element_array() {
        let params = vec![param("a", ParameterType::array(1, ParameterType::field()))];
        let seq = encode(&inputs! { "a" => 9 }, &params).unwrap();
        assert_eq!(seq.to_hex_strings(), vec![hex(9)]);
    }

    #[test]
    fn test_array_of_strings() {
        let params = vec![param("c", ParameterType::array(2, ParameterType::string(5)))];
        let seq = encode(&inputs! { "c" => vec!["hello", "world"] }, &params).unwrap();
        let expected: Vec<String> = b"helloworld".iter().map(|b| hex(*b as u128)).collect();
        assert_eq!(seq.to_hex_strings(), expected);
    }

    #[test]
    fn test_array_of_strings_wrong_element_length() {
        let params = vec![param("c", ParameterType::array(2, ParameterType::string(5)))];
        let err = encode(&inputs! { "c" => vec!["hello", "word"] }, &params).unwrap_err();
        assert_eq!(
            err,
            WitnessError::invalid(
                "c",
                InputFault::LengthMismatch {
                    actual: 4,
                    expected: 5,
                    unit: "bytes"
                }
                .at(1)
            )
        );
    }

    #[test]
    fn test_array_of_strings_wrong_count() {
        let params = vec![param("c", ParameterType::array(3, ParameterType::string(5)))];
        let err = encode(&inputs! { "c" => vec!["hello", "world"] }, &params).unwrap_err();
        assert_eq!(
            err,
            WitnessError::invalid(
                "c",
                InputFault::LengthMismatch {
                    actual: 10,
                    expected: 15,
                    unit: "bytes"
                }
            )
        );
    }

    #[test]
    fn test_array_of_strings_invalid_utf8_element() {
        let params = vec![param("c", ParameterType::array(2, ParameterType::string(2)))];
        let mut map = InputMap::new();
        map.insert(
            "c".to_string(),
            InputValue::List(vec![InputValue::text("ab"), InputValue::bytes([0xff, 0xfe])]),
        );
        let err = encode(&map, &params).unwrap_err();
        assert_eq!(err, WitnessError::invalid("c", InputFault::InvalidUtf8.at(1)));
        assert_eq!(
            err.to_string(),
            "Invalid input for c: element 1: is not valid UTF-8"
        );
    }

    #[test]
    fn test_string_from_utf8_bytes() {
        let params = vec![
            param("a", ParameterType::string(2)),
            param("c", ParameterType::array(2, ParameterType::string(2))),
        ];
        let mut map = InputMap::new();
        map.insert("a".to_string(), InputValue::bytes(b"hi"));
        map.insert(
            "c".to_string(),
            InputValue::List(vec![InputValue::bytes(b"ab"), InputValue::text("cd")]),
        );
        let seq = encode(&map, &params).unwrap();
        let expected: Vec<String> = b"hiabcd".iter().map(|b| hex(*b as u128)).collect();
        assert_eq!(seq.to_hex_strings(), expected);
    }

    #[test]
    fn test_array_of_strings_rejects_numbers() {
        let params = vec![param("c", ParameterType::array(2, ParameterType::string(1)))];
        let err = encode(&inputs! { "c" => vec![1, 2] }, &params).unwrap_err();
        assert_eq!(err, WitnessError::invalid("c", InputFault::NotAString.at(0)));
    }

    #[test]
    fn test_struct_field_order() {
        let factors = ParameterType::structure(
            "main::Factors",
            vec![param("a", ParameterType::field()), param("b", ParameterType::field())],
        );
        let params = vec![param("factors", factors), param("result", ParameterType::field())];
        let seq = encode(
            &inputs! { "result" => 6, "factors" => inputs! { "b" => 3, "a" => 2 } },
            &params,
        )
        .unwrap();
        assert_eq!(seq.to_hex_strings(), vec![hex(2), hex(3), hex(6)]);
    }

    #[test]
    fn test_struct_errors_use_dotted_path() {
        let factors = ParameterType::structure(
            "main::Factors",
            vec![param("a", ParameterType::field()), param("b", ParameterType::field())],
        );
        let params = vec![param("factors", factors)];

        let err = encode(&inputs! { "factors" => inputs! { "a" => 2 } }, &params).unwrap_err();
        assert_eq!(err, WitnessError::MissingInput("factors.b".to_string()));

        let err = encode(&inputs! { "factors" => vec![2, 3] }, &params).unwrap_err();
        assert_eq!(err, WitnessError::invalid("factors", InputFault::NotAStruct));
    }

    #[test]
    fn test_array_of_structs() {
        let point = ParameterType::structure(
            "main::Point",
            vec![param("x", ParameterType::field()), param("y", ParameterType::field())],
        );
        let params = vec![param("points", ParameterType::array(2, point))];
        let seq = encode(
            &inputs! { "points" => vec![inputs! { "x" => 1, "y" => 2 }, inputs! { "y" => 4, "x" => 3 }] },
            &params,
        )
        .unwrap();
        assert_eq!(seq.to_hex_strings(), (1..=4).map(hex).collect::<Vec<_>>());

        let err = encode(
            &inputs! { "points" => vec![inputs! { "x" => 1, "y" => 2 }, inputs! { "x" => 3 }] },
            &params,
        )
        .unwrap_err();
        assert_eq!(err, WitnessError::MissingInput("points[1].y".to_string()));

        let err = encode(&inputs! { "points" => vec![inputs! { "x" => 1, "y" => 2 }] }, &params)
            .unwrap_err();
        assert_eq!(
            err,
            WitnessError::invalid(
                "points",
                InputFault::LengthMismatch {
                    actual: 1,
                    expected: 2,
                    unit: "elements"
                }
            )
        );
    }

    #[test]
    fn test_encoder_bound_to_schema() {
        let schema = CircuitSchema::new(vec![
            param("x", ParameterType::field()),
            param("s", ParameterType::string(3)),
        ])
        .unwrap();
        let encoder = WitnessEncoder::new(&schema);
        assert_eq!(encoder.expected_len(), 4);
        let seq = encoder.encode(&inputs! { "x" => "0x1", "s" => "abc" }).unwrap();
        assert_eq!(seq.len(), encoder.expected_len());
    }
}
