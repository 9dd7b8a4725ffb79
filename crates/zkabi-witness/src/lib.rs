//! Witness encoding for compiled circuits.
//!
//! Turns a loosely-typed map of named inputs into the ordered field-element
//! sequence a proving backend consumes, following the circuit's ABI schema.
//!
//! ```
//! use zkabi_schema::{Parameter, ParameterType};
//! use zkabi_witness::{encode, inputs};
//!
//! let params = vec![
//!     Parameter::new("x", ParameterType::field()),
//!     Parameter::new("y", ParameterType::field()),
//! ];
//! let witness = encode(&inputs! { "x" => 1, "y" => 2 }, &params).unwrap();
//! assert_eq!(witness.len(), 2);
//! ```

pub mod encoder;
pub mod error;
pub mod field;
pub mod sequence;
pub mod value;

pub use encoder::{encode, WitnessEncoder};
pub use error::{InputFault, WitnessError, WitnessResult};
pub use field::{encode_scalar, field_modulus, WitnessValue, FIELD_BYTES, FIELD_MODULUS_BYTES};
pub use sequence::WitnessSequence;
pub use value::{inputs_from_json, InputMap, InputValue};
