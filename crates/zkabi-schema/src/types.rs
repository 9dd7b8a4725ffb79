//! Schema model for circuit ABI parameters.
//!
//! A [`ParameterType`] describes the shape of one named input: a scalar
//! (integer or field element), a fixed-length array of another type, a
//! fixed-length string, or a struct with an ordered list of named fields.
//! The shapes are recursive and immutable once built; a [`CircuitSchema`]
//! holds the ordered top-level parameters of one circuit and is the single
//! source of truth for witness layout.

use crate::error::{SchemaError, SchemaResult};
use std::collections::HashSet;
use std::fmt;

/// Largest integer bit width accepted by the schema. Every integer of this
/// width still fits below the BN254 scalar field modulus.
pub const MAX_INTEGER_WIDTH: u32 = 253;

//-----------------------------------------------------------------------------
// Sign
//-----------------------------------------------------------------------------

/// Signedness of an integer parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Signed,
    Unsigned,
}

impl Sign {
    /// Manifest spelling of this sign
    pub fn as_str(&self) -> &'static str {
        match self {
            Sign::Signed => "signed",
            Sign::Unsigned => "unsigned",
        }
    }

    /// Parse the manifest spelling of a sign
    pub fn parse(s: &str) -> SchemaResult<Self> {
        match s {
            "signed" => Ok(Sign::Signed),
            "unsigned" => Ok(Sign::Unsigned),
            other => Err(SchemaError::UnknownSign(other.to_string())),
        }
    }
}

//-----------------------------------------------------------------------------
// Parameter Types
//-----------------------------------------------------------------------------

/// Shape of a single ABI parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// Scalar integer of the given sign and bit width
    Integer { sign: Sign, width: u32 },

    /// Native field element
    Field,

    /// Fixed-length homogeneous sequence
    Array {
        length: usize,
        element: Box<ParameterType>,
    },

    /// Fixed-length UTF-8 text, encoded one value per byte
    String { length: usize },

    /// Composite with a deterministic field order
    Struct {
        /// Fully qualified type name, used only in diagnostics
        path: String,
        fields: Vec<Parameter>,
    },
}

impl ParameterType {
    pub fn field() -> Self {
        ParameterType::Field
    }

    pub fn integer(sign: Sign, width: u32) -> Self {
        ParameterType::Integer { sign, width }
    }

    pub fn unsigned(width: u32) -> Self {
        ParameterType::integer(Sign::Unsigned, width)
    }

    pub fn signed(width: u32) -> Self {
        ParameterType::integer(Sign::Signed, width)
    }

    pub fn array(length: usize, element: ParameterType) -> Self {
        ParameterType::Array {
            length,
            element: Box::new(element),
        }
    }

    pub fn string(length: usize) -> Self {
        ParameterType::String { length }
    }

    pub fn structure(path: impl Into<String>, fields: Vec<Parameter>) -> Self {
        ParameterType::Struct {
            path: path.into(),
            fields,
        }
    }

    /// The manifest `kind` discriminator for this type
    pub fn kind(&self) -> &'static str {
        match self {
            ParameterType::Integer { .. } => "integer",
            ParameterType::Field => "field",
            ParameterType::Array { .. } => "array",
            ParameterType::String { .. } => "string",
            ParameterType::Struct { .. } => "struct",
        }
    }

    /// True for types that encode to exactly one witness value
    pub fn is_scalar(&self) -> bool {
        matches!(self, ParameterType::Integer { .. } | ParameterType::Field)
    }

    /// Number of witness values this type flattens to.
    ///
    /// Saturates instead of overflowing; schemas built through
    /// [`CircuitSchema::new`] are checked so that saturation never happens.
    pub fn flattened_len(&self) -> usize {
        self.checked_flattened_len().unwrap_or(usize::MAX)
    }

    /// Number of witness values this type flattens to, or `None` on overflow
    pub fn checked_flattened_len(&self) -> Option<usize> {
        match self {
            ParameterType::Integer { .. } | ParameterType::Field => Some(1),
            ParameterType::String { length } => Some(*length),
            ParameterType::Array { length, element } => {
                length.checked_mul(element.checked_flattened_len()?)
            }
            ParameterType::Struct { fields, .. } => fields
                .iter()
                .try_fold(0usize, |acc, f| acc.checked_add(f.ty.checked_flattened_len()?)),
        }
    }

    /// The first non-array type reached by descending through array elements
    pub fn innermost(&self) -> &ParameterType {
        match self {
            ParameterType::Array { element, .. } => element.innermost(),
            other => other,
        }
    }

    /// Product of all array dimensions; 1 for non-array types
    pub fn element_count(&self) -> usize {
        match self {
            ParameterType::Array { length, element } => {
                length.saturating_mul(element.element_count())
            }
            _ => 1,
        }
    }

    /// Ordered fields of a struct type
    pub fn fields(&self) -> Option<&[Parameter]> {
        match self {
            ParameterType::Struct { fields, .. } => Some(fields),
            _ => None,
        }
    }

    /// Element type of an array type
    pub fn element(&self) -> Option<&ParameterType> {
        match self {
            ParameterType::Array { element, .. } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Integer {
                sign: Sign::Signed,
                width,
            } => write!(f, "i{}", width),
            ParameterType::Integer {
                sign: Sign::Unsigned,
                width,
            } => write!(f, "u{}", width),
            ParameterType::Field => write!(f, "Field"),
            ParameterType::Array { length, element } => write!(f, "[{}; {}]", element, length),
            ParameterType::String { length } => write!(f, "str<{}>", length),
            ParameterType::Struct { path, .. } => write!(f, "{}", path),
        }
    }
}

//-----------------------------------------------------------------------------
// Parameters
//-----------------------------------------------------------------------------

/// A named, typed entry in a parameter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: ParameterType,
    /// Visibility annotation carried through from the manifest; the encoder
    /// does not interpret it.
    pub visibility: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParameterType) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: None,
        }
    }

    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = Some(visibility.into());
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility.as_deref() == Some("public")
    }
}

//-----------------------------------------------------------------------------
// Circuit Schema
//-----------------------------------------------------------------------------

/// Ordered top-level parameters of one circuit
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CircuitSchema {
    parameters: Vec<Parameter>,
}

impl CircuitSchema {
    /// Build a schema, validating names, integer widths and lengths
    pub fn new(parameters: Vec<Parameter>) -> SchemaResult<Self> {
        validate_parameters(&parameters, "")?;
        Ok(Self { parameters })
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Total number of witness values an input for this schema encodes to
    pub fn witness_len(&self) -> usize {
        self.parameters.iter().map(|p| p.ty.flattened_len()).sum()
    }
}

fn validate_parameters(parameters: &[Parameter], scope: &str) -> SchemaResult<()> {
    let mut seen = HashSet::new();
    let mut total = 0usize;
    for param in parameters {
        let path = qualify(scope, &param.name);
        if !seen.insert(param.name.as_str()) {
            return Err(SchemaError::DuplicateParameter(path));
        }
        validate_type(&param.ty, &path)?;
        let len = param
            .ty
            .checked_flattened_len()
            .ok_or_else(|| SchemaError::LengthOverflow(path.clone()))?;
        total = total
            .checked_add(len)
            .ok_or_else(|| SchemaError::LengthOverflow(path.clone()))?;
    }
    Ok(())
}

fn validate_type(ty: &ParameterType, path: &str) -> SchemaResult<()> {
    match ty {
        ParameterType::Integer { width, .. } => {
            if *width == 0 || *width > MAX_INTEGER_WIDTH {
                return Err(SchemaError::InvalidWidth {
                    width: *width,
                    max: MAX_INTEGER_WIDTH,
                });
            }
            Ok(())
        }
        ParameterType::Field | ParameterType::String { .. } => Ok(()),
        ParameterType::Array { element, .. } => validate_type(element, path),
        ParameterType::Struct { fields, .. } => validate_parameters(fields, path),
    }
}

fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}
