//! JSON wire shape of ABI types.
//!
//! Manifests describe every type as an object carrying a `kind`
//! discriminator plus the keys that kind needs. The raw structs here mirror
//! that layout one to one; conversion into [`ParameterType`] is where unknown
//! kinds and missing keys are rejected.

use crate::error::SchemaError;
use crate::types::{Parameter, ParameterType, Sign};
use serde::{Deserialize, Serialize};

/// A parameter exactly as it appears in a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

/// A type exactly as it appears in a manifest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawType {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub element: Option<Box<RawType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<RawParameter>>,
}

fn required<T>(value: Option<T>, kind: &str, key: &'static str) -> Result<T, SchemaError> {
    value.ok_or_else(|| SchemaError::MissingKey {
        kind: kind.to_string(),
        key,
    })
}

impl TryFrom<RawType> for ParameterType {
    type Error = SchemaError;

    fn try_from(raw: RawType) -> Result<Self, Self::Error> {
        let kind = raw.kind.as_str();
        match kind {
            "integer" => {
                let sign = Sign::parse(&required(raw.sign, kind, "sign")?)?;
                let width = required(raw.width, kind, "width")?;
                Ok(ParameterType::Integer { sign, width })
            }
            "field" => Ok(ParameterType::Field),
            "array" => {
                let length = required(raw.length, kind, "length")?;
                let element = required(raw.element, kind, "type")?;
                Ok(ParameterType::array(length, ParameterType::try_from(*element)?))
            }
            "string" => Ok(ParameterType::String {
                length: required(raw.length, kind, "length")?,
            }),
            "struct" => {
                let path = required(raw.path, kind, "path")?;
                let fields = required(raw.fields, kind, "fields")?
                    .into_iter()
                    .map(Parameter::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(ParameterType::Struct { path, fields })
            }
            other => Err(SchemaError::UnknownKind(other.to_string())),
        }
    }
}

impl TryFrom<RawParameter> for Parameter {
    type Error = SchemaError;

    fn try_from(raw: RawParameter) -> Result<Self, Self::Error> {
        Ok(Parameter {
            name: raw.name,
            ty: ParameterType::try_from(raw.ty)?,
            visibility: raw.visibility,
        })
    }
}

impl From<&ParameterType> for RawType {
    fn from(ty: &ParameterType) -> Self {
        let kind = ty.kind().to_string();
        match ty {
            ParameterType::Integer { sign, width } => RawType {
                kind,
                sign: Some(sign.as_str().to_string()),
                width: Some(*width),
                ..Default::default()
            },
            ParameterType::Field => RawType {
                kind,
                ..Default::default()
            },
            ParameterType::Array { length, element } => RawType {
                kind,
                length: Some(*length),
                element: Some(Box::new(RawType::from(element.as_ref()))),
                ..Default::default()
            },
            ParameterType::String { length } => RawType {
                kind,
                length: Some(*length),
                ..Default::default()
            },
            ParameterType::Struct { path, fields } => RawType {
                kind,
                path: Some(path.clone()),
                fields: Some(fields.iter().map(RawParameter::from).collect()),
                ..Default::default()
            },
        }
    }
}

impl From<&Parameter> for RawParameter {
    fn from(param: &Parameter) -> Self {
        RawParameter {
            name: param.name.clone(),
            ty: RawType::from(&param.ty),
            visibility: param.visibility.clone(),
        }
    }
}
