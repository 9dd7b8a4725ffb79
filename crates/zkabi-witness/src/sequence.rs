//! Ordered witness output

use crate::field::WitnessValue;
use serde::{Deserialize, Serialize};

/// Ordered field elements produced by one encoding call
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessSequence(Vec<WitnessValue>);

impl WitnessSequence {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WitnessValue> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[WitnessValue] {
        &self.0
    }

    /// Wire form handed to proving backends
    pub fn to_hex_strings(&self) -> Vec<String> {
        self.0.iter().map(WitnessValue::to_hex).collect()
    }

    pub fn into_inner(self) -> Vec<WitnessValue> {
        self.0
    }
}

impl From<Vec<WitnessValue>> for WitnessSequence {
    fn from(values: Vec<WitnessValue>) -> Self {
        WitnessSequence(values)
    }
}

impl FromIterator<WitnessValue> for WitnessSequence {
    fn from_iter<I: IntoIterator<Item = WitnessValue>>(iter: I) -> Self {
        WitnessSequence(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a WitnessSequence {
    type Item = &'a WitnessValue;
    type IntoIter = std::slice::Iter<'a, WitnessValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for WitnessSequence {
    type Item = WitnessValue;
    type IntoIter = std::vec::IntoIter<WitnessValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_is_array_of_hex_strings() {
        let seq: WitnessSequence = (1..=2).map(WitnessValue::from_u128).collect();
        let json = serde_json::to_value(&seq).unwrap();
        assert_eq!(json, serde_json::json!(seq.to_hex_strings()));
        let back: WitnessSequence = serde_json::from_value(json).unwrap();
        assert_eq!(back, seq);

        let values = seq.into_inner();
        assert_eq!(values, vec![WitnessValue::from_u128(1), WitnessValue::from_u128(2)]);
    }
}
