//! Named dimension weights consumed by the signal classifier.
//!
//! The mapping comes from an external training pipeline and may be partial.
//! Every read goes through [`WeightMapping::resolve`], which supplies the
//! documented default for a missing key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weights the classifier reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightKey {
    /// `w_C`: weight of the moving-average component of confidence.
    Certainty,
    /// `w_S`: weight of the RSI component of confidence.
    Structure,
    /// `w_V`: weight of the volume component; also loosens the volume
    /// acceptance threshold for Buy signals.
    Generativity,
}

impl WeightKey {
    pub const ALL: [WeightKey; 3] = [
        WeightKey::Certainty,
        WeightKey::Structure,
        WeightKey::Generativity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeightKey::Certainty => "w_C",
            WeightKey::Structure => "w_S",
            WeightKey::Generativity => "w_V",
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            WeightKey::Certainty => 0.213,
            WeightKey::Structure => 0.185,
            WeightKey::Generativity => 0.086,
        }
    }
}

/// Free-form name → weight mapping. Values are not normalized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightMapping {
    weights: BTreeMap<String, f64>,
}

impl WeightMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: f64) {
        self.weights.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.weights.get(name).copied()
    }

    pub fn resolve(&self, key: WeightKey) -> f64 {
        self.get(key.name()).unwrap_or_else(|| key.default_value())
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, f64)> for WeightMapping {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        WeightMapping {
            weights: iter.into_iter().collect(),
        }
    }
}
