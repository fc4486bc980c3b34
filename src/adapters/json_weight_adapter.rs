//! JSON weight file adapter.
//!
//! The file holds an object whose `field` member maps weight names to numbers,
//! e.g. `{"weights": {"w_C": 0.213, "w_S": 0.185, "w_V": 0.086}}`. Other
//! top-level members are ignored.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::config_validation::DataConfig;
use crate::domain::error::MtftraderError;
use crate::domain::weights::WeightMapping;
use crate::ports::weight_port::WeightPort;

pub struct JsonWeightAdapter {
    path: PathBuf,
    field: String,
}

impl JsonWeightAdapter {
    pub fn new(path: PathBuf, field: impl Into<String>) -> Self {
        Self {
            path,
            field: field.into(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(config.weights_path.clone(), config.weights_field.clone())
    }

    fn source_error(&self, reason: impl std::fmt::Display) -> MtftraderError {
        MtftraderError::WeightSource {
            reason: format!("{}: {}", self.path.display(), reason),
        }
    }
}

impl WeightPort for JsonWeightAdapter {
    fn load_weights(&self) -> Result<WeightMapping, MtftraderError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "weight file not found, using defaults");
                return Ok(WeightMapping::new());
            }
            Err(e) => return Err(self.source_error(e)),
        };

        let document: Value = serde_json::from_str(&content).map_err(|e| self.source_error(e))?;
        let Some(field) = document.get(&self.field) else {
            warn!(
                path = %self.path.display(),
                field = %self.field,
                "weight field missing, using defaults"
            );
            return Ok(WeightMapping::new());
        };

        let object = field
            .as_object()
            .ok_or_else(|| self.source_error(format!("field {:?} is not an object", self.field)))?;

        let mut weights = WeightMapping::new();
        for (name, value) in object {
            let weight = value
                .as_f64()
                .ok_or_else(|| self.source_error(format!("weight {:?} is not a number", name)))?;
            weights.insert(name, weight);
        }
        debug!(path = %self.path.display(), count = weights.len(), "loaded weights");
        Ok(weights)
    }
}
