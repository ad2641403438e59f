//! Serializable model state

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Architecture, NamedParam};

/// Metadata written next to the parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Architecture name the parameters were exported from.
    pub architecture: String,

    /// Crate version that wrote the file.
    pub version: String,

    /// RFC 3339 timestamp of the save.
    pub saved_at: String,
}

impl ModelMetadata {
    pub fn new(architecture: impl Into<String>) -> Self {
        Self {
            architecture: architecture.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            saved_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Name and shape of one parameter group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    pub shape: Vec<usize>,
}

/// Serializable model state: metadata, parameter layout, and the
/// flattened parameter data in layout order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub metadata: ModelMetadata,
    pub parameters: Vec<ParameterInfo>,
    pub data: Vec<f32>,
}

impl ModelState {
    pub fn from_architecture(arch: &Architecture) -> Self {
        let mut parameters = Vec::new();
        let mut data = Vec::new();
        for param in arch.export_parameters() {
            parameters.push(ParameterInfo {
                name: param.name,
                shape: param.shape,
            });
            data.extend_from_slice(&param.data);
        }
        Self {
            metadata: ModelMetadata::new(arch.name()),
            parameters,
            data,
        }
    }

    /// Split the flattened data back into named parameter groups.
    pub fn into_parameters(self) -> Result<Vec<NamedParam>> {
        let mut params = Vec::with_capacity(self.parameters.len());
        let mut offset = 0;
        for info in self.parameters {
            let len: usize = info.shape.iter().product();
            let end = offset + len;
            if end > self.data.len() {
                return Err(Error::Serialization(format!(
                    "parameter {} runs past the end of the data buffer",
                    info.name
                )));
            }
            params.push(NamedParam {
                name: info.name,
                shape: info.shape,
                data: self.data[offset..end].to_vec(),
            });
            offset = end;
        }
        if offset != self.data.len() {
            return Err(Error::Serialization(format!(
                "data buffer holds {} values but the parameter layout consumes {}",
                self.data.len(),
                offset
            )));
        }
        Ok(params)
    }
}
