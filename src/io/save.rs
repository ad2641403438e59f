//! Parameter saving

use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::model::ModelState;
use crate::error::{Error, Result};
use crate::graph::Architecture;

/// Serialize an architecture's learned parameters (including
/// normalization running statistics) to a JSON file.
pub fn save_parameters(arch: &Architecture, path: impl AsRef<Path>) -> Result<()> {
    let state = ModelState::from_architecture(arch);
    let data = serde_json::to_string(&state)
        .map_err(|e| Error::Serialization(format!("JSON serialization failed: {e}")))?;
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    Ok(())
}
