//! Parameter loading

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::ModelState;
use crate::error::{Error, Result};
use crate::graph::Architecture;

/// Restore an architecture's parameters from a JSON file written by
/// [`save_parameters`](super::save_parameters).
///
/// The target must have the same shape the file was exported from:
/// architecture names, parameter names, and shapes are all validated
/// before anything is written, and a successful load leaves inference
/// behavior identical to the saved network.
pub fn load_parameters(arch: &mut Architecture, path: impl AsRef<Path>) -> Result<()> {
    let mut content = String::new();
    File::open(path)?.read_to_string(&mut content)?;

    let state: ModelState = serde_json::from_str(&content)
        .map_err(|e| Error::Serialization(format!("JSON deserialization failed: {e}")))?;

    if state.metadata.architecture != arch.name() {
        return Err(Error::Serialization(format!(
            "file holds {:?} parameters, target architecture is {:?}",
            state.metadata.architecture,
            arch.name()
        )));
    }

    arch.import_parameters(state.into_parameters()?)
}
