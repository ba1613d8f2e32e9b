//! CLI command implementations

pub mod plan;
pub mod validate;

use crate::error::CliResult;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Read a declared document, as YAML for `.yaml`/`.yml` files and JSON otherwise
pub(crate) fn load_document<T: DeserializeOwned>(file: &str) -> CliResult<T> {
    debug!(file = %file, "Loading document");
    let contents = std::fs::read_to_string(file)?;
    let document = if file.ends_with(".yaml") || file.ends_with(".yml") {
        serde_yaml::from_str(&contents)?
    } else {
        serde_json::from_str(&contents)?
    };
    Ok(document)
}
