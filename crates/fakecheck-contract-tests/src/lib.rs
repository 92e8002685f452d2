//! Shared helpers for validating `contracts/` fixtures.

use std::path::PathBuf;

use serde_json::Value;

/// Returns the path of a file under the workspace `contracts/` directory.
pub fn contract_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../contracts")
        .join(relative)
}

/// Reads and parses a JSON file under `contracts/`.
///
/// # Errors
/// Returns a message naming the file when it is unreadable or not JSON.
pub fn load_contract_json(relative: &str) -> Result<Value, String> {
    let path = contract_path(relative);
    let raw = std::fs::read_to_string(&path)
        .map_err(|error| format!("{}: {error}", path.display()))?;
    serde_json::from_str(&raw).map_err(|error| format!("{}: {error}", path.display()))
}
