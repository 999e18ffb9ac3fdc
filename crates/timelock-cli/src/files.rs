use std::path::{Path, PathBuf};

use crate::OpsError;

/// Suffix appended to encrypted outputs and stripped from decrypted ones.
pub const LOCKED_SUFFIX: &str = ".locked";

pub fn read_input(path: &Path) -> Result<Vec<u8>, OpsError> {
    std::fs::read(path).map_err(OpsError::InputIo)
}

pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), OpsError> {
    std::fs::write(path, bytes).map_err(OpsError::OutputIo)
}

/// Default decryption output: strip a trailing `.locked`, or append
/// `.decrypted` when the input does not carry the suffix.
pub fn infer_output_path(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    match name.strip_suffix(LOCKED_SUFFIX) {
        Some(stripped) => PathBuf::from(stripped),
        None => PathBuf::from(format!("{name}.decrypted")),
    }
}
