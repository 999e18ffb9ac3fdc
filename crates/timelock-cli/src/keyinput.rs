use crate::OpsError;

const FILE_PREFIX: &str = "@file:";

/// Resolves the `--key` argument to raw key bytes.
///
/// Empty input means "puzzle only"; `@file:<path>` loads the referenced
/// file; anything else is taken literally. The resulting bytes are opaque to
/// every layer below this one.
pub fn parse_key_input(key_input: &str) -> Result<Vec<u8>, OpsError> {
    if key_input.is_empty() {
        return Ok(Vec::new());
    }
    if let Some(path) = key_input.strip_prefix(FILE_PREFIX) {
        return std::fs::read(path).map_err(OpsError::InputIo);
    }
    Ok(key_input.as_bytes().to_vec())
}
