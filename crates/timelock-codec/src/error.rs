use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),

    #[error("container truncated")]
    Truncated,

    #[error("malformed container: {0}")]
    Malformed(String),
}
