use thiserror::Error;
use timelock_codec::CodecError;
use timelock_crypto::CryptoError;

#[derive(Debug, Error)]
pub enum OpsError {
    #[error("failed to read input: {0}")]
    InputIo(#[source] std::io::Error),

    #[error("failed to write output: {0}")]
    OutputIo(#[source] std::io::Error),

    #[error("this file requires a key to decrypt (use --key)")]
    KeyRequiredButMissing,

    #[error("version 1 containers can be inspected but no longer decrypted")]
    LegacyRecord,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl OpsError {
    /// True when the failure means "wrong passphrase or tampered bytes",
    /// the one condition callers are allowed to react to specially.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, OpsError::Crypto(CryptoError::DecryptionFailed))
    }
}
