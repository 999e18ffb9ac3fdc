use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("RSA modulus generation failed: {0}")]
    KeyGenFailed(String),

    #[error("RSA modulus of {bits} bits is too small for security (minimum 1024)")]
    ModulusTooSmall { bits: u32 },

    #[error("system random number generator failed: {0}")]
    RngFailed(String),

    #[error("Argon2id key derivation failed: {0}")]
    Kdf(String),

    #[error("AEAD sealing failed")]
    SealFailed,

    #[error("decryption failed: wrong passphrase or corrupted data")]
    DecryptionFailed,
}
