pub mod record;

pub use record::Argon2Params;
pub use record::EncryptedRecord;
pub use record::KdfId;
pub use record::{
    CURRENT_VERSION, HEADER_BYTES, KDF_PARAMS_BYTES, LEGACY_ENC_KEY_BYTES, LEGACY_NONCE_BYTES,
    LEGACY_VERSION, MODULUS_BYTES, NONCE_BYTES, SALT_BYTES, TAG_BYTES,
};
