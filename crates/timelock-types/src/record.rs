//! Shared vocabulary for the on-disk container and the puzzle parameters.

/// Length in bytes of a 2048-bit RSA modulus or group element as stored.
pub const MODULUS_BYTES: usize = 256;

/// Length of the password-binding salt.
pub const SALT_BYTES: usize = 16;

/// Serialized length of the KDF parameter block.
pub const KDF_PARAMS_BYTES: usize = 8;

/// ChaCha20-Poly1305 nonce length.
pub const NONCE_BYTES: usize = 12;

/// ChaCha20-Poly1305 authentication tag length.
pub const TAG_BYTES: usize = 16;

/// Current container format version.
pub const CURRENT_VERSION: u32 = 2;

/// First format version; readable but no longer producible.
pub const LEGACY_VERSION: u32 = 1;

/// Wrapped data key field of a version-1 container (32 B key + 16 B tag).
pub const LEGACY_ENC_KEY_BYTES: usize = 48;

/// Nonce field of a version-1 container.
pub const LEGACY_NONCE_BYTES: usize = 12;

/// Fixed-size portion of a version-2 container, up to but excluding
/// `data_len`.
pub const HEADER_BYTES: usize =
    4 + 8 + MODULUS_BYTES + MODULUS_BYTES + 1 + SALT_BYTES + 1 + KDF_PARAMS_BYTES;

/// Identifies how the puzzle base was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum KdfId {
    /// Base drawn uniformly at random; no passphrase involved.
    None = 0,
    /// Base derived from passphrase + salt via Argon2id.
    Argon2id = 1,
}

impl KdfId {
    pub fn from_u8(value: u8) -> Option<KdfId> {
        match value {
            0 => Some(KdfId::None),
            1 => Some(KdfId::Argon2id),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Tunable Argon2id cost parameters.
///
/// Only the memory and pass counts travel in the container; parallelism and
/// output length are fixed by the format version so a multi-core attacker
/// gains nothing over a single-core defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub passes: u32,
}

impl Argon2Params {
    /// Output key length in bytes, fixed by the format.
    pub const OUTPUT_BYTES: usize = 32;

    /// Lane count, fixed by the format.
    pub const PARALLELISM: u32 = 1;

    pub const fn zero() -> Self {
        Argon2Params {
            memory_kib: 0,
            passes: 0,
        }
    }

    /// Big-endian `memory_kib` followed by big-endian `passes`.
    pub fn encode(&self) -> [u8; KDF_PARAMS_BYTES] {
        let mut out = [0u8; KDF_PARAMS_BYTES];
        out[0..4].copy_from_slice(&self.memory_kib.to_be_bytes());
        out[4..8].copy_from_slice(&self.passes.to_be_bytes());
        out
    }

    pub fn decode(raw: [u8; KDF_PARAMS_BYTES]) -> Self {
        Argon2Params {
            memory_kib: u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]),
            passes: u32::from_be_bytes([raw[4], raw[5], raw[6], raw[7]]),
        }
    }
}

impl Default for Argon2Params {
    fn default() -> Self {
        Argon2Params {
            memory_kib: 64 * 1024,
            passes: 3,
        }
    }
}

/// Parsed form of one encrypted container.
///
/// The record owns every byte array; reconstructing a puzzle from it copies
/// what it needs. `data` is the sealed payload: nonce ‖ ciphertext ‖ tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    pub version: u32,
    pub work_factor: u64,
    pub modulus_n: [u8; MODULUS_BYTES],
    pub base_g: [u8; MODULUS_BYTES],
    /// 0 = puzzle only, 1 = puzzle + passphrase.
    pub key_required: u8,
    pub salt: [u8; SALT_BYTES],
    pub kdf_id: KdfId,
    pub kdf_params: Argon2Params,
    pub data: Vec<u8>,
}

impl EncryptedRecord {
    /// Total serialized size of this record in the current layout.
    pub fn encoded_len(&self) -> usize {
        HEADER_BYTES + 8 + self.data.len()
    }
}
