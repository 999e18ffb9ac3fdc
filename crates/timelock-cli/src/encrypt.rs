use timelock_codec::{encode_record, record_from_puzzle};
use timelock_crypto::{Puzzle, aead};

use crate::OpsError;

/// What an encryption produced, sized for reporting.
#[derive(Debug)]
pub struct EncryptOutcome {
    /// The complete serialized container.
    pub record_bytes: Vec<u8>,
    pub plaintext_size: usize,
    /// Total container size, header included.
    pub ciphertext_size: usize,
    pub work_factor: u64,
    pub key_required: bool,
}

/// Seals `plaintext` behind a fresh time-lock puzzle of `work_factor`
/// squarings. An empty `key` produces a puzzle-only container; otherwise the
/// passphrase is bound into the puzzle base.
///
/// `work_factor = 0` is accepted and yields an instantly decryptable record.
pub fn encrypt_bytes(
    plaintext: &[u8],
    work_factor: u64,
    key: &[u8],
) -> Result<EncryptOutcome, OpsError> {
    let (puzzle, target) = Puzzle::generate(work_factor, key)?;

    let payload_key = aead::derive_key(&target);
    let sealed = aead::seal(&payload_key, plaintext)?;

    let key_required = !key.is_empty();
    let record = record_from_puzzle(&puzzle, key_required, sealed)?;
    let record_bytes = encode_record(&record)?;

    Ok(EncryptOutcome {
        ciphertext_size: record_bytes.len(),
        record_bytes,
        plaintext_size: plaintext.len(),
        work_factor,
        key_required,
    })
}
