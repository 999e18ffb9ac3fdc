use tracing::warn;

use timelock_codec::{decode_record, puzzle_from_record};
use timelock_crypto::{aead, password};
use timelock_types::LEGACY_VERSION;

use crate::OpsError;

#[derive(Debug)]
pub struct DecryptOutcome {
    pub plaintext: Vec<u8>,
    pub plaintext_size: usize,
    pub work_factor: u64,
}

/// Opens a serialized container, performing the full sequential solve.
///
/// For password-bound records the base is re-derived from `key` before
/// solving, so a wrong passphrase costs the caller the entire T-squaring
/// chain before it is rejected by the tag check. `progress` receives the
/// solver's running squaring count.
pub fn decrypt_bytes(
    record_bytes: &[u8],
    key: &[u8],
    progress: Option<&mut dyn FnMut(u64)>,
) -> Result<DecryptOutcome, OpsError> {
    let record = decode_record(record_bytes)?;
    if record.version == LEGACY_VERSION {
        return Err(OpsError::LegacyRecord);
    }

    let mut key = key;
    if record.key_required == 1 && key.is_empty() {
        return Err(OpsError::KeyRequiredButMissing);
    }
    if record.key_required == 0 && !key.is_empty() {
        warn!("key provided but the record was sealed without one; ignoring it");
        key = &[];
    }

    let mut puzzle = puzzle_from_record(&record);
    if record.key_required == 1 {
        puzzle.g = password::derive_base(key, &record.salt, &record.kdf_params, &puzzle.n)?;
    }

    let target = match progress {
        Some(report) => puzzle.solve_with_progress(report),
        None => puzzle.solve(),
    };

    let payload_key = aead::derive_key(&target);
    let plaintext = aead::open(&payload_key, &record.data)?;

    Ok(DecryptOutcome {
        plaintext_size: plaintext.len(),
        plaintext,
        work_factor: record.work_factor,
    })
}
