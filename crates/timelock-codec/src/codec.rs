//! Byte-exact container serialization.
//!
//! Scalars are little-endian; the two group elements are stored verbatim in
//! big-endian, zero-padded to the fixed 256-byte width. The variable-length
//! payload is preceded by its u64 length; any bytes after it are ignored.

use rug::Integer;
use rug::integer::Order;
use timelock_crypto::Puzzle;
use timelock_types::{
    Argon2Params, CURRENT_VERSION, EncryptedRecord, HEADER_BYTES, KDF_PARAMS_BYTES, KdfId,
    LEGACY_ENC_KEY_BYTES, LEGACY_NONCE_BYTES, LEGACY_VERSION, MODULUS_BYTES, SALT_BYTES,
};

use crate::CodecError;

/// Serializes a record. Only the current version is writable; legacy records
/// exist to be read, never re-emitted.
pub fn encode_record(record: &EncryptedRecord) -> Result<Vec<u8>, CodecError> {
    if record.version != CURRENT_VERSION {
        return Err(CodecError::UnsupportedVersion(record.version));
    }

    let mut out = Vec::with_capacity(HEADER_BYTES + 8 + record.data.len());
    out.extend_from_slice(&record.version.to_le_bytes());
    out.extend_from_slice(&record.work_factor.to_le_bytes());
    out.extend_from_slice(&record.modulus_n);
    out.extend_from_slice(&record.base_g);
    out.push(record.key_required);
    out.extend_from_slice(&record.salt);
    out.push(record.kdf_id.as_u8());
    out.extend_from_slice(&record.kdf_params.encode());
    out.extend_from_slice(&(record.data.len() as u64).to_le_bytes());
    out.extend_from_slice(&record.data);
    Ok(out)
}

pub fn decode_record(bytes: &[u8]) -> Result<EncryptedRecord, CodecError> {
    let mut cursor = Cursor::new(bytes);

    let version = cursor.u32_le()?;
    if version != CURRENT_VERSION && version != LEGACY_VERSION {
        return Err(CodecError::UnsupportedVersion(version));
    }

    let work_factor = cursor.u64_le()?;
    let modulus_n: [u8; MODULUS_BYTES] = cursor.array()?;
    let base_g: [u8; MODULUS_BYTES] = cursor.array()?;

    let key_required = cursor.u8()?;
    if key_required > 1 {
        return Err(CodecError::Malformed(format!(
            "key_required must be 0 or 1, got {key_required}"
        )));
    }

    let (salt, kdf_id, kdf_params) = if version >= CURRENT_VERSION {
        let salt: [u8; SALT_BYTES] = cursor.array()?;
        let raw_kdf = cursor.u8()?;
        let kdf_id = KdfId::from_u8(raw_kdf)
            .ok_or_else(|| CodecError::Malformed(format!("unknown kdf id {raw_kdf}")))?;
        let kdf_params = Argon2Params::decode(cursor.array::<KDF_PARAMS_BYTES>()?);
        if key_required == 1 && kdf_id == KdfId::None {
            return Err(CodecError::Malformed(
                "password-bound record carries no kdf".into(),
            ));
        }
        (salt, kdf_id, kdf_params)
    } else {
        // The first format wrapped a random data key here; skip its fields.
        cursor.take(LEGACY_ENC_KEY_BYTES + LEGACY_NONCE_BYTES)?;
        ([0u8; SALT_BYTES], KdfId::None, Argon2Params::zero())
    };

    let data_len = cursor.u64_le()?;
    if data_len > cursor.remaining() as u64 {
        return Err(CodecError::Truncated);
    }
    let data = cursor.take(data_len as usize)?.to_vec();

    Ok(EncryptedRecord {
        version,
        work_factor,
        modulus_n,
        base_g,
        key_required,
        salt,
        kdf_id,
        kdf_params,
        data,
    })
}

/// Zero-pads a group element to the fixed storage width.
pub fn element_to_bytes(x: &Integer) -> Result<[u8; MODULUS_BYTES], CodecError> {
    let digits = x.to_digits::<u8>(Order::MsfBe);
    if digits.len() > MODULUS_BYTES {
        return Err(CodecError::Malformed(format!(
            "group element of {} bytes exceeds the {MODULUS_BYTES}-byte container field",
            digits.len()
        )));
    }
    let mut out = [0u8; MODULUS_BYTES];
    out[MODULUS_BYTES - digits.len()..].copy_from_slice(&digits);
    Ok(out)
}

/// Builds the container record for a freshly generated puzzle and its sealed
/// payload.
pub fn record_from_puzzle(
    puzzle: &Puzzle,
    key_required: bool,
    data: Vec<u8>,
) -> Result<EncryptedRecord, CodecError> {
    Ok(EncryptedRecord {
        version: CURRENT_VERSION,
        work_factor: puzzle.t,
        modulus_n: element_to_bytes(&puzzle.n)?,
        base_g: element_to_bytes(&puzzle.g)?,
        key_required: key_required as u8,
        salt: puzzle.salt,
        kdf_id: puzzle.kdf_id,
        kdf_params: puzzle.kdf_params,
        data,
    })
}

/// Reconstructs the solvable puzzle from a parsed record. The solution is
/// not stored anywhere; recovering it is the whole point of the exercise.
pub fn puzzle_from_record(record: &EncryptedRecord) -> Puzzle {
    Puzzle {
        n: Integer::from_digits(&record.modulus_n, Order::MsfBe),
        g: Integer::from_digits(&record.base_g, Order::MsfBe),
        t: record.work_factor,
        salt: record.salt,
        kdf_id: record.kdf_id,
        kdf_params: record.kdf_params,
    }
}

struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if self.remaining() < n {
            return Err(CodecError::Truncated);
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u32_le(&mut self) -> Result<u32, CodecError> {
        let raw = self.take(4)?;
        Ok(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
    }

    fn u64_le(&mut self) -> Result<u64, CodecError> {
        let raw = self.take(8)?;
        Ok(u64::from_le_bytes([
            raw[0], raw[1], raw[2], raw[3], raw[4], raw[5], raw[6], raw[7],
        ]))
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}
