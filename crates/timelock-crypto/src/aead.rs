// Payload sealing: the solved target is hashed into a ChaCha20-Poly1305 key,
// and the tag check doubles as the wrong-passphrase/tamper signal.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use rand::rngs::OsRng;
use rug::Integer;
use rug::integer::Order;
use sha2::{Digest, Sha256};
use timelock_types::{MODULUS_BYTES, NONCE_BYTES, TAG_BYTES};
use zeroize::Zeroizing;

use crate::CryptoError;

/// SHA-256 over the target, zero-padded big-endian to the full modulus
/// width. The padding keeps the target-to-key mapping injective across
/// values with leading zero bytes.
pub fn derive_key(target: &Integer) -> Zeroizing<[u8; 32]> {
    let digits = target.to_digits::<u8>(Order::MsfBe);
    let mut padded = Zeroizing::new([0u8; MODULUS_BYTES]);
    let offset = MODULUS_BYTES - digits.len();
    padded[offset..].copy_from_slice(&digits);

    let digest: [u8; 32] = Sha256::digest(&padded[..]).into();
    Zeroizing::new(digest)
}

/// Seals `plaintext` under `key` with a fresh random nonce.
///
/// Blob layout: nonce (12) ‖ ciphertext ‖ tag (16).
pub fn seal(key: &[u8; 32], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));

    let mut nonce = [0u8; NONCE_BYTES];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::RngFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| CryptoError::SealFailed)?;

    let mut blob = Vec::with_capacity(NONCE_BYTES + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Opens a blob produced by [`seal`].
///
/// Every failure mode (wrong key, flipped bit, truncated blob) collapses
/// into [`CryptoError::DecryptionFailed`]; callers must not try to tell a
/// wrong passphrase apart from tampering.
pub fn open(key: &[u8; 32], blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < NONCE_BYTES + TAG_BYTES {
        return Err(CryptoError::DecryptionFailed);
    }
    let (nonce, ciphertext) = blob.split_at(NONCE_BYTES);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seal_open_round_trip() {
        let key = [0x42u8; 32];
        let blob = seal(&key, b"attack at dawn").unwrap();
        assert_eq!(blob.len(), NONCE_BYTES + 14 + TAG_BYTES);
        assert_eq!(open(&key, &blob).unwrap(), b"attack at dawn");
    }

    #[test]
    fn test_fresh_nonce_every_seal() {
        let key = [7u8; 32];
        let a = seal(&key, b"same payload").unwrap();
        let b = seal(&key, b"same payload").unwrap();
        assert_ne!(a, b);
        assert_ne!(a[..NONCE_BYTES], b[..NONCE_BYTES]);
    }

    #[test]
    fn test_wrong_key_fails() {
        let blob = seal(&[1u8; 32], b"payload").unwrap();
        let err = open(&[2u8; 32], &blob).unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed));
    }

    #[test]
    fn test_every_bit_flip_is_caught() {
        let key = [9u8; 32];
        let blob = seal(&key, b"xyz").unwrap();
        for byte in 0..blob.len() {
            for bit in 0..8 {
                let mut tampered = blob.clone();
                tampered[byte] ^= 1 << bit;
                assert!(
                    open(&key, &tampered).is_err(),
                    "flip at byte {byte} bit {bit} went unnoticed"
                );
            }
        }
    }

    #[test]
    fn test_short_blob_rejected() {
        let key = [0u8; 32];
        assert!(matches!(
            open(&key, &[0u8; NONCE_BYTES + TAG_BYTES - 1]),
            Err(CryptoError::DecryptionFailed)
        ));
        assert!(matches!(open(&key, b""), Err(CryptoError::DecryptionFailed)));
    }

    #[test]
    fn test_empty_plaintext_round_trips() {
        let key = [5u8; 32];
        let blob = seal(&key, b"").unwrap();
        assert_eq!(blob.len(), NONCE_BYTES + TAG_BYTES);
        assert_eq!(open(&key, &blob).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_key_padding_distinguishes_small_targets() {
        // Distinct small targets must map to distinct keys even though both
        // occupy a single byte before padding.
        let a = derive_key(&Integer::from(1u32));
        let b = derive_key(&Integer::from(2u32));
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_derive_key_matches_manual_padding() {
        let target = Integer::from(0xDEADBEEFu32);
        let mut padded = [0u8; MODULUS_BYTES];
        padded[MODULUS_BYTES - 4..].copy_from_slice(&0xDEADBEEFu32.to_be_bytes());
        let expected: [u8; 32] = Sha256::digest(padded).into();
        assert_eq!(*derive_key(&target), expected);
    }
}
