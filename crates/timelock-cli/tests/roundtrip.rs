use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use timelock_cli::{OpsError, decrypt_bytes, encrypt_bytes, inspect};
use timelock_types::{CURRENT_VERSION, HEADER_BYTES};

#[test]
fn test_puzzle_only_roundtrip() {
    let payload = b"Hello, World! This is a test message.";
    assert_eq!(payload.len(), 37);

    let sealed = encrypt_bytes(payload, 1000, b"").unwrap();
    assert!(!sealed.key_required);
    assert_eq!(sealed.plaintext_size, 37);
    assert_eq!(sealed.ciphertext_size, sealed.record_bytes.len());

    let opened = decrypt_bytes(&sealed.record_bytes, b"", None).unwrap();
    assert_eq!(opened.plaintext, payload);
    assert_eq!(opened.work_factor, 1000);
}

#[test]
fn test_password_roundtrip_and_rejections() {
    let payload = b"Secret message";
    let sealed = encrypt_bytes(payload, 1000, b"correct_password").unwrap();
    assert!(sealed.key_required);

    let opened = decrypt_bytes(&sealed.record_bytes, b"correct_password", None).unwrap();
    assert_eq!(opened.plaintext, payload);

    let wrong = decrypt_bytes(&sealed.record_bytes, b"wrong_password", None).unwrap_err();
    assert!(wrong.is_decryption_failure(), "got {wrong:?}");

    let missing = decrypt_bytes(&sealed.record_bytes, b"", None).unwrap_err();
    assert!(matches!(missing, OpsError::KeyRequiredButMissing));
}

#[test]
fn test_zero_work_record_is_instant() {
    let sealed = encrypt_bytes(b"x", 0, b"").unwrap();
    let meta = inspect(&sealed.record_bytes).unwrap();
    assert_eq!(meta.version, CURRENT_VERSION);
    assert_eq!(meta.work_factor, 0);

    let mut progress_calls = 0u32;
    let mut count = |_done: u64| progress_calls += 1;
    let opened = decrypt_bytes(&sealed.record_bytes, b"", Some(&mut count)).unwrap();
    assert_eq!(opened.plaintext, b"x");
    assert_eq!(progress_calls, 0, "zero squarings, zero reports");
}

#[test]
fn test_stray_key_is_ignored() {
    let sealed = encrypt_bytes(b"open to anyone patient enough", 1000, b"").unwrap();
    let opened = decrypt_bytes(&sealed.record_bytes, b"anything", None).unwrap();
    assert_eq!(opened.plaintext, b"open to anyone patient enough");
}

#[test]
fn test_tampering_is_detected() {
    let payload = [7u8; 50];
    let sealed = encrypt_bytes(&payload, 100, b"").unwrap();

    let mut tampered = sealed.record_bytes.clone();
    *tampered.last_mut().unwrap() ^= 0x01;
    let err = decrypt_bytes(&tampered, b"", None).unwrap_err();
    assert!(err.is_decryption_failure(), "got {err:?}");
}

#[test]
fn test_header_tampering_fails_decryption() {
    let sealed = encrypt_bytes(b"header integrity", 50, b"").unwrap();

    // Flip a byte inside the stored modulus: solving proceeds over a wrong
    // group and the tag check must catch it.
    let mut tampered = sealed.record_bytes.clone();
    tampered[20] ^= 0xFF;
    let err = decrypt_bytes(&tampered, b"", None).unwrap_err();
    assert!(err.is_decryption_failure(), "got {err:?}");

    // Lowering the work factor solves the wrong puzzle.
    let mut shortened = sealed.record_bytes.clone();
    shortened[4..12].copy_from_slice(&1u64.to_le_bytes());
    let err = decrypt_bytes(&shortened, b"", None).unwrap_err();
    assert!(err.is_decryption_failure(), "got {err:?}");
}

#[test]
fn test_salt_tampering_fails_password_decryption() {
    let sealed = encrypt_bytes(b"salted", 100, b"pw").unwrap();
    let salt_at = 4 + 8 + 256 + 256 + 1;
    let mut tampered = sealed.record_bytes.clone();
    tampered[salt_at] ^= 0x01;
    let err = decrypt_bytes(&tampered, b"pw", None).unwrap_err();
    assert!(err.is_decryption_failure(), "got {err:?}");
}

#[test]
fn test_large_binary_payload_roundtrip() {
    let mut payload = vec![0u8; 1 << 20];
    ChaCha8Rng::seed_from_u64(0xC0FFEE).fill_bytes(&mut payload);

    let sealed = encrypt_bytes(&payload, 1000, b"large_file_password").unwrap();
    assert_eq!(sealed.plaintext_size, 1 << 20);
    assert_eq!(
        sealed.ciphertext_size,
        HEADER_BYTES + 8 + (1 << 20) + 12 + 16
    );

    let opened = decrypt_bytes(&sealed.record_bytes, b"large_file_password", None).unwrap();
    assert_eq!(opened.plaintext, payload);
}

#[test]
fn test_two_encryptions_share_nothing_visible() {
    let a = encrypt_bytes(b"same plaintext", 10, b"").unwrap();
    let b = encrypt_bytes(b"same plaintext", 10, b"").unwrap();
    // Fresh modulus, fresh base, fresh nonce: the containers differ apart
    // from their fixed scalar prefix.
    assert_ne!(a.record_bytes, b.record_bytes);

    let meta_a = inspect(&a.record_bytes).unwrap();
    let meta_b = inspect(&b.record_bytes).unwrap();
    assert_eq!(meta_a.work_factor, meta_b.work_factor);
    assert_eq!(meta_a.modulus_bits, 2048);
    assert_eq!(meta_b.modulus_bits, 2048);
}

#[test]
fn test_legacy_container_inspects_but_refuses_decryption() {
    // Version-1 layout: wrapped-key fields where v2 keeps salt and kdf data.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u32.to_le_bytes());
    bytes.extend_from_slice(&9000u64.to_le_bytes());
    bytes.extend_from_slice(&[0x55; 256]);
    bytes.extend_from_slice(&[0x66; 256]);
    bytes.push(0);
    bytes.extend_from_slice(&[0x00; 48 + 12]);
    bytes.extend_from_slice(&4u64.to_le_bytes());
    bytes.extend_from_slice(&[1, 2, 3, 4]);

    let meta = inspect(&bytes).unwrap();
    assert_eq!(meta.version, 1);
    assert_eq!(meta.work_factor, 9000);

    let err = decrypt_bytes(&bytes, b"", None).unwrap_err();
    assert!(matches!(err, OpsError::LegacyRecord));
}

#[test]
fn test_inspect_reports_password_binding() {
    let sealed = encrypt_bytes(b"visible metadata", 123, b"pw").unwrap();
    let meta = inspect(&sealed.record_bytes).unwrap();
    assert!(meta.key_required);
    assert_ne!(meta.salt, [0u8; 16]);
    assert_eq!(meta.work_factor, 123);
    assert_eq!(meta.data_size, 16 + 12 + 16);
    assert!(meta.estimated_time(500_000.0).as_secs_f64() > 0.0);
    assert_eq!(meta.security_level(), "High (RSA-2048+)");
}
