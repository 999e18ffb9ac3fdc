use std::thread;

use timelock_cli::{decrypt_bytes, encrypt_bytes};

// Independent encrypt/decrypt pairs share nothing but the process CSPRNG;
// running them in parallel must be uneventful.
#[test]
fn test_parallel_roundtrips() {
    let handles: Vec<_> = (0..4u8)
        .map(|worker| {
            thread::spawn(move || {
                let payload = vec![worker; 256 + worker as usize];
                let key: &[u8] = if worker % 2 == 0 { b"" } else { b"worker key" };

                let sealed = encrypt_bytes(&payload, 500, key).unwrap();
                let opened = decrypt_bytes(&sealed.record_bytes, key, None).unwrap();
                assert_eq!(opened.plaintext, payload);
                assert_eq!(opened.work_factor, 500);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker panicked");
    }
}
