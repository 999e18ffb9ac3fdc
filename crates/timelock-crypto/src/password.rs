// Password binding: the puzzle base itself is a deterministic function of
// (passphrase, salt, params, N), so a wrong guess yields a different base and
// forces a fresh full solve. Nothing short of φ(N) shortcuts that.

use argon2::{Algorithm, Argon2, Params, Version};
use rug::integer::Order;
use rug::{Assign, Integer};
use timelock_types::{Argon2Params, SALT_BYTES};
use zeroize::Zeroizing;

use crate::CryptoError;
use crate::puzzle;

/// Derives the puzzle base from a passphrase.
///
/// Argon2id stretches the passphrase to 32 bytes of key material, which is
/// read as a big-endian integer and mapped into [2, N-2]; if the landing spot
/// shares a factor with N the walk continues forward, wrapping to 2 before
/// reaching N-1. Pure function: identical inputs always yield the same base.
pub fn derive_base(
    password: &[u8],
    salt: &[u8; SALT_BYTES],
    params: &Argon2Params,
    n: &Integer,
) -> Result<Integer, CryptoError> {
    let argon_params = Params::new(
        params.memory_kib,
        params.passes,
        Argon2Params::PARALLELISM,
        Some(Argon2Params::OUTPUT_BYTES),
    )
    .map_err(|e| CryptoError::Kdf(e.to_string()))?;
    let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

    let mut material = Zeroizing::new([0u8; Argon2Params::OUTPUT_BYTES]);
    argon
        .hash_password_into(password, salt, &mut *material)
        .map_err(|e| CryptoError::Kdf(e.to_string()))?;

    let k = Integer::from_digits(&*material, Order::MsfBe);

    // g0 = (k mod (N-3)) + 2 lands in [2, N-2].
    let span = Integer::from(n - 3u32);
    let mut g = Integer::from(&k % &span);
    g += 2u32;

    // Expected to exit on the first check for honest RSA moduli.
    let upper = Integer::from(n - 1u32);
    while !puzzle::coprime(&g, n) {
        g += 1u32;
        if g >= upper {
            g.assign(2u32);
        }
    }
    Ok(g)
}
