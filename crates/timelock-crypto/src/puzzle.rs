// Rivest-Shamir-Wagner trapdoor time-lock puzzle generation.
//
// The encryptor generates a fresh RSA modulus, keeps φ(N) just long enough to
// reduce the exponent 2^T modulo it, and computes the solution instantly.
// Anyone without the factorization has to run the T sequential squarings in
// `solver`.

use rand::RngCore;
use rand::rngs::OsRng;
use rug::integer::{IsPrime, Order};
use rug::{Assign, Integer};
use timelock_types::{Argon2Params, KdfId, SALT_BYTES};

use crate::CryptoError;
use crate::password;

/// Default RSA modulus size for freshly generated puzzles.
pub const DEFAULT_MODULUS_BITS: u32 = 2048;

const MILLER_RABIN_ROUNDS: u32 = 30;

// Prime density near 2^512 is about 1/355; this bound makes exhaustion a
// statistical impossibility rather than a hang.
const MAX_PRIME_CANDIDATES: u32 = 50_000;

/// Public parameters of a time-lock puzzle.
///
/// Immutable after construction and free of trapdoor material: `p`, `q` and
/// φ(N) only ever exist inside [`Puzzle::generate_with_bits`]. The solution
/// `target = g^(2^T) mod N` travels separately so a puzzle reconstructed from
/// a container (which has no solution yet) is the same type.
#[derive(Debug, Clone)]
pub struct Puzzle {
    /// RSA modulus N = p·q.
    pub n: Integer,
    /// Base in [2, N-2], coprime with N.
    pub g: Integer,
    /// Number of sequential squarings demanded of a solver.
    pub t: u64,
    /// All-zero unless the base is password-bound.
    pub salt: [u8; SALT_BYTES],
    pub kdf_id: KdfId,
    pub kdf_params: Argon2Params,
}

impl Puzzle {
    /// Generates a puzzle over a fresh [`DEFAULT_MODULUS_BITS`]-bit modulus.
    ///
    /// With an empty `password` the base is random (`kdf_id = None`);
    /// otherwise it is derived from the passphrase and a fresh salt, which
    /// couples every passphrase guess to a full T-squaring solve.
    ///
    /// Returns the puzzle together with its solution.
    pub fn generate(t: u64, password: &[u8]) -> Result<(Puzzle, Integer), CryptoError> {
        Self::generate_with_bits(DEFAULT_MODULUS_BITS, t, password)
    }

    pub fn generate_with_bits(
        bits: u32,
        t: u64,
        password: &[u8],
    ) -> Result<(Puzzle, Integer), CryptoError> {
        if bits < 1024 {
            return Err(CryptoError::ModulusTooSmall { bits });
        }

        let mut p = random_prime(bits - bits / 2)?;
        let mut q = random_prime(bits / 2)?;
        while q == p {
            q = random_prime(bits / 2)?;
        }
        let n = Integer::from(&p * &q);

        // φ(N) = (p-1)(q-1), local to this function.
        let mut p_minus = Integer::from(&p - 1u32);
        let mut q_minus = Integer::from(&q - 1u32);
        let mut phi = Integer::from(&p_minus * &q_minus);

        let (g, salt, kdf_id, kdf_params) = if password.is_empty() {
            (
                random_coprime(&n)?,
                [0u8; SALT_BYTES],
                KdfId::None,
                Argon2Params::zero(),
            )
        } else {
            let mut salt = [0u8; SALT_BYTES];
            OsRng
                .try_fill_bytes(&mut salt)
                .map_err(|e| CryptoError::RngFailed(e.to_string()))?;
            let kdf_params = Argon2Params::default();
            let g = password::derive_base(password, &salt, &kdf_params, &n)?;
            (g, salt, KdfId::Argon2id, kdf_params)
        };

        // e = 2^T mod φ(N); reducing the exponent is the trapdoor shortcut.
        let mut e = match Integer::from(2u32).pow_mod(&Integer::from(t), &phi) {
            Ok(e) => e,
            Err(_) => return Err(CryptoError::KeyGenFailed("exponent reduction failed".into())),
        };
        let target = match g.clone().pow_mod(&e, &n) {
            Ok(target) => target,
            Err(_) => {
                return Err(CryptoError::KeyGenFailed(
                    "target exponentiation failed".into(),
                ));
            }
        };

        // Wipe everything derived from the factorization before returning.
        phi.assign(0u32);
        e.assign(0u32);
        p.assign(0u32);
        q.assign(0u32);
        p_minus.assign(0u32);
        q_minus.assign(0u32);

        Ok((
            Puzzle {
                n,
                g,
                t,
                salt,
                kdf_id,
                kdf_params,
            },
            target,
        ))
    }
}

/// Draws a uniform integer in [2, N-2] and retries until it is coprime with
/// N. For an honest RSA modulus a non-coprime draw has probability around
/// 2^-1023, so the loop all but always exits on the first pass.
pub fn random_coprime(n: &Integer) -> Result<Integer, CryptoError> {
    // 32 surplus bytes push the modular-reduction bias below 2^-256.
    let len = (n.significant_bits() as usize).div_ceil(8) + 32;
    let mut buf = vec![0u8; len];
    let span = Integer::from(n - 3u32);

    loop {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| CryptoError::RngFailed(e.to_string()))?;
        let raw = Integer::from_digits(&buf, Order::MsfBe);
        let mut g = Integer::from(&raw % &span);
        g += 2u32;
        if coprime(&g, n) {
            return Ok(g);
        }
    }
}

pub(crate) fn coprime(a: &Integer, n: &Integer) -> bool {
    a.clone().gcd(n) == 1u32
}

// Fresh random candidates with the two top bits and the low bit forced, so
// the product of two primes keeps the full requested width and candidates are
// odd. Miller-Rabin with 30 rounds, bounded attempts.
fn random_prime(bits: u32) -> Result<Integer, CryptoError> {
    let len = (bits as usize).div_ceil(8);
    let mut buf = vec![0u8; len];

    for _ in 0..MAX_PRIME_CANDIDATES {
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|e| CryptoError::RngFailed(e.to_string()))?;
        let mut candidate = Integer::from_digits(&buf, Order::MsfBe);
        candidate.keep_bits_mut(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(bits - 2, true);
        candidate.set_bit(0, true);

        if candidate.is_probably_prime(MILLER_RABIN_ROUNDS) != IsPrime::No {
            return Ok(candidate);
        }
    }

    Err(CryptoError::KeyGenFailed(format!(
        "no prime found within {MAX_PRIME_CANDIDATES} candidates"
    )))
}
