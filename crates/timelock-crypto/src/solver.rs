// Sequential solving: the work the trapdoor lets the encryptor skip.

use rug::Integer;

use crate::puzzle::Puzzle;

// Progress is surfaced roughly once per million squarings so the callback
// overhead stays invisible next to the arithmetic.
const PROGRESS_STEP: u64 = 1 << 20;

impl Puzzle {
    /// Recovers `g^(2^T) mod N` by exactly T squarings.
    ///
    /// Each squaring depends on the previous value, so the chain cannot be
    /// parallelised with known techniques. `t = 0` returns `g` untouched.
    pub fn solve(&self) -> Integer {
        self.solve_with_progress(|_| {})
    }

    /// Like [`Puzzle::solve`] with a progress callback.
    ///
    /// The callback receives the number of completed squarings, strictly
    /// increasing, every 2^20 iterations and once more at `t` exactly. It
    /// runs on the solver's thread; keep it cheap.
    pub fn solve_with_progress<F: FnMut(u64)>(&self, mut progress: F) -> Integer {
        let mut x = self.g.clone();
        for done in 1..=self.t {
            square_mod(&mut x, &self.n);
            if done % PROGRESS_STEP == 0 || done == self.t {
                progress(done);
            }
        }
        x
    }
}

/// One in-place modular squaring, the unit of sequential work. Public so the
/// benchmark loop measures exactly what the solver executes.
#[inline]
pub fn square_mod(value: &mut Integer, modulus: &Integer) {
    value.square_mut();
    *value %= modulus;
}
