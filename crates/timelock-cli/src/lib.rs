//! Operations layer consumed by the `timelock` binary: byte-level
//! encrypt/decrypt/inspect/benchmark plus the small file conventions
//! (key-input grammar, output naming) the CLI contract promises.

mod benchmark;
mod decrypt;
mod encrypt;
mod error;
mod files;
mod inspect;
mod keyinput;

pub use benchmark::{
    BenchmarkReport, BenchmarkSample, REFERENCE_WORK_FACTORS, TimeEstimate, estimate_time,
    run_benchmark,
};
pub use decrypt::{DecryptOutcome, decrypt_bytes};
pub use encrypt::{EncryptOutcome, encrypt_bytes};
pub use error::OpsError;
pub use files::{LOCKED_SUFFIX, infer_output_path, read_input, write_output};
pub use inspect::{Metadata, inspect};
pub use keyinput::parse_key_input;
