use std::time::Duration;

use rug::Integer;
use rug::integer::Order;
use timelock_codec::decode_record;
use timelock_types::SALT_BYTES;

use crate::OpsError;

/// Everything `check` can tell about a container without solving it.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub version: u32,
    pub work_factor: u64,
    pub modulus_bits: u32,
    pub base_bits: u32,
    pub key_required: bool,
    pub salt: [u8; SALT_BYTES],
    pub data_size: usize,
}

impl Metadata {
    /// Expected solve time at `ops_per_second` sequential squarings.
    pub fn estimated_time(&self, ops_per_second: f64) -> Duration {
        crate::estimate_time(self.work_factor, ops_per_second)
    }

    /// Coarse classification by modulus width.
    pub fn security_level(&self) -> &'static str {
        match self.modulus_bits {
            bits if bits >= 2048 => "High (RSA-2048+)",
            bits if bits >= 1024 => "Medium (RSA-1024+)",
            _ => "Low (RSA-<1024)",
        }
    }
}

/// Parses a container and reports its public parameters.
pub fn inspect(record_bytes: &[u8]) -> Result<Metadata, OpsError> {
    let record = decode_record(record_bytes)?;
    let modulus = Integer::from_digits(&record.modulus_n, Order::MsfBe);
    let base = Integer::from_digits(&record.base_g, Order::MsfBe);

    Ok(Metadata {
        version: record.version,
        work_factor: record.work_factor,
        modulus_bits: modulus.significant_bits(),
        base_bits: base.significant_bits(),
        key_required: record.key_required == 1,
        salt: record.salt,
        data_size: record.data.len(),
    })
}
