use std::time::{Duration, Instant};

use rug::Integer;
use timelock_crypto::{Puzzle, square_mod};

use crate::OpsError;

/// Work factors the report translates into wall-clock estimates; roughly one
/// second, one minute, one hour and one day at a million squarings per
/// second.
pub const REFERENCE_WORK_FACTORS: [u64; 4] = [1_000_000, 60_000_000, 3_600_000_000, 86_400_000_000];

// Squarings between clock reads; keeps Instant::now overhead out of the rate.
const BATCH: u64 = 1_000;

#[derive(Debug, Clone)]
pub struct BenchmarkSample {
    pub operations: u64,
    pub elapsed: Duration,
    pub ops_per_second: f64,
}

#[derive(Debug, Clone)]
pub struct TimeEstimate {
    pub work_factor: u64,
    pub estimated: Duration,
}

#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub samples: Vec<BenchmarkSample>,
    pub total_operations: u64,
    pub total_time: Duration,
    pub avg_ops_per_second: f64,
    pub time_estimates: Vec<TimeEstimate>,
}

/// Measures sequential-squaring throughput against a freshly generated
/// modulus, `samples` times for `duration` each, and derives time estimates
/// for the reference work factors.
pub fn run_benchmark(duration: Duration, samples: usize) -> Result<BenchmarkReport, OpsError> {
    // A real 2048-bit modulus so the numbers match what decryption will see.
    let (puzzle, _) = Puzzle::generate(1, &[])?;

    let mut report_samples = Vec::with_capacity(samples);
    let mut total_operations = 0u64;
    let mut total_time = Duration::ZERO;

    for _ in 0..samples {
        let (operations, elapsed) = sample_squarings(&puzzle.n, duration);
        total_operations += operations;
        total_time += elapsed;
        report_samples.push(BenchmarkSample {
            operations,
            elapsed,
            ops_per_second: operations as f64 / elapsed.as_secs_f64(),
        });
    }

    let avg_ops_per_second = total_operations as f64 / total_time.as_secs_f64();
    let time_estimates = REFERENCE_WORK_FACTORS
        .iter()
        .map(|&work_factor| TimeEstimate {
            work_factor,
            estimated: estimate_time(work_factor, avg_ops_per_second),
        })
        .collect();

    Ok(BenchmarkReport {
        samples: report_samples,
        total_operations,
        total_time,
        avg_ops_per_second,
        time_estimates,
    })
}

/// Wall-clock projection of `operations` squarings at the measured rate.
pub fn estimate_time(operations: u64, ops_per_second: f64) -> Duration {
    if ops_per_second <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(operations as f64 / ops_per_second)
}

fn sample_squarings(modulus: &Integer, duration: Duration) -> (u64, Duration) {
    let mut x = Integer::from(12345u32);
    x %= modulus;

    let start = Instant::now();
    let mut operations = 0u64;
    while start.elapsed() < duration {
        for _ in 0..BATCH {
            square_mod(&mut x, modulus);
        }
        operations += BATCH;
    }
    (operations, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_time_scales_linearly() {
        assert_eq!(
            estimate_time(1_000_000, 500_000.0),
            Duration::from_secs_f64(2.0)
        );
        assert_eq!(estimate_time(42, 0.0), Duration::ZERO);
        assert_eq!(estimate_time(42, -1.0), Duration::ZERO);
    }

    #[test]
    fn test_report_shape() {
        let report = run_benchmark(Duration::from_millis(20), 2).unwrap();
        assert_eq!(report.samples.len(), 2);
        assert_eq!(report.time_estimates.len(), REFERENCE_WORK_FACTORS.len());
        assert!(report.total_operations >= 2 * BATCH);
        assert!(report.avg_ops_per_second > 0.0);
        for sample in &report.samples {
            assert!(sample.operations > 0);
            assert!(sample.ops_per_second > 0.0);
        }
        // Estimates grow with the work factor.
        let estimates: Vec<_> = report.time_estimates.iter().map(|e| e.estimated).collect();
        assert!(estimates.windows(2).all(|w| w[0] < w[1]));
    }
}
