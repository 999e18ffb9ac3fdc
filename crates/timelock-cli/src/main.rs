//! # timelock - RSA time-lock puzzle encryption tool
//!
//! Encrypts a file so that decrypting it requires a prescribed number of
//! strictly sequential modular squarings; optionally binds a passphrase into
//! the puzzle so every wrong guess costs a full re-solve.
//!
//! ```text
//! timelock encrypt --input document.pdf --work 81000000
//! timelock decrypt --input document.pdf.locked
//! timelock check   --input document.pdf.locked
//! timelock benchmark
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use timelock_cli::{
    decrypt_bytes, encrypt_bytes, infer_output_path, inspect, parse_key_input, read_input,
    run_benchmark, write_output,
};

/// Assumed squaring rate for the rough estimate printed by `check`; run
/// `benchmark` for a number that reflects the local machine.
const ASSUMED_OPS_PER_SECOND: f64 = 500_000.0;

#[derive(Parser, Debug)]
#[command(name = "timelock")]
#[command(author, version, about = "RSA time-lock puzzle encryption tool", long_about = None)]
struct Cli {
    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "TIMELOCK_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a file behind a time-lock puzzle
    Encrypt {
        /// File to encrypt
        #[arg(long)]
        input: PathBuf,

        /// Number of sequential squarings required to decrypt
        #[arg(long)]
        work: u64,

        /// Optional passphrase, or @file:<path> for a key file
        #[arg(long, default_value = "")]
        key: String,
    },

    /// Decrypt a time-locked file
    Decrypt {
        /// Encrypted file to decrypt
        #[arg(long)]
        input: PathBuf,

        /// Passphrase or @file:<path>, required for password-bound files
        #[arg(long, default_value = "")]
        key: String,

        /// Output path (default: strips .locked or appends .decrypted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Inspect an encrypted file and print its metadata
    Check {
        #[arg(long)]
        input: PathBuf,
    },

    /// Measure sequential squaring throughput on this machine
    Benchmark {
        /// Seconds per sample
        #[arg(long, default_value_t = 3)]
        duration: u64,

        /// Number of samples
        #[arg(long, default_value_t = 3)]
        samples: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Command::Encrypt { input, work, key } => encrypt_command(input, work, &key),
        Command::Decrypt { input, key, output } => decrypt_command(input, &key, output),
        Command::Check { input } => check_command(input),
        Command::Benchmark { duration, samples } => benchmark_command(duration, samples),
    }
}

fn encrypt_command(input: PathBuf, work: u64, key: &str) -> Result<()> {
    if work == 0 {
        bail!("--work must be greater than zero");
    }

    let key_bytes = parse_key_input(key)?;
    let plaintext =
        read_input(&input).with_context(|| format!("cannot read {}", input.display()))?;

    println!(
        "Generating time-lock puzzle (work factor: {work}) and encrypting {} bytes...",
        plaintext.len()
    );
    let outcome = encrypt_bytes(&plaintext, work, &key_bytes)?;

    let output = PathBuf::from(format!("{}{}", input.display(), timelock_cli::LOCKED_SUFFIX));
    write_output(&output, &outcome.record_bytes)
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!("Encryption complete.");
    println!("  input:       {} ({} bytes)", input.display(), outcome.plaintext_size);
    println!("  output:      {} ({} bytes)", output.display(), outcome.ciphertext_size);
    println!("  work factor: {} sequential squarings", outcome.work_factor);
    println!(
        "  key:         {}",
        if outcome.key_required {
            "required (puzzle + passphrase)"
        } else {
            "not required (puzzle only)"
        }
    );
    Ok(())
}

fn decrypt_command(input: PathBuf, key: &str, output: Option<PathBuf>) -> Result<()> {
    let key_bytes = parse_key_input(key)?;
    let record_bytes =
        read_input(&input).with_context(|| format!("cannot read {}", input.display()))?;

    let meta = inspect(&record_bytes)?;
    println!(
        "Solving time-lock puzzle ({} sequential squarings)...",
        meta.work_factor
    );

    let bar = ProgressBar::new(meta.work_factor);
    bar.set_style(
        ProgressStyle::with_template("[{bar:50}] {percent}% ({pos}/{len}) elapsed {elapsed} eta {eta}")
            .expect("static progress template")
            .progress_chars("=> "),
    );
    let mut update = |done: u64| bar.set_position(done);
    let outcome = decrypt_bytes(&record_bytes, &key_bytes, Some(&mut update))?;
    bar.finish();

    let output = output.unwrap_or_else(|| infer_output_path(&input));
    write_output(&output, &outcome.plaintext)
        .with_context(|| format!("cannot write {}", output.display()))?;

    println!("Decryption complete.");
    println!("  output:      {} ({} bytes)", output.display(), outcome.plaintext_size);
    println!("  work factor: {} sequential squarings", outcome.work_factor);
    Ok(())
}

fn check_command(input: PathBuf) -> Result<()> {
    let record_bytes =
        read_input(&input).with_context(|| format!("cannot read {}", input.display()))?;
    let meta = inspect(&record_bytes)?;

    let salt_hex: String = meta.salt.iter().map(|b| format!("{b:02x}")).collect();
    println!("{}:", input.display());
    println!("  version:        {}", meta.version);
    println!("  work factor:    {} sequential squarings", meta.work_factor);
    println!("  modulus:        {} bits", meta.modulus_bits);
    println!("  base:           {} bits", meta.base_bits);
    println!("  key required:   {}", if meta.key_required { "yes" } else { "no" });
    println!("  salt:           {salt_hex}");
    println!("  payload:        {} bytes", meta.data_size);
    println!("  file size:      {} bytes", record_bytes.len());
    println!("  security level: {}", meta.security_level());
    println!(
        "  est. solve:     {} (at {} ops/s; run `timelock benchmark` to calibrate)",
        format_duration(meta.estimated_time(ASSUMED_OPS_PER_SECOND)),
        ASSUMED_OPS_PER_SECOND as u64,
    );
    Ok(())
}

fn benchmark_command(duration_secs: u64, samples: usize) -> Result<()> {
    if samples == 0 {
        bail!("--samples must be greater than zero");
    }

    println!("Benchmarking sequential squaring ({samples} samples x {duration_secs}s)...");
    let report = run_benchmark(Duration::from_secs(duration_secs), samples)?;

    for (index, sample) in report.samples.iter().enumerate() {
        println!(
            "  sample {}: {} squarings in {} ({:.0} ops/s)",
            index + 1,
            sample.operations,
            format_duration(sample.elapsed),
            sample.ops_per_second,
        );
    }
    println!("Average: {:.0} squarings/second", report.avg_ops_per_second);
    println!("Work factor estimates at this rate:");
    for estimate in &report.time_estimates {
        println!(
            "  --work {:>12} ≈ {}",
            estimate.work_factor,
            format_duration(estimate.estimated)
        );
    }
    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else if secs < 3600.0 {
        format!("{:.1}m", secs / 60.0)
    } else if secs < 86400.0 {
        format!("{:.1}h", secs / 3600.0)
    } else {
        format!("{:.1}d", secs / 86400.0)
    }
}
