use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::contract::WalletVersion;
use crate::generator::BatchFormat;

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    /// `index|address|mnemonic`, one wallet per line
    Lines,
    /// Pretty-printed JSON array of records
    Json,
}

impl From<OutputFormat> for BatchFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Lines => BatchFormat::Lines,
            OutputFormat::Json => BatchFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of wallets to generate (will prompt if not provided)
    #[arg(short, long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Wallet contract version: v3r1, v3r2 or v4r2
    #[arg(short = 'w', long, default_value = "v4r2")]
    pub wallet_version: WalletVersion,

    /// Workchain id
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub workchain: i32,

    /// Mark addresses as test-only
    #[arg(long)]
    pub testnet: bool,

    /// Directory the batch file is written to
    #[arg(short, long, env = "TON_WALLETS_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Format of the batch file
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Lines)]
    pub format: OutputFormat,

    /// Number of parallel threads (0 = auto-detect)
    #[arg(short, long, default_value_t = 0)]
    pub threads: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Largest batch a single run accepts.
pub const MAX_WALLETS: i64 = 1_000_000_000;

/// Refuse counts above [`MAX_WALLETS`]. Counts below 1 pass through; the
/// generator turns them into a single wallet.
pub fn check_count(requested: i64) -> anyhow::Result<i64> {
    if requested > MAX_WALLETS {
        anyhow::bail!(
            "Too many wallets requested. Maximum is {} billion",
            MAX_WALLETS / 1_000_000_000
        );
    }
    Ok(requested)
}

/// Read a count the way an interactive prompt answer is read: leading integer
/// digits are used, anything unparsable counts as 1.
pub fn parse_count(input: &str) -> i64 {
    let trimmed = input.trim();
    let end = trimmed
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || (i == 0 && (c == '-' || c == '+'))))
        .map_or(trimmed.len(), |(i, _)| i);

    trimmed[..end].parse().unwrap_or(1)
}
