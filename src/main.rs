use anyhow::{anyhow, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Instant;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ton_wallet_generator::cli::{check_count, parse_count};
use ton_wallet_generator::{
    normalize_count, Args, BatchError, BatchEvent, BatchFormat, BatchGenerator, FsStore, Network, SystemClock,
};

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    // Configure thread pool
    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    // Validate count
    let requested = check_count(match args.count {
        Some(count) => count,
        None => prompt_count()?,
    })?;
    let count = normalize_count(requested);
    if requested < 1 {
        warn!(requested, "wallet count below 1, generating a single wallet");
    }

    let network = if args.testnet { Network::Testnet } else { Network::Mainnet };
    let format = BatchFormat::from(args.format);

    println!("\n⚡ TON Wallet Generator");
    println!("Wallet version: {}", args.wallet_version);
    println!("Workchain: {}", args.workchain);
    println!("Network: {:?}", network);
    println!("Threads: {}", num_threads);
    println!("Output: {}", args.output_dir.display());
    println!("\nGenerating {} wallets...", count);

    let start_time = Instant::now();

    // Setup progress bar
    let pb = ProgressBar::new(count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) | {msg}")?
            .progress_chars("#>-"),
    );

    let generator = BatchGenerator::new(FsStore::new(&args.output_dir), SystemClock)
        .workchain(args.workchain)
        .network(network)
        .format(format);

    let result = generator.generate_with_progress(requested, args.wallet_version, |event| match event {
        BatchEvent::WalletDerived { .. } => pb.inc(1),
        BatchEvent::Persisted { path, count } => {
            info!(path = %path.display(), count, "batch written");
        }
    });

    match result {
        Ok(persisted) => {
            pb.finish_with_message("Generation complete!");
            let elapsed = start_time.elapsed();

            println!("\n✅ Report:");
            println!("────────────────────");
            println!("📊 Wallets generated: {}", persisted.batch.len());
            println!("⏱️  Total time: {:.2}s", elapsed.as_secs_f64());
            println!("🚀 Generation rate: {:.2} wallets/sec", persisted.batch.len() as f64 / elapsed.as_secs_f64());
            println!("📁 Saved to: {}", persisted.path.display());
            Ok(())
        }
        Err(BatchError::Persistence { file_name, batch, source }) => {
            pb.abandon_with_message("Write failed");
            error!(%file_name, %source, "could not save batch, printing wallets instead");

            // The file is gone but the keys are not: hand them to the user.
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for record in batch.records() {
                writeln!(out, "{}", record)?;
            }
            out.flush()?;

            Err(anyhow!("failed to save wallets to {}: {}", file_name, source))
        }
        Err(e) => {
            pb.abandon();
            Err(e.into())
        }
    }
}

fn prompt_count() -> Result<i64> {
    print!("How many wallets do you want to generate? ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(parse_count(&input))
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
