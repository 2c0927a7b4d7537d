// SPDX-License-Identifier: AGPL-3.0-only

//! `tsv` — command-line interface for the stacked-memory TSV repair model.
//!
//! ```text
//! USAGE:
//!   tsv repair [--probability P | --mask BITS] [--seed N]   Repair one population
//!   tsv sweep [--step S] [--start P] [--seed N]             Walk P down to first failure
//!   tsv yield --probability P [--trials N] [--seed N]       Monte-Carlo repair yield
//!   tsv table <BITS>                                        Show one repair-table row
//!   tsv groups --probability P [--seed N]                   Byte-group layout check
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use tsv_chip::bytegroup::BYTE_GROUP_LANES;
use tsv_chip::layout::BLOCK_COUNT;
use tsv_chip::{entry, Shift};
use tsv_repair::{population, repair, RepairError, TsvBlock};

#[derive(Parser)]
#[command(name = "tsv", about = "Stacked-memory TSV repair model CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Build one pin population, repair it, and print the lane map.
    Repair {
        /// Per-pin survival probability for a random population.
        #[arg(long, default_value_t = 1.0, conflicts_with = "mask")]
        probability: f64,
        /// Uniform 6-bit operational mask (e.g. 011110) instead of random.
        #[arg(long)]
        mask: Option<String>,
        /// RNG seed; omit for a fresh population each run.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Lower the survival probability until a repair attempt fails.
    Sweep {
        /// Probability decrement per attempt.
        #[arg(long, default_value_t = 0.01)]
        step: f64,
        /// Starting survival probability.
        #[arg(long, default_value_t = 1.0)]
        start: f64,
        /// RNG seed; omit for a fresh sweep each run.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Estimate repair yield at a fixed survival probability.
    Yield {
        /// Per-pin survival probability.
        #[arg(long)]
        probability: f64,
        /// Repair attempts to run.
        #[arg(long, default_value_t = 1000)]
        trials: u32,
        /// RNG seed; omit for a fresh estimate each run.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the repair-table row for one operational mask.
    Table {
        /// 6-bit operational mask (e.g. 101101 or 0b101101).
        mask: String,
    },
    /// Fill the byte-group layout model and scan it for issues.
    Groups {
        /// Per-lane survival probability.
        #[arg(long)]
        probability: f64,
        /// RNG seed; omit for a fresh fill each run.
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Repair { probability, mask, seed } => cmd_repair(probability, mask.as_deref(), seed),
        Cmd::Sweep { step, start, seed } => cmd_sweep(step, start, seed),
        Cmd::Yield { probability, trials, seed } => cmd_yield(probability, trials, seed),
        Cmd::Table { mask } => cmd_table(&mask),
        Cmd::Groups { probability, seed } => cmd_groups(probability, seed),
    }
}

fn rng_from(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn parse_mask(text: &str) -> Result<u8> {
    let digits = text.strip_prefix("0b").unwrap_or(text);
    let mask = u8::from_str_radix(digits, 2)
        .with_context(|| format!("not a binary mask: {text}"))?;
    if mask > 0x3F {
        bail!("mask {text} is wider than 6 bits");
    }
    Ok(mask)
}

fn report_failure(err: &RepairError, blocks: &[TsvBlock; BLOCK_COUNT]) {
    println!("repair failed: {err}");
    if let Some(block) = err.failing_block() {
        // Show the successor too — a borrow failure is a two-block story.
        if block + 1 < blocks.len() {
            println!("  block {:>2}: {}", block + 1, blocks[block + 1]);
        }
    }
}

fn cmd_repair(probability: f64, mask: Option<&str>, seed: Option<u64>) -> Result<()> {
    let blocks = match mask {
        Some(text) => population::uniform_blocks(parse_mask(text)?),
        None => population::random_blocks(&mut rng_from(seed), probability),
    };

    match repair(&blocks) {
        Ok(map) => {
            println!("{}", map.digest(&blocks));
            let borrowing = (0..BLOCK_COUNT).filter(|&b| map.block_borrows(b)).count();
            let shifted = map.shifts().iter().filter(|&&s| s != Shift::Zero).count();
            println!("repaired: {shifted}/256 lanes shifted, {borrowing} blocks borrowing");
        }
        Err(err) => report_failure(&err, &blocks),
    }
    Ok(())
}

fn cmd_sweep(step: f64, start: f64, seed: Option<u64>) -> Result<()> {
    if step <= 0.0 {
        bail!("--step must be positive");
    }
    let mut rng = rng_from(seed);
    let mut probability = start;

    loop {
        probability -= step;
        if probability < 0.0 {
            println!("swept to zero without a failure");
            return Ok(());
        }

        let blocks = population::random_blocks(&mut rng, probability);
        match repair(&blocks) {
            Ok(_) => println!("p={probability:.3}  repaired"),
            Err(err) => {
                println!("p={probability:.3}  failed");
                println!();
                report_failure(&err, &blocks);
                println!("repair survives down to p={:.3}", probability + step);
                return Ok(());
            }
        }
    }
}

fn cmd_yield(probability: f64, trials: u32, seed: Option<u64>) -> Result<()> {
    let mut rng = rng_from(seed);
    let mut repaired = 0u32;
    let mut intrinsic = 0u32;
    let mut borrow = 0u32;
    let mut chain = 0u32;
    let mut boundary = 0u32;

    for _ in 0..trials {
        let blocks = population::random_blocks(&mut rng, probability);
        match repair(&blocks) {
            Ok(_) => repaired += 1,
            Err(RepairError::IntrinsicBlockFailure { .. }) => intrinsic += 1,
            Err(RepairError::BorrowUnavailable { .. }) => borrow += 1,
            Err(RepairError::ChainBorrowFailure { .. }) => chain += 1,
            Err(RepairError::UnresolvedAtBoundary { .. }) => boundary += 1,
            // A verification failure is a defect in the model, not a yield
            // data point.
            Err(err) => bail!("verifier rejected an emitted map: {err}"),
        }
    }

    println!("p={probability:.3}  {trials} trials");
    println!("  repaired            {:>6}  ({:.1}%)", repaired, percent(repaired, trials));
    println!("  intrinsically bad   {:>6}  ({:.1}%)", intrinsic, percent(intrinsic, trials));
    println!("  borrow unavailable  {:>6}  ({:.1}%)", borrow, percent(borrow, trials));
    println!("  chain borrow failed {:>6}  ({:.1}%)", chain, percent(chain, trials));
    println!("  open at boundary    {:>6}  ({:.1}%)", boundary, percent(boundary, trials));
    Ok(())
}

fn percent(part: u32, whole: u32) -> f64 {
    100.0 * f64::from(part) / f64::from(whole.max(1))
}

fn cmd_table(mask: &str) -> Result<()> {
    let mask = parse_mask(mask)?;
    let row = entry(mask);

    println!("mask {mask:06b}");
    println!("  failed      : {}", row.failed);
    println!("  must borrow : {}", row.must_borrow);
    println!("  can lend    : {}", row.can_lend);
    if !row.failed {
        for (lane, shift) in row.shifts.iter().enumerate() {
            println!("  d{lane} shift    : {} ({:+})", shift, shift.offset());
        }
    }
    Ok(())
}

fn cmd_groups(probability: f64, seed: Option<u64>) -> Result<()> {
    let group = population::random_group(&mut rng_from(seed), probability);

    for (s, sub) in group.sub_groups.iter().enumerate() {
        println!("sub group {s}:");
        for (b, bg) in sub.byte_groups.iter().enumerate() {
            print!("  byte group {b}: ");
            for bit in (0..BYTE_GROUP_LANES).rev() {
                print!(" {}", u8::from(bg.lane_up(bit)));
            }
            println!();
        }
        println!("  spare TSV: {}", u8::from(sub.spare));
    }

    let issues = group.scan_issues();
    if issues.is_empty() {
        println!("no issues");
    } else {
        for issue in issues {
            println!(
                "issue in sub group {}, byte group {}: {} lanes dead",
                issue.sub_group, issue.byte_group, issue.dead_lanes
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_parse_with_and_without_prefix() {
        assert_eq!(parse_mask("011110").unwrap(), 0b011110);
        assert_eq!(parse_mask("0b101101").unwrap(), 0b101101);
        assert!(parse_mask("1000000").is_err());
        assert!(parse_mask("xyz").is_err());
    }
}
