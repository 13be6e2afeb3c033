//! Randomized-LLC cache simulator CLI.
//!
//! This binary drives the simulator in two modes:
//! 1. **Attack:** Mount a Prime+Probe eviction-set attack against the
//!    randomized LLC and verify the discovered set.
//! 2. **Trace:** Replay a recorded address trace through the hierarchy
//!    and report per-level hit statistics.

use clap::{Parser, Subcommand};
use std::process;

use ceaser_core::attack;
use ceaser_core::common::addr::{LINE_ADDR_BITS, LINE_OFFSET_BITS};
use ceaser_core::sim::trace;
use ceaser_core::{Controller, PhysAddr};

#[derive(Parser, Debug)]
#[command(
    name = "ceasim",
    author,
    version,
    about = "Randomized-LLC cache hierarchy simulator",
    long_about = "Simulate an inclusive L1D/L2D/LLC hierarchy whose last level uses an \
encrypted index, and mount a Prime+Probe eviction-set attack against it.\n\nExamples:\n  \
ceasim attack\n  ceasim attack --seed 3 --target-line 42\n  ceasim trace -f workload.trace"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover and verify an eviction set for a target line.
    Attack {
        /// Seed for candidate address generation.
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Target line address (the word-granularity address is line << 6).
        #[arg(long, default_value_t = 0)]
        target_line: u64,
    },

    /// Replay an address trace and print hit statistics.
    Trace {
        /// Trace file: one address per line, hex (0x...) or decimal.
        #[arg(short, long)]
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Attack { seed, target_line }) => cmd_attack(seed, target_line),
        Some(Commands::Trace { file }) => cmd_trace(&file),
        None => {
            eprintln!("ceasim — pass a subcommand");
            eprintln!();
            eprintln!("  ceasim attack [--seed N] [--target-line N]   Prime+Probe attack");
            eprintln!("  ceasim trace -f <file>                       Replay an address trace");
            eprintln!();
            eprintln!("  ceasim --help  for full options");
            process::exit(1);
        }
    }
}

/// Runs the eviction-set attack: discovery, report, then verification.
///
/// Exits with code 0 when the discovered set demonstrably evicts the
/// target (and itself, in series), 1 otherwise.
fn cmd_attack(seed: u64, target_line: u64) {
    if target_line >> LINE_ADDR_BITS != 0 {
        eprintln!("Error: target line {:#x} exceeds 40 bits", target_line);
        process::exit(1);
    }

    let mut ctrl = Controller::new();
    let target = PhysAddr::new(target_line << LINE_OFFSET_BITS);

    println!("[*] Target line {:#x} (address {:#x})", target_line, target.val());
    let set = attack::discover(&mut ctrl, target, seed);

    println!("[*] Eviction set: {} addresses", set.members.len());
    for addr in &set.members {
        println!("    {:#014x}", addr.val());
    }

    if attack::verify(&mut ctrl, &set) {
        println!("[*] Verification passed: target and set evict each other");
        println!();
        ctrl.stats.print();
    } else {
        eprintln!("[!] Verification failed: target survived the eviction set");
        process::exit(1);
    }
}

/// Replays a trace file through a fresh hierarchy and prints statistics.
fn cmd_trace(file: &str) {
    let addrs = trace::load_trace(file).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: {}", e);
        process::exit(1);
    });

    if let Some(bad) = addrs.iter().find(|a| !a.is_valid()) {
        eprintln!(
            "[!] FATAL: trace address {:#x} exceeds the 46-bit physical space",
            bad.val()
        );
        process::exit(1);
    }

    let mut ctrl = Controller::new();
    for &addr in &addrs {
        ctrl.access(addr);
    }

    println!("[*] Replayed {} accesses from {}", addrs.len(), file);
    println!();
    ctrl.stats.print();
}
