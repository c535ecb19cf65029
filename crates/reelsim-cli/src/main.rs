//! reelsim: slot machine player and RTP simulator
//!
//! Usage:
//!   reelsim spin                 - Flat spins against a balance
//!   reelsim play                 - Payline batch play with console output
//!   reelsim simulate             - Parallel RTP estimate
//!
//! `--config <file>` loads game settings from JSON or YAML (by extension).
//! `RUST_LOG=info` shows simulation progress.

mod export;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use reelsim_core::{
    ConsoleSink, DEFAULT_BALANCE, EntropySource, FlatGame, GameConfig, NullSink, PaylineGame, Session,
    SpinError, SpinSink,
};
use reelsim_sim::{SeedStrategy, SimulationConfig, SimulationResult, Simulator, SpinModel};

use crate::export::SimulationReport;

#[derive(Parser)]
#[command(name = "reelsim", version, about = "Reel slot player and RTP simulator")]
struct Cli {
    /// Game configuration file (.json, .yaml or .yml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// 3 reels, exact combinations
    Flat,
    /// Reels × rows with paylines, wild and bonus
    Lines,
}

#[derive(Subcommand)]
enum Commands {
    /// Flat spins against a session balance
    Spin {
        /// Bet per spin
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Starting balance
        #[arg(long, default_value_t = DEFAULT_BALANCE)]
        balance: f64,
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u64,
        /// Seed for a reproducible stream (OS entropy otherwise)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Payline batch play, printing every spin
    Play {
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        #[arg(short = 'n', long, default_value_t = 10)]
        spins: u64,
        #[arg(long)]
        seed: Option<u64>,
        /// Print only the summary
        #[arg(short, long)]
        quiet: bool,
    },
    /// Estimate RTP by Monte-Carlo simulation
    Simulate {
        #[arg(short, long, value_enum, default_value_t = Mode::Flat)]
        mode: Mode,
        #[arg(short = 'n', long, default_value_t = 1_000_000)]
        spins: u64,
        #[arg(short, long, default_value_t = 1.0)]
        bet: f64,
        /// Worker threads (defaults to the CPU count)
        #[arg(short, long)]
        workers: Option<usize>,
        /// Fixed seed: identical results for any worker count
        #[arg(long)]
        seed: Option<u64>,
        /// Hit table rows to print
        #[arg(long, default_value_t = 20)]
        top: usize,
        /// Points in the exported running RTP series
        #[arg(long, default_value_t = 1000)]
        points: usize,
        /// Payout histogram buckets
        #[arg(long, default_value_t = 50)]
        bins: usize,
        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        /// Write the running RTP series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the hit table as CSV
        #[arg(long)]
        hits_csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Spin {
            bet,
            balance,
            count,
            seed,
        } => run_spin(&config, bet, balance, count, seed),
        Commands::Play {
            bet,
            spins,
            seed,
            quiet,
        } => run_play(&config, bet, spins, seed, quiet),
        Commands::Simulate {
            mode,
            spins,
            bet,
            workers,
            seed,
            top,
            points,
            bins,
            json,
            csv,
            hits_csv,
        } => {
            let mut sim_config = SimulationConfig::default();
            if let Some(workers) = workers {
                sim_config = sim_config.with_workers(workers);
            }
            if let Some(seed) = seed {
                sim_config = sim_config.with_seed(SeedStrategy::Fixed(seed));
            }
            // The series and histogram need the per-spin payouts.
            let retain = json.is_some() || csv.is_some();
            sim_config = sim_config.with_retain_payouts(retain);

            let exports = Exports {
                top,
                points,
                bins,
                json,
                csv,
                hits_csv,
            };
            match mode {
                Mode::Flat => {
                    let game = FlatGame::new(&config.flat).context("Invalid flat configuration")?;
                    run_simulation(&game, sim_config, spins, bet, &exports)
                }
                Mode::Lines => {
                    let game = PaylineGame::new(&config.lines).context("Invalid payline configuration")?;
                    run_simulation(&game, sim_config, spins, bet, &exports)
                }
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => GameConfig::from_yaml_str(&text),
        _ => GameConfig::from_json_str(&text),
    };
    let config = config.with_context(|| format!("Failed to load {}", path.display()))?;
    log::info!("loaded game configuration from {}", path.display());
    Ok(config)
}

fn open_source(seed: Option<u64>) -> Result<EntropySource> {
    match seed {
        Some(seed) => Ok(EntropySource::from_seed(seed)),
        None => EntropySource::from_os().context("Failed to key the entropy source"),
    }
}

fn run_spin(config: &GameConfig, bet: f64, balance: f64, count: u64, seed: Option<u64>) -> Result<()> {
    let game = FlatGame::new(&config.flat).context("Invalid flat configuration")?;
    let mut source = open_source(seed)?;
    let mut session = Session::new(balance)?;

    for i in 1..=count {
        match session.play_flat(&game, &mut source, bet) {
            Ok((next, spin)) => {
                session = next;
                let symbols: Vec<&str> = spin.symbols.iter().map(|&s| game.symbols().name(s)).collect();
                println!(
                    "Spin {}: {} | win {:.2} | balance {:.2}",
                    i,
                    symbols.join(" "),
                    spin.payout,
                    session.balance()
                );
            }
            Err(SpinError::InsufficientBalance { balance, bet }) => {
                println!("Insufficient balance: {balance:.2} left, bet is {bet:.2}");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn run_play(config: &GameConfig, bet: f64, spins: u64, seed: Option<u64>, quiet: bool) -> Result<()> {
    let game = PaylineGame::new(&config.lines).context("Invalid payline configuration")?;
    let mut source = open_source(seed)?;

    let stdout = io::stdout();
    let mut console = ConsoleSink::new(stdout.lock());
    let mut null = NullSink;
    let sink: &mut dyn SpinSink = if quiet { &mut null } else { &mut console };

    let summary = game.play_spins(&mut source, bet, spins, sink)?;
    drop(console);

    let mut out = io::stdout().lock();
    writeln!(out, "Bonus spins: {}", summary.bonus_spins)?;
    writeln!(out, "Total win: {:.2}", summary.total_win)?;
    writeln!(out, "Result after {} spins: {:.2}", summary.spins, summary.net_result)?;
    Ok(())
}

struct Exports {
    top: usize,
    points: usize,
    bins: usize,
    json: Option<PathBuf>,
    csv: Option<PathBuf>,
    hits_csv: Option<PathBuf>,
}

fn run_simulation<M: SpinModel>(
    model: &M,
    config: SimulationConfig,
    spins: u64,
    bet: f64,
    exports: &Exports,
) -> Result<()> {
    let simulator = Simulator::new(model, config)?;
    let result = simulator.estimate_rtp(spins, bet).inspect_err(|e| {
        if let Some(partial) = e.partial() {
            eprintln!(
                "Incomplete run: {} spins, payout {:.2} on stake {:.2}",
                partial.spins,
                partial.total_payout(),
                partial.total_bet()
            );
        }
    })?;

    print_summary(&result, model, exports.top);

    let report = SimulationReport::new(
        &result,
        model.symbols(),
        model.theoretical_rtp(),
        exports.points,
        exports.bins,
    );
    if let Some(path) = &exports.json {
        report.write_json(path)?;
        println!("Report written to {}", path.display());
    }
    if let Some(path) = &exports.csv {
        report.write_rtp_csv(path)?;
        println!("Running RTP written to {}", path.display());
    }
    if let Some(path) = &exports.hits_csv {
        report.write_hits_csv(path)?;
        println!("Hit table written to {}", path.display());
    }
    Ok(())
}

fn print_summary<M: SpinModel>(result: &SimulationResult, model: &M, top: usize) {
    println!("Spins:        {}", result.spins);
    println!("Workers:      {}", result.workers);
    println!("Total bet:    {:.2}", result.total_bet());
    println!("Total payout: {:.2}", result.total_payout());
    println!("RTP:          {:.4}%", result.rtp() * 100.0);
    if let Some(theory) = model.theoretical_rtp() {
        println!("Theoretical:  {:.4}%", theory * 100.0);
    }
    println!("Hit rate:     {:.4}%", result.hit_rate() * 100.0);

    let rows = result.hits.rows(model.symbols());
    if !rows.is_empty() {
        println!();
        println!("{:<24} {:>12}", "Hit", "Count");
        for row in rows.iter().take(top) {
            println!("{:<24} {:>12}", row.label, row.count);
        }
    }
}
