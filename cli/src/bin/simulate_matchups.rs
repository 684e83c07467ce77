use clap::Parser;
use engine::{simulate_matchups, MatchupStats, SeededRandom};
use fairdice_cli::{init_tracing, load_config};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simulate-matchups")]
#[command(about = "Monte Carlo check of the win-probability table")]
struct Args {
    /// Dice as comma-separated faces, at least three. Put dice whose
    /// first face is negative after `--`.
    dice: Vec<String>,

    /// JSON or YAML game config; only `dice` is used
    #[arg(long)]
    config: Option<PathBuf>,

    /// Throws per ordered pair of dice
    #[arg(long, default_value_t = 10_000)]
    trials: u32,

    /// RNG seed for determinism
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[derive(Serialize)]
struct Report {
    trials: u32,
    seed: u64,
    dice: Vec<String>,
    max_deviation: f64,
    matchups: Vec<MatchupStats>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = load_config(args.config.as_deref(), &args.dice, None, None)?;
    let mut rng = SeededRandom::from_seed(args.seed);
    let matchups = simulate_matchups(&cfg.dice, args.trials, &mut rng)?;
    let max_deviation = matchups
        .iter()
        .map(MatchupStats::deviation)
        .fold(0.0, f64::max);

    if args.json {
        let report = Report {
            trials: args.trials,
            seed: args.seed,
            dice: cfg.dice.iter().map(|d| d.to_string()).collect(),
            max_deviation,
            matchups,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("simulate-matchups results");
    println!("-------------------------");
    println!("trials per pair:    {}", args.trials);
    println!("seed:               {}", args.seed);
    for (i, die) in cfg.dice.iter().enumerate() {
        println!("die {}:              {}", i, die);
    }
    println!();
    println!("pair      wins    losses  ties    observed  exact");
    for m in &matchups {
        println!(
            "{} vs {}    {:<7} {:<7} {:<7} {:<9.3} {:.3}",
            m.row,
            m.col,
            m.wins,
            m.losses,
            m.ties,
            m.win_rate(),
            m.exact_win_rate
        );
    }
    println!();
    println!("max deviation:      {:.4}", max_deviation);

    Ok(())
}
