use anyhow::{bail, Context, Result};
use clap::Parser;
use engine::{
    Game, GameConfig, GameEvent, Party, Prompt, RandomSource, SeededRandom, SystemRandom, Verdict,
};
use fairdice_cli::{init_tracing, load_config, render_menu, render_table};
use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

#[derive(Parser)]
#[command(name = "fairdice")]
#[command(about = "Provably fair non-transitive dice game")]
#[command(after_help = "Examples:
  fairdice 2,2,4,4,9,9 1,1,6,6,8,8 3,3,5,5,7,7
  fairdice --rounds 3 -- -1,5 0,0,3 2")]
struct Cli {
    /// Dice as comma-separated faces, at least three. Put dice whose
    /// first face is negative after `--`.
    dice: Vec<String>,

    /// JSON or YAML game config (dice, rounds, seed)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay from a fixed seed instead of OS entropy (not fair for real play)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds to play on the same dice
    #[arg(long)]
    rounds: Option<u32>,

    /// Write every protocol event as JSON to this file
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

enum RoundEnd {
    Finished,
    Interrupted,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cfg = load_config(cli.config.as_deref(), &cli.dice, cli.seed, cli.rounds)?;
    let mut transcript = Vec::new();
    let played = match cfg.seed {
        Some(seed) => {
            tracing::warn!(seed, "seeded randomness: commitments are predictable");
            play(&cfg, SeededRandom::from_seed(seed), &mut transcript)
        }
        None => play(&cfg, SystemRandom, &mut transcript),
    };

    if let Some(path) = &cli.transcript {
        let json = serde_json::to_string_pretty(&transcript)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    played
}

fn play<R: RandomSource>(
    cfg: &GameConfig,
    rng: R,
    transcript: &mut Vec<GameEvent>,
) -> Result<()> {
    let mut game = Game::new(cfg.dice.clone(), rng)?;
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "Welcome to the Dice Game!")?;
    writeln!(out)?;
    write!(out, "{}", render_table(game.table()))?;

    for round in 1..=cfg.rounds {
        if cfg.rounds > 1 {
            writeln!(out, "\n=== Round {} of {} ===", round, cfg.rounds)?;
        }
        match play_round(&mut game, &mut input, &mut out, transcript)? {
            RoundEnd::Finished => game.reset(),
            RoundEnd::Interrupted => {
                writeln!(out, "\nGame interrupted by user.")?;
                break;
            }
        }
    }
    Ok(())
}

fn play_round<R: RandomSource>(
    game: &mut Game<R>,
    input: &mut impl BufRead,
    out: &mut impl Write,
    transcript: &mut Vec<GameEvent>,
) -> Result<RoundEnd> {
    writeln!(out, "\nLet's determine who will select their die first.")?;
    let events = game.start()?;
    render(&events, out)?;
    transcript.extend(events);

    loop {
        match game.prompt() {
            Prompt::Finished => return Ok(RoundEnd::Finished),
            Prompt::Start => bail!("round ended before it was finished"),
            Prompt::Guess => {
                writeln!(out, "Guess the number: 0 or 1")?;
                write!(out, "Your guess: ")?;
            }
            Prompt::ChooseDie { .. } => {
                writeln!(out, "Choose your dice:")?;
                write!(out, "{}", render_menu(game.state().available_dice()))?;
                write!(out, "Your selection: ")?;
            }
            Prompt::Contribution { party, modulus } => {
                writeln!(out, "Add your number modulo {}.", modulus)?;
                if let Some(die) = game.state().die_of(party) {
                    for (i, face) in die.faces().iter().enumerate() {
                        writeln!(out, "{} - {}", i, face)?;
                    }
                }
                write!(out, "Your selection: ")?;
            }
        }
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(RoundEnd::Interrupted);
        }
        match game.submit(&line) {
            Ok(events) => {
                render(&events, out)?;
                transcript.extend(events);
            }
            Err(e) if e.is_recoverable() => {
                writeln!(out, "Invalid input: {}. Please try again.", e)?;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

fn throw_label(party: Party) -> &'static str {
    match party {
        Party::Player => "Your throw",
        Party::Computer => "Computer's throw",
    }
}

fn render(events: &[GameEvent], out: &mut impl Write) -> Result<()> {
    for event in events {
        match event {
            GameEvent::FirstMoveCommitted { digest } => {
                writeln!(out, "I selected a random number (HMAC={}).", digest)?;
            }
            GameEvent::FirstMoveRevealed { outcome } => {
                writeln!(
                    out,
                    "My number is {} (KEY={}).",
                    outcome.reveal.value, outcome.reveal.key
                )?;
                render_check(outcome.reveal.verify(), out)?;
                if outcome.counterpart_first {
                    writeln!(out, "You will select your die first.")?;
                } else {
                    writeln!(out, "Computer will select its die first.")?;
                }
            }
            GameEvent::DieChosen { party, die } => match party {
                Party::Player => writeln!(out, "You selected: {}", die)?,
                Party::Computer => writeln!(out, "Computer selected: {}", die)?,
            },
            GameEvent::ThrowCommitted {
                party,
                digest,
                modulus,
            } => {
                writeln!(
                    out,
                    "\n{}: I selected a random value in the range 0..{} (HMAC={}).",
                    throw_label(*party),
                    modulus - 1,
                    digest
                )?;
            }
            GameEvent::ThrowResolved { party, outcome } => {
                writeln!(
                    out,
                    "My number is {} (KEY={}).",
                    outcome.engine_value,
                    outcome.key()
                )?;
                render_check(outcome.reveal.verify(), out)?;
                writeln!(
                    out,
                    "The result is {} + {} = {} (mod {}).",
                    outcome.contribution, outcome.engine_value, outcome.index, outcome.modulus
                )?;
                writeln!(out, "{} result: {}", throw_label(*party), outcome.face)?;
            }
            GameEvent::Finished { summary } => {
                writeln!(out, "\nYour score: {}", summary.player_score)?;
                writeln!(out, "Computer's score: {}", summary.computer_score)?;
                match summary.verdict {
                    Verdict::PlayerWins => writeln!(out, "Congratulations, you win!")?,
                    Verdict::ComputerWins => writeln!(out, "Sorry, the computer wins.")?,
                    Verdict::Tie => writeln!(out, "It's a tie!")?,
                }
            }
        }
    }
    Ok(())
}

fn render_check(ok: bool, out: &mut impl Write) -> Result<()> {
    if ok {
        writeln!(out, "Check: HMAC-SHA256(KEY, number) matches the HMAC above.")?;
    } else {
        writeln!(out, "Check FAILED: revealed number and KEY do not match the HMAC.")?;
    }
    Ok(())
}
