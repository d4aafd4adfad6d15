//! Numericle - CLI
//!
//! Daily number-sequence guessing game with TUI and line modes.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use numericle::{
    commands::{
        describe_rule, list_rules, print_distribution, print_rule_detail, print_rules_listing,
        run_distribution, run_simple,
    },
    config::GameConfig,
    game::{Engine, LocalProfile, SessionKey},
    logging,
    output::formatters::format_sequence,
    puzzle::{DailySelector, PuzzleId},
    rules::Registry,
};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "numericle",
    about = "Guess the daily number sequence in ten tries",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON config file overriding sequence length, limits and filter
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Where to keep progress and statistics between runs
    #[arg(short = 'f', long, global = true)]
    state_file: Option<PathBuf>,

    /// Player name used for the saved session
    #[arg(short, long, global = true, default_value = "local")]
    player: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive TUI mode (default)
    Play,

    /// Simple CLI mode (line-based game without TUI)
    Simple,

    /// Show today's puzzle id and rule pool size
    Today {
        /// Also print the answer
        #[arg(long)]
        reveal: bool,
    },

    /// How to play
    HowTo,

    /// List every rule in the catalog
    Rules,

    /// Describe one rule by name
    Describe {
        /// Rule name, e.g. fibonacci
        name: String,
    },

    /// Replay daily selection over many days and report pool coverage
    Distribution {
        /// Number of consecutive days to sample
        #[arg(short = 'n', long, default_value = "365")]
        days: usize,

        /// First day, YYYY-MM-DD (default: today)
        #[arg(short, long)]
        start: Option<NaiveDate>,

        /// Select from the whole catalog instead of the playable pool
        #[arg(short, long)]
        unfiltered: bool,
    },
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display())),
        None => Ok(GameConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Default to Play mode if no command given
    let command = cli.command.unwrap_or(Commands::Play);

    // The TUI owns the terminal, so logs are opt-in there
    if matches!(command, Commands::Play) {
        logging::init_quiet();
    } else {
        logging::init();
    }

    let config = load_config(cli.config.as_deref())?;
    let registry = Registry::builtin()?;

    match command {
        Commands::Play => {
            let selector = DailySelector::new(&registry, config.filter, config.sequence_length)?;
            run_play_command(selector, &config, &cli.player, cli.state_file.as_deref())
        }
        Commands::Simple => {
            let selector = DailySelector::new(&registry, config.filter, config.sequence_length)?;
            run_simple_command(selector, &config, &cli.player, cli.state_file.as_deref())
        }
        Commands::Today { reveal } => {
            let selector = DailySelector::new(&registry, config.filter, config.sequence_length)?;
            run_today_command(&selector, reveal)
        }
        Commands::HowTo => {
            println!("{}", numericle::game::rules_text(config.sequence_length, config.limits()));
            Ok(())
        }
        Commands::Rules => {
            let selector = DailySelector::new(&registry, config.filter, config.sequence_length)?;
            print_rules_listing(&list_rules(&selector));
            Ok(())
        }
        Commands::Describe { name } => {
            let selector = DailySelector::new(&registry, config.filter, config.sequence_length)?;
            let entry = describe_rule(&selector, &name)?;
            print_rule_detail(&entry);
            Ok(())
        }
        Commands::Distribution {
            days,
            start,
            unfiltered,
        } => {
            let selector = if unfiltered {
                DailySelector::unfiltered(&registry, config.filter, config.sequence_length)?
            } else {
                DailySelector::new(&registry, config.filter, config.sequence_length)?
            };
            run_distribution_command(&selector, days, start)
        }
    }
}

fn run_today_command(selector: &DailySelector<'_>, reveal: bool) -> Result<()> {
    let id = PuzzleId::today(selector.registry().version())?;
    let puzzle = selector.daily_puzzle(&id)?;

    println!("Puzzle:    {id}");
    println!("Length:    {}", puzzle.len());
    println!("Pool size: {}", selector.pool().len());
    if reveal {
        println!("Answer:    {}", format_sequence(puzzle.sequence()));
        println!("Rule:      {}", selector.rule_description(puzzle.rule_name()));
    }
    Ok(())
}

fn run_distribution_command(
    selector: &DailySelector<'_>,
    days: usize,
    start: Option<NaiveDate>,
) -> Result<()> {
    let version = selector.registry().version();
    let start = match start {
        Some(date) => PuzzleId::new(date, version)?,
        None => PuzzleId::today(version)?,
    };

    println!("🎯 Sampling {days} days from {start}...");
    let result = run_distribution(selector, &start, days, true);
    print_distribution(&result, selector);
    Ok(())
}

fn run_simple_command(
    selector: DailySelector<'_>,
    config: &GameConfig,
    player: &str,
    state_file: Option<&Path>,
) -> Result<()> {
    let engine = Engine::new(selector, config.limits());
    let mut profile = LocalProfile::load(SessionKey::new(player, "cli"), state_file)?;
    let stdin = io::stdin();
    run_simple(&engine, &mut profile, stdin.lock(), &mut io::stdout())
}

fn run_play_command(
    selector: DailySelector<'_>,
    config: &GameConfig,
    player: &str,
    state_file: Option<&Path>,
) -> Result<()> {
    use numericle::interactive::{App, run_tui};

    let engine = Engine::new(selector, config.limits());
    let profile = LocalProfile::load(SessionKey::new(player, "tui"), state_file)?;
    let app = App::new(&engine, profile)?;
    run_tui(app)
}
