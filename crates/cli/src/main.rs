use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use skyduel_shared::*;
use skyduel_sim::controllers::{EvaderController, RandomController};
use skyduel_sim::{run_battle, CancelToken, DoNothingController, NullReporter, TurnReporter, UnitController};

#[derive(Parser)]
#[command(name = "skyduel", about = "Turn-based air combat simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a battle between two controllers
    Run {
        /// Controller for team 1 (random, evader, do_nothing)
        #[arg(long, default_value = "random")]
        team1: String,

        /// Controller for team 2 (random, evader, do_nothing)
        #[arg(long, default_value = "random")]
        team2: String,

        /// Attribute profile JSON for team 1 (defaults to the balanced loadout)
        #[arg(long)]
        profile1: Option<PathBuf>,

        /// Attribute profile JSON for team 2 (defaults to the balanced loadout)
        #[arg(long)]
        profile2: Option<PathBuf>,

        /// Random seed for the battle
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Arena width in cells
        #[arg(long, default_value_t = DEFAULT_SCREEN_WIDTH)]
        width: i32,

        /// Battlefield height in altitude lanes
        #[arg(long, default_value_t = DEFAULT_BATTLEFIELD_HEIGHT)]
        height: i32,

        /// Initial health for team 1
        #[arg(long, default_value_t = DEFAULT_HEALTH)]
        health1: i32,

        /// Initial health for team 2
        #[arg(long, default_value_t = DEFAULT_HEALTH)]
        health2: i32,

        /// Stop the battle and report Cancelled after this many turns
        #[arg(long, default_value_t = 10_000)]
        max_turns: u32,

        /// Pause between rendered turns, in milliseconds
        #[arg(long, default_value_t = 200)]
        delay_ms: u64,

        /// Suppress per-turn rendering
        #[arg(long)]
        quiet: bool,

        /// Output path for the battle report JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run a round-robin tournament between controllers
    Tournament {
        /// Comma-separated list of controller names
        #[arg(long, default_value = "random,evader")]
        controllers: String,

        /// Number of rounds per matchup
        #[arg(long, default_value_t = 10)]
        rounds: u32,

        /// Turn limit per battle
        #[arg(long, default_value_t = 10_000)]
        max_turns: u32,
    },
}

/// Resolve a controller name, seeding its RNG so battles stay reproducible.
fn resolve_controller(name: &str, seed: u64) -> Box<dyn UnitController> {
    match name {
        "random" => Box::new(RandomController::seeded("random", seed)),
        "evader" => Box::new(EvaderController::seeded("evader", seed)),
        "do_nothing" => Box::new(DoNothingController),
        other => {
            eprintln!("Unknown controller '{other}'. Valid options: random, evader, do_nothing.");
            std::process::exit(1);
        }
    }
}

fn load_profile(path: Option<&Path>, fallback_tag: &str) -> AttributeProfile {
    let Some(path) = path else {
        return AttributeProfile::balanced(fallback_tag);
    };
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to read profile {}: {e}", path.display());
            std::process::exit(1);
        }
    };
    match serde_json::from_str(&json) {
        Ok(profile) => profile,
        Err(e) => {
            eprintln!("Failed to parse profile {}: {e}", path.display());
            std::process::exit(1);
        }
    }
}

/// Renders each turn to stdout and paces playback so a human can follow.
struct ConsoleReporter {
    delay: Duration,
}

impl TurnReporter for ConsoleReporter {
    fn report_turn(&mut self, snapshot: &TurnSnapshot) {
        println!("\n=== TURN {} ===", snapshot.turn);
        for row in &snapshot.grid {
            println!("{}", row.concat());
        }
        for event in &snapshot.events {
            println!("{event}");
        }
        let [u1, u2] = &snapshot.units;
        println!("Health {}: {} | Health {}: {}", u1.tag, u1.health, u2.tag, u2.health);
        println!(
            "Positions - {}: ({}, {}) | {}: ({}, {})",
            u1.tag, u1.x, u1.altitude, u2.tag, u2.x, u2.altitude
        );
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            team1,
            team2,
            profile1,
            profile2,
            seed,
            width,
            height,
            health1,
            health2,
            max_turns,
            delay_ms,
            quiet,
            output,
        } => cmd_run(RunArgs {
            team1,
            team2,
            profile1,
            profile2,
            seed,
            width,
            height,
            health1,
            health2,
            max_turns,
            delay_ms,
            quiet,
            output,
        }),

        Commands::Tournament {
            controllers,
            rounds,
            max_turns,
        } => cmd_tournament(&controllers, rounds, max_turns),
    }
}

struct RunArgs {
    team1: String,
    team2: String,
    profile1: Option<PathBuf>,
    profile2: Option<PathBuf>,
    seed: u64,
    width: i32,
    height: i32,
    health1: i32,
    health2: i32,
    max_turns: u32,
    delay_ms: u64,
    quiet: bool,
    output: Option<PathBuf>,
}

fn cmd_run(args: RunArgs) {
    let mut c1 = resolve_controller(&args.team1, args.seed);
    let mut c2 = resolve_controller(&args.team2, args.seed.wrapping_add(1));

    let mut profile1 = load_profile(args.profile1.as_deref(), "T1");
    let mut profile2 = load_profile(args.profile2.as_deref(), "T2");
    if profile1.tag.is_empty() {
        profile1.tag = "T1".into();
    }
    if profile2.tag.is_empty() {
        profile2.tag = "T2".into();
    }

    let config = BattleConfig {
        seed: args.seed,
        screen_width: args.width,
        battlefield_height: args.height,
        team1_start_x: DEFAULT_START_MARGIN,
        team2_start_x: args.width - DEFAULT_START_MARGIN,
        team1_health: args.health1,
        team2_health: args.health2,
        max_turns: Some(args.max_turns),
    };

    println!(
        "Battle: {} vs {} (seed={}, arena {}x{})",
        c1.name(),
        c2.name(),
        args.seed,
        args.width,
        args.height
    );

    let cancel = CancelToken::new();
    let result = if args.quiet {
        run_battle(
            &config,
            [profile1, profile2],
            c1.as_mut(),
            c2.as_mut(),
            &mut NullReporter,
            &cancel,
        )
    } else {
        let mut reporter = ConsoleReporter {
            delay: Duration::from_millis(args.delay_ms),
        };
        run_battle(
            &config,
            [profile1, profile2],
            c1.as_mut(),
            c2.as_mut(),
            &mut reporter,
            &cancel,
        )
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Battle failed: {e}");
            std::process::exit(1);
        }
    };

    println!();
    println!("=== Battle Result ===");
    match report.outcome {
        BattleOutcome::Team1Won => println!("*** Team 1 won! ***"),
        BattleOutcome::Team2Won => println!("*** Team 2 won! ***"),
        BattleOutcome::Cancelled => println!("*** Battle cancelled ***"),
    }
    println!("Final turn: {}", report.final_turn);
    println!(
        "  Team 1: health={}, shots={}, hits={}",
        report.stats.team1_health, report.stats.team1_shots, report.stats.team1_hits
    );
    println!(
        "  Team 2: health={}, shots={}, hits={}",
        report.stats.team2_health, report.stats.team2_shots, report.stats.team2_hits
    );

    if let Some(path) = args.output {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => match std::fs::write(&path, json) {
                Ok(()) => println!("\nReport written to {}", path.display()),
                Err(e) => eprintln!("\nFailed to write report: {e}"),
            },
            Err(e) => eprintln!("\nFailed to serialize report: {e}"),
        }
    }
}

fn cmd_tournament(controllers_str: &str, rounds: u32, max_turns: u32) {
    let names: Vec<&str> = controllers_str.split(',').map(|s| s.trim()).collect();

    if names.len() < 2 {
        eprintln!("Tournament requires at least 2 controllers.");
        std::process::exit(1);
    }

    println!(
        "Tournament: {} controllers, {} rounds per matchup",
        names.len(),
        rounds
    );
    println!("Controllers: {}", names.join(", "));
    println!();

    let mut wins: HashMap<String, u32> = HashMap::new();
    for name in &names {
        wins.insert(name.to_string(), 0);
    }

    for i in 0..names.len() {
        for j in (i + 1)..names.len() {
            let name_a = names[i];
            let name_b = names[j];

            println!("--- {name_a} vs {name_b} ---");

            let mut a_wins = 0u32;
            let mut b_wins = 0u32;
            let mut unfinished = 0u32;

            for round in 0..rounds {
                let seed = round as u64;
                let mut c1 = resolve_controller(name_a, seed);
                let mut c2 = resolve_controller(name_b, seed.wrapping_add(1));

                let config = BattleConfig {
                    seed,
                    max_turns: Some(max_turns),
                    ..Default::default()
                };

                let report = match run_battle(
                    &config,
                    [
                        AttributeProfile::balanced("T1"),
                        AttributeProfile::balanced("T2"),
                    ],
                    c1.as_mut(),
                    c2.as_mut(),
                    &mut NullReporter,
                    &CancelToken::new(),
                ) {
                    Ok(report) => report,
                    Err(e) => {
                        eprintln!("Battle failed: {e}");
                        std::process::exit(1);
                    }
                };

                match report.outcome {
                    BattleOutcome::Team1Won => {
                        a_wins += 1;
                        *wins.get_mut(name_a).unwrap() += 1;
                    }
                    BattleOutcome::Team2Won => {
                        b_wins += 1;
                        *wins.get_mut(name_b).unwrap() += 1;
                    }
                    BattleOutcome::Cancelled => unfinished += 1,
                }
            }

            println!(
                "  Results: {name_a} wins={a_wins}, {name_b} wins={b_wins}, unfinished={unfinished}"
            );
        }
    }

    println!();
    println!("=== Tournament Scoreboard ===");
    println!("{:<20} {:>8}", "Controller", "Wins");
    println!("{:-<20} {:-<8}", "", "");

    let mut sorted: Vec<(&String, &u32)> = wins.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));

    for (name, count) in sorted {
        println!("{name:<20} {count:>8}");
    }
}
