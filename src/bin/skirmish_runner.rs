//! Headless Skirmish Runner
//!
//! Runs AI vs AI skirmishes on the street map and prints a summary, for
//! tuning personality weights.

use barricade::core::config::RulesConfig;
use barricade::core::error::TacticsResult;
use barricade::tactics::{
    combat_log_lines, load_personality, load_scenario, AiPersonality, Faction, GamePhase,
    GameResult, Scenario, SimulationState,
};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Headless Skirmish Runner - AI vs AI on the street map
#[derive(Parser, Debug)]
#[command(name = "skirmish_runner")]
#[command(about = "Run AI vs AI skirmishes and print a summary")]
struct Args {
    /// Rioter AI personality name (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    rioters: String,

    /// Police AI personality name (loaded from data/ai_personalities/)
    #[arg(long, default_value = "default")]
    police: String,

    /// Scenario name (loaded from data/scenarios/); built-in standard if absent
    #[arg(long)]
    scenario: Option<String>,

    /// Rules config TOML; defaults if absent
    #[arg(long)]
    config: Option<String>,

    /// Maximum turns before calling it undecided
    #[arg(long, default_value_t = 50)]
    max_turns: u32,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,

    /// Print the combat log to stderr as it happens
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output structure
#[derive(Serialize)]
struct SkirmishResult {
    outcome: String,
    turns: u32,
    rioters_remaining: usize,
    police_remaining: usize,
    events: usize,
    rioter_personality: String,
    police_personality: String,
    scenario: String,
    seed: u64,
}

fn main() -> TacticsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("barricade=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);

    let rioter_personality = personality_or_default(&args.rioters);
    let police_personality = personality_or_default(&args.police);

    let scenario = match &args.scenario {
        Some(name) => load_scenario(name)?,
        None => Scenario::standard(),
    };
    let mut config = match &args.config {
        Some(path) => RulesConfig::load(path)?,
        None => RulesConfig::default(),
    };
    // Both phases are driven from here
    config.auto_ai_phase = false;

    let mut state = SimulationState::from_scenario(&scenario, config, seed)?;
    let mut shown = 0;

    while !state.is_game_over() && state.turn_number() <= args.max_turns {
        let personality = match state.current_faction() {
            Faction::Rioter => &rioter_personality,
            Faction::Police => &police_personality,
        };
        state.set_personality(personality.clone());
        state.run_ai_phase()?;
        if !state.is_game_over() {
            state.end_turn()?;
        }

        if args.verbose {
            let lines = combat_log_lines(state.events());
            for line in lines.iter().skip(shown) {
                eprintln!("  {}", line);
            }
            shown = lines.len();
        }
    }

    let outcome = match state.phase() {
        GamePhase::GameOver(GameResult::Victory) => "RioterVictory",
        GamePhase::GameOver(GameResult::Defeat) => "PoliceVictory",
        _ => "Undecided",
    };

    let result = SkirmishResult {
        outcome: outcome.to_string(),
        turns: state.turn_number(),
        rioters_remaining: state.living_count(Faction::Rioter),
        police_remaining: state.living_count(Faction::Police),
        events: state.events().len(),
        rioter_personality: rioter_personality.name,
        police_personality: police_personality.name,
        scenario: scenario.name,
        seed,
    };

    match args.format.as_str() {
        "text" => {
            println!("Skirmish Result");
            println!("===============");
            println!("Outcome: {}", result.outcome);
            println!("Turns: {}", result.turns);
            println!("Rioters remaining: {}", result.rioters_remaining);
            println!("Police remaining: {}", result.police_remaining);
            println!("Events: {}", result.events);
            println!();
            println!(
                "Personalities: {} vs {}",
                result.rioter_personality, result.police_personality
            );
            println!("Scenario: {}", result.scenario);
            println!("Seed: {}", result.seed);
        }
        other => {
            if other != "json" {
                eprintln!("Unknown format '{}', defaulting to json", other);
            }
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn personality_or_default(name: &str) -> AiPersonality {
    load_personality(name).unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load personality '{}': {}", name, e);
        eprintln!("Using default personality");
        AiPersonality::default()
    })
}
