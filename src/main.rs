//! Barricade - Entry Point
//!
//! Console driver for the tactics simulation. The player commands the
//! Rioters; the Police phase is played by the AI as soon as the Rioters end
//! their turn.

use barricade::core::config::RulesConfig;
use barricade::core::error::TacticsResult;
use barricade::core::types::UnitId;
use barricade::tactics::{
    combat_log_lines, AbilityKind, Faction, GamePhase, Position, Scenario, SimulationState,
    TacticsEvent, TargetingMode,
};

use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> TacticsResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("barricade=info")),
        )
        .init();

    tracing::info!("Barricade starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => console_rules(RulesConfig::load(path)?),
        None => console_rules(RulesConfig::default()),
    };
    let seed = rand::random();
    let mut state = SimulationState::from_scenario(&Scenario::standard(), config, seed)?;
    let mut shown = state.events().len();

    println!("\n=== BARRICADE ===");
    println!("Rioters versus riot police. You lead the Rioters.");
    print_help();

    loop {
        print_status(&state);

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let words: Vec<&str> = input.split_whitespace().collect();
        let Some((&verb, rest)) = words.split_first() else {
            continue;
        };

        match verb {
            "quit" | "q" => break,
            "help" | "h" | "?" => print_help(),
            "units" | "u" => print_units(&state),
            "map" | "m" => print_map(&state),
            "log" | "l" => {
                for line in combat_log_lines(state.events()) {
                    println!("  {}", line);
                }
            }
            "info" | "i" => match parse_id(rest) {
                Some(id) => print_info(&state, id),
                None => println!("Usage: info <unit>"),
            },
            "move" => match (parse_id(rest), parse_pos(rest.get(1..))) {
                (Some(id), Some(to)) => report(state.move_unit(id, to)),
                _ => println!("Usage: move <unit> <x> <y>"),
            },
            "attack" | "a" => match (parse_id(rest), parse_pos(rest.get(1..))) {
                (Some(id), Some(target)) => report(state.attack(id, target)),
                _ => println!("Usage: attack <unit> <x> <y>"),
            },
            "ability" | "ab" => match parse_id(rest) {
                Some(id) => cast(&mut state, id, parse_pos(rest.get(1..))),
                None => println!("Usage: ability <unit> [x y]"),
            },
            "target" | "t" => match (parse_id(rest), rest.get(1).copied()) {
                (Some(id), Some("attack")) => {
                    report(state.begin_targeting(id, TargetingMode::Attack).map(|_| Vec::new()))
                }
                (Some(id), Some("molotov")) => report(
                    state
                        .begin_targeting(id, TargetingMode::Ability(AbilityKind::Molotov))
                        .map(|_| Vec::new()),
                ),
                _ => println!("Usage: target <unit> attack|molotov"),
            },
            "confirm" | "c" => match parse_pos(Some(rest)) {
                Some(target) => report(state.confirm_target(target)),
                None => println!("Usage: confirm <x> <y>"),
            },
            "cancel" => state.cancel_targeting(),
            "end" | "e" => end_rioter_turn(&mut state),
            _ => println!("Unknown command. Type 'help' for the list."),
        }

        let lines = combat_log_lines(state.events());
        for line in lines.iter().skip(shown) {
            println!("  {}", line);
        }
        shown = lines.len();
    }

    println!(
        "\nGoodbye! Turn {}, {} rioters and {} police standing.",
        state.turn_number(),
        state.living_count(Faction::Rioter),
        state.living_count(Faction::Police)
    );
    Ok(())
}

/// The console player only drives the Rioters, whatever the rules file says
fn console_rules(mut config: RulesConfig) -> RulesConfig {
    config.auto_ai_phase = true;
    config
}

/// End the Rioter phase, let the AI play the Police, then hand control back
fn end_rioter_turn(state: &mut SimulationState) {
    report(state.end_turn());
    if state.phase() == GamePhase::PoliceTurn {
        report(state.end_turn());
    }
}

fn print_help() {
    println!();
    println!("Commands:");
    println!("  units / u               - List living units");
    println!("  map / m                 - Draw the street");
    println!("  info <unit>             - Show a unit's stats and ability");
    println!("  move <unit> <x> <y>     - Move (1 AP)");
    println!("  attack <unit> <x> <y>   - Attack a tile (1 AP)");
    println!("  ability <unit> [x y]    - Use the unit's ability (1 AP)");
    println!("  target <unit> attack|molotov, confirm <x> <y>, cancel");
    println!("  end / e                 - End the Rioter turn; the Police act");
    println!("  log / l                 - Full combat log");
    println!("  quit / q                - Exit");
    println!();
}

fn print_status(state: &SimulationState) {
    match state.phase() {
        GamePhase::GameOver(result) => println!("\n[Game over: {}]", result),
        _ => println!(
            "\n[Turn {} - {} to act - {} rioters, {} police]",
            state.turn_number(),
            state.current_faction(),
            state.living_count(Faction::Rioter),
            state.living_count(Faction::Police)
        ),
    }
    if let Some(pending) = state.targeting() {
        println!("Targeting with unit {}: {:?}", pending.unit_id, pending.mode);
    }
}

fn print_units(state: &SimulationState) {
    for unit in state.list_units(None) {
        println!(
            "  {:>4} {:<14} {:<8} HP {:>3}/{:<3} AP {} at {}",
            unit.id().to_string(),
            unit.name(),
            unit.faction().to_string(),
            unit.hp(),
            unit.max_hp(),
            unit.ap(),
            unit.position()
        );
    }
}

fn print_info(state: &SimulationState, id: UnitId) {
    let Some(unit) = state.unit(id) else {
        println!("No unit {}", id);
        return;
    };
    println!(
        "  {} ({}) dmg {} range {} move {}",
        unit.name(),
        unit.faction(),
        unit.damage(),
        unit.range(),
        unit.move_range()
    );
    println!("  {}", unit.archetype().help_text());
    let attackable = state.valid_attack_positions(id);
    if !attackable.is_empty() {
        let cells: Vec<String> = attackable.iter().map(|p| p.to_string()).collect();
        println!("  Can attack: {}", cells.join(" "));
    }
}

/// Terrain glyphs, with rioters as `R` and police as `P`
fn print_map(state: &SimulationState) {
    let map = state.map();
    print!("   ");
    for x in 0..map.width {
        print!("{}", x % 10);
    }
    println!();
    for y in 0..map.height {
        print!("{:>2} ", y);
        for x in 0..map.width {
            let pos = Position::new(x, y);
            let glyph = match state.unit_at(pos) {
                Some(unit) if unit.faction() == Faction::Rioter => 'R',
                Some(_) => 'P',
                None => map.kind_at(pos).map(|k| k.glyph()).unwrap_or(' '),
            };
            print!("{}", glyph);
        }
        println!();
    }
}

fn cast(state: &mut SimulationState, id: UnitId, target: Option<Position>) {
    let Some(kind) = state.unit(id).and_then(|u| u.ability()) else {
        println!("That unit has no ability");
        return;
    };
    report(state.cast_ability(id, kind, target));
}

/// Rejections are shown here; applied events come from the log
fn report(result: TacticsResult<Vec<TacticsEvent>>) {
    if let Err(e) = result {
        println!("Rejected: {}", e);
    }
}

fn parse_id(words: &[&str]) -> Option<UnitId> {
    let raw = words.first()?.trim_start_matches('#');
    raw.parse().ok().map(UnitId)
}

fn parse_pos(words: Option<&[&str]>) -> Option<Position> {
    let words = words?;
    let x = words.first()?.parse().ok()?;
    let y = words.get(1)?.parse().ok()?;
    Some(Position::new(x, y))
}
