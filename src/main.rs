//! Skirmish - Entry Point
//!
//! Runs a single battle with an autopilot standing in for the players and
//! prints how it ended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use skirmish::combat::{Choice, Dice, Party};
use skirmish::data::{ActionId, BattleConfig, MemberTemplate};
use skirmish::game::{Battle, BattlePhase, LogObserver, ManualClock};

/// Simulated seconds per tick
const TICK_SECS: f32 = 0.5;
/// Give up after this many ticks
const MAX_TICKS: u32 = 100_000;
/// Chance a player leaves their choice open for the timer
const HESITATE_CHANCE: f64 = 0.1;
/// Chance per round that someone asks to join each side
const JOIN_CHANCE: f64 = 0.15;

/// Run one autopiloted battle and print how it ended
#[derive(Parser, Debug)]
#[command(name = "skirmish", version)]
#[command(about = "Run one autopiloted two-party battle")]
struct Args {
    /// Battle config file (RON); searched for when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Every hit lands and every pick takes the first option
    #[arg(long)]
    deterministic: bool,

    /// Cap both parties at one combatant
    #[arg(long)]
    minimal: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Write the effective config to this path and exit
    #[arg(long, value_name = "PATH")]
    export_config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Skirmish v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => BattleConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => BattleConfig::discover(),
    };
    if args.minimal {
        config.friendly_capacity = 1;
        config.hostile_capacity = 1;
    }

    if let Some(path) = &args.export_config {
        config
            .export(path)
            .with_context(|| format!("failed to export config to {}", path.display()))?;
        log::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    let friendly = first_template(&config.friendly_templates, "friendly")?;
    let hostile = first_template(&config.hostile_templates, "hostile")?;

    let dice = if args.deterministic {
        Dice::deterministic()
    } else {
        match args.seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::from_entropy(),
        }
    };
    let mut pilot = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None if args.deterministic => StdRng::seed_from_u64(0),
        None => StdRng::from_entropy(),
    };

    let clock = ManualClock::new();
    let mut battle = Battle::new(config, &[friendly], &[hostile], dice, clock.clone())
        .with_observer(Box::new(LogObserver));

    battle.start();
    let mut planned_round = 0;
    for _ in 0..MAX_TICKS {
        if battle.is_over() {
            break;
        }
        if battle.round() != planned_round {
            planned_round = battle.round();
            autopilot(&mut battle, &mut pilot);
            continue;
        }
        clock.advance_secs(TICK_SECS);
        battle.tick();
    }

    let snapshot = battle.snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        for line in snapshot.status_lines() {
            println!("{}", line);
        }
        match snapshot.outcome {
            Some(outcome) => println!("Outcome: {:?} after {} rounds", outcome, snapshot.round),
            None => println!("No winner after {} rounds", snapshot.round),
        }
    }

    log::info!("Skirmish shut down cleanly");
    Ok(())
}

fn first_template(templates: &[MemberTemplate], side: &str) -> Result<MemberTemplate> {
    templates
        .first()
        .cloned()
        .with_context(|| format!("config has no {} templates", side))
}

/// Make choices for one selection phase
fn autopilot(battle: &mut Battle<ManualClock>, pilot: &mut StdRng) {
    let round = battle.round();

    for party in [Party::Friendly, Party::Hostile] {
        if pilot.gen_bool(JOIN_CHANCE) {
            let templates = match party {
                Party::Friendly => &battle.config().friendly_templates,
                Party::Hostile => &battle.config().hostile_templates,
            };
            let template = templates.get(pilot.gen_range(0..templates.len().max(1))).cloned();
            if let Some(template) = template {
                battle.request_join(party, &template);
            }
        }
    }

    let members = battle.roster(Party::Friendly).active_len();
    let actions = battle.config().friendly_actions.len();
    for index in 0..members {
        if battle.round() != round || battle.phase() != BattlePhase::Selecting {
            return;
        }
        if pilot.gen_bool(HESITATE_CHANCE) {
            continue;
        }

        let pick = pilot.gen_range(0..=actions);
        let choice = if pick == actions {
            Choice::Pass
        } else {
            Choice::Use(ActionId(pick))
        };
        battle.select_action(index, choice);

        let awaiting = battle
            .selection(index)
            .map_or(false, |s| s.target.is_none() && s.needs_target(battle.config()));
        let targets = battle.roster(Party::Hostile).active_len();
        if battle.round() == round && awaiting && targets > 0 {
            battle.select_target(index, pilot.gen_range(0..targets));
        }
    }
}
