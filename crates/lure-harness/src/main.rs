//! Headless scenario runner for Lure.
//!
//! Loads a JSON scenario (prototype catalog, bait placements and an
//! optional cast-and-reel run), steps the simulation at a fixed `dt` with a
//! fixed seed, and reports catches and reel progress through `tracing`.
//!
//! ```text
//! lure-harness --scenario crates/lure-harness/scenarios/basic.json [--verbose]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glam::Vec2;
use serde::Deserialize;
use tracing::{info, Level};

use lure_core::config::PrototypeCatalog;
use lure_core::entity::{ActorComponents, Entity, EntityId, EntityInner, EntityTag, HandsState};
use lure_core::entity::{PropComponents, TransformState};
use lure_core::event::{GameEvent, RequestReelMessage};
use lure_core::joint::TETHER_JOINT_ID;
use lure_core::output::{Event, Output};
use lure_core::simulation::Simulation;

// =============================================================================
// Scenario
// =============================================================================

#[derive(Debug, Deserialize)]
struct Scenario {
    seed: u64,
    dt: f32,
    ticks: u32,
    catalog: PrototypeCatalog,
    #[serde(default)]
    baits: Vec<BaitPlacement>,
    #[serde(default)]
    reel: Option<ReelRun>,
}

#[derive(Debug, Deserialize)]
struct BaitPlacement {
    prototype: String,
    position: Vec2,
}

/// A rod held at the origin by an actor in combat stance, cast into a
/// target and reeled from the first tick.
#[derive(Debug, Deserialize)]
struct ReelRun {
    rod: String,
    #[serde(default)]
    tackle: Vec<String>,
    target: Vec2,
}

struct Args {
    scenario: PathBuf,
    verbose: bool,
}

fn parse_args() -> Result<Args> {
    let mut scenario = None;
    let mut verbose = false;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--scenario" => {
                let path = args.next().context("--scenario needs a path")?;
                scenario = Some(PathBuf::from(path));
            }
            "--verbose" | "-v" => verbose = true,
            other => bail!("unknown argument `{other}`"),
        }
    }
    Ok(Args {
        scenario: scenario.context("missing --scenario <path>")?,
        verbose,
    })
}

fn load(path: &Path) -> Result<Scenario> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    scenario.catalog.validate().context("validating catalog")?;
    if !(scenario.dt.is_finite() && scenario.dt > 0.0) {
        bail!("dt must be positive, got {}", scenario.dt);
    }
    Ok(scenario)
}

// =============================================================================
// Setup
// =============================================================================

fn place_baits(sim: &mut Simulation, scenario: &Scenario) -> Result<Vec<EntityId>> {
    scenario
        .baits
        .iter()
        .map(|placement| -> Result<EntityId> {
            let prototype = scenario.catalog.bait(&placement.prototype)?;
            let bait = prototype.instantiate(TransformState::adrift(placement.position));
            Ok(sim.arena_mut().spawn(EntityTag::Bait, EntityInner::Bait(bait)))
        })
        .collect()
}

fn cast(sim: &mut Simulation, catalog: &PrototypeCatalog, run: &ReelRun) -> Result<EntityId> {
    let rod_prototype = catalog.rod(&run.rod)?;
    let hook_prototype = catalog.hook(&rod_prototype.hook)?;
    let arena = sim.arena_mut();

    let mut components = rod_prototype.instantiate(TransformState::adrift(Vec2::new(0.0, -0.5)));
    for name in &run.tackle {
        let item = catalog.tackle(name)?.instantiate(name);
        components
            .tackle
            .push(arena.spawn(EntityTag::Item, EntityInner::Item(item)));
    }
    let rod = arena.spawn(EntityTag::Rod, EntityInner::Rod(components));
    let hook = arena.spawn(
        EntityTag::Projectile,
        EntityInner::Projectile(hook_prototype.instantiate(TransformState::default())),
    );
    let target = arena.spawn(
        EntityTag::Prop,
        EntityInner::Prop(PropComponents {
            prototype: "Target".to_string(),
            transform: TransformState::adrift(run.target),
            ..PropComponents::default()
        }),
    );
    let actor = arena.spawn(
        EntityTag::Actor,
        EntityInner::Actor(ActorComponents {
            hands: HandsState {
                active_item: Some(rod),
            },
            combat_mode: true,
            ..ActorComponents::default()
        }),
    );
    arena.set_relay(rod, Some(actor));

    sim.dispatch(GameEvent::ShotFired {
        rod,
        user: Some(actor),
        ammo: vec![hook],
    });
    sim.dispatch(GameEvent::ProjectileEmbedded {
        projectile: hook,
        weapon: rod,
        embedded: target,
    });
    sim.dispatch(GameEvent::ReelRequest {
        sender: actor,
        message: RequestReelMessage { reeling: true },
    });

    let damage = sim
        .arena()
        .get(hook)
        .and_then(Entity::as_projectile)
        .and_then(|p| p.damage.clone())
        .unwrap_or_default();
    info!(rod = %rod, hook = %hook, target = %target, ?damage, "line cast");
    Ok(rod)
}

// =============================================================================
// Run
// =============================================================================

fn main() -> Result<()> {
    let args = parse_args()?;
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    let scenario = load(&args.scenario)?;
    let mut sim = Simulation::new(scenario.seed);
    let baits = place_baits(&mut sim, &scenario)?;
    let rod = scenario
        .reel
        .as_ref()
        .map(|run| cast(&mut sim, &scenario.catalog, run))
        .transpose()?;
    info!(
        seed = scenario.seed,
        dt = scenario.dt,
        ticks = scenario.ticks,
        baits = baits.len(),
        "scenario loaded"
    );

    let mut catches: BTreeMap<String, u32> = BTreeMap::new();
    let mut reeled_in_at = None;
    for _ in 0..scenario.ticks {
        sim.step(scenario.dt);
        for envelope in sim.take_effects() {
            match envelope.output() {
                Output::Event(Event::CatchLanded { prototype, .. }) => {
                    *catches.entry(prototype.clone()).or_default() += 1;
                }
                Output::Event(Event::ReelingChanged { reeling: false, .. }) => {
                    reeled_in_at.get_or_insert(envelope.tick());
                }
                _ => {}
            }
        }
    }

    for (prototype, count) in &catches {
        info!(%prototype, count, "catches");
    }
    for bait in &baits {
        let remaining = sim
            .arena()
            .get(*bait)
            .and_then(Entity::as_bait)
            .map_or(0, |b| b.stack.count);
        info!(bait = %bait, remaining, "bait left");
    }
    if let Some(rod) = rod {
        let line = sim
            .arena_mut()
            .distance_joint_mut(rod, TETHER_JOINT_ID)
            .map(|joint| (joint.min_length, joint.max_length));
        match line {
            Some((min_length, max_length)) => {
                info!(rod = %rod, min_length, max_length, ?reeled_in_at, "reel finished");
            }
            None => info!(rod = %rod, "line lost"),
        }
    }
    info!(tick = sim.tick(), "done");
    Ok(())
}
