//! Stock ecosystem wired from a [`SimulationConfig`].

use crate::action::{Action, IntervalAction, Spawn, TurnAction, TurnMap};
use crate::factory;
use crate::pathfinding::PathStrategy;
use crate::simulation::Simulation;
use crate::turn::Turn;
use crate::world::World;
use eco_core::{EntityKind, Result, SimulationConfig};

/// Initial population order
const INIT_ORDER: [EntityKind; 5] = [
    EntityKind::Predator,
    EntityKind::Tree,
    EntityKind::Rock,
    EntityKind::Grass,
    EntityKind::Herbivore,
];

/// Species respawned on a cadence, in per-tick order
const RESPAWN_ORDER: [EntityKind; 3] = [
    EntityKind::Grass,
    EntityKind::Herbivore,
    EntityKind::Predator,
];

/// Predators starve, move, attack, eat; herbivores starve, move, eat.
pub fn turn_map(config: &SimulationConfig) -> TurnMap {
    let starve = Turn::Starve {
        power: config.starve.power,
    };
    let movement = Turn::Move {
        strategy: PathStrategy::from(config.pathfinding),
    };

    let mut map = TurnMap::new();
    map.add(
        EntityKind::Predator,
        [starve, movement, Turn::Attack, Turn::Eat],
    );
    map.add(EntityKind::Herbivore, [starve, movement, Turn::Eat]);
    map
}

pub fn init_actions(config: &SimulationConfig) -> Vec<Action> {
    INIT_ORDER
        .iter()
        .map(|&kind| {
            Spawn::new(
                config.spawn.init.count(kind),
                factory::for_kind(kind, &config.entity),
            )
            .into()
        })
        .collect()
}

/// Creature turns first, then the interval spawns
pub fn turn_actions(config: &SimulationConfig) -> Result<Vec<Action>> {
    let mut actions = vec![TurnAction::new(turn_map(config)).into()];
    for kind in RESPAWN_ORDER {
        if let Some(cadence) = config.spawn.interval.get(kind) {
            let spawn = Spawn::new(cadence.count, factory::for_kind(kind, &config.entity));
            actions.push(IntervalAction::new(cadence.interval, spawn)?.into());
        }
    }
    Ok(actions)
}

/// Validate `config` and build a populated simulation from it
pub fn build(config: &SimulationConfig) -> Result<Simulation> {
    config.validate()?;
    let world = World::new(config.world.width, config.world.height);
    Simulation::new(
        world,
        init_actions(config),
        turn_actions(config)?,
        config.seed,
    )
}
