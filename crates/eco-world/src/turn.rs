//! Per-creature turn steps and the records that reverse them.
//!
//! A creature runs its species' turn list in order and stops at the first
//! step whose outcome ends the turn. Every step hands back a [`TurnRecord`]
//! holding exactly what it changed, so the step can be undone later.

use crate::pathfinding::PathStrategy;
use crate::world::World;
use eco_core::{EntityId, EntityKind, Error, Point, Result};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// One step of a creature's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    /// Lose `power` hp; die at zero
    Starve { power: i32 },
    /// Walk toward the closest visible target, or wander
    Move { strategy: PathStrategy },
    /// Hit an adjacent live herbivore
    Attack,
    /// Consume adjacent food
    Eat,
}

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// No further steps run for this creature this tick
    pub ends_turn: bool,
    pub record: TurnRecord,
}

impl TurnOutcome {
    fn new(ends_turn: bool, record: TurnRecord) -> Self {
        Self { ends_turn, record }
    }
}

/// What a step changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnRecord {
    Starve {
        creature: EntityId,
        power: i32,
        point: Point,
    },
    Move {
        creature: EntityId,
        from: Point,
    },
    Attack {
        attacker: EntityId,
        /// Victim and damage dealt, when a hit landed
        hit: Option<(EntityId, i32)>,
    },
    Eat {
        eater: EntityId,
        prior_hp: i32,
        eaten: Option<(EntityId, Point)>,
    },
}

impl Turn {
    pub fn execute(
        &self,
        creature: EntityId,
        world: &mut World,
        rng: &mut ChaCha8Rng,
    ) -> Result<TurnOutcome> {
        match self {
            Turn::Starve { power } => starve(*power, creature, world),
            Turn::Move { strategy } => move_creature(strategy, creature, world, rng),
            Turn::Attack => attack(creature, world),
            Turn::Eat => eat(creature, world),
        }
    }
}

impl TurnRecord {
    /// The creature whose turn produced this record
    pub fn creature(&self) -> EntityId {
        match self {
            TurnRecord::Starve { creature, .. } | TurnRecord::Move { creature, .. } => *creature,
            TurnRecord::Attack { attacker, .. } => *attacker,
            TurnRecord::Eat { eater, .. } => *eater,
        }
    }

    pub fn undo(&self, world: &mut World) -> Result<()> {
        match *self {
            TurnRecord::Starve {
                creature,
                power,
                point,
            } => {
                let stats = world.creature_mut(creature)?;
                stats.hp += power;
                if stats.hp > 0 && !world.is_placed(creature) {
                    world.add(point, creature)?;
                }
            }
            TurnRecord::Move { creature, from } => {
                world.add(from, creature)?;
            }
            TurnRecord::Attack { hit, .. } => {
                if let Some((victim, damage)) = hit {
                    world.creature_mut(victim)?.hp += damage;
                }
            }
            TurnRecord::Eat {
                eater,
                prior_hp,
                eaten,
            } => {
                if let Some((food, point)) = eaten {
                    world.add(point, food)?;
                }
                world.creature_mut(eater)?.hp = prior_hp;
            }
        }
        Ok(())
    }
}

fn starve(power: i32, id: EntityId, world: &mut World) -> Result<TurnOutcome> {
    let point = world.get_position(id)?;
    let creature = world.creature_mut(id)?;
    creature.hp -= power;
    let dead = creature.hp <= 0;

    if dead {
        world.remove(id)?;
        debug!(entity = %id, x = point.x, y = point.y, "Creature starved");
    }

    Ok(TurnOutcome::new(
        dead,
        TurnRecord::Starve {
            creature: id,
            power,
            point,
        },
    ))
}

fn move_creature(
    strategy: &PathStrategy,
    id: EntityId,
    world: &mut World,
    rng: &mut ChaCha8Rng,
) -> Result<TurnOutcome> {
    let from = world.get_position(id)?;
    let record = TurnRecord::Move { creature: id, from };

    let entity = world.entity(id)?;
    let target_kind = entity.target_kind();
    let (speed, visual_radius) = {
        let creature = world.creature(id)?;
        (creature.speed, creature.visual_radius)
    };

    let target = target_kind
        .and_then(|kind| closest_target(from, &world.get_entities(kind), visual_radius));
    let goal = match target.or_else(|| wander_goal(from, speed, world, rng)) {
        Some(goal) => goal,
        None => {
            trace!(entity = %id, "No free cell to wander to");
            return Ok(TurnOutcome::new(false, record));
        }
    };

    let path = match strategy.find_path(from, goal, world) {
        Ok(path) => path,
        Err(e) if e.is_recoverable() => {
            trace!(entity = %id, goal = %goal, error = %e, "No path, staying in place");
            return Ok(TurnOutcome::new(false, record));
        }
        Err(e) => return Err(e),
    };

    let speed = speed.max(0) as usize;
    if path.len() <= speed {
        let arrival = path.last().copied().unwrap_or(from);
        world.add(arrival, id)?;
        Ok(TurnOutcome::new(false, record))
    } else {
        world.add(path[speed], id)?;
        Ok(TurnOutcome::new(true, record))
    }
}

fn attack(id: EntityId, world: &mut World) -> Result<TurnOutcome> {
    let point = world.get_position(id)?;
    let power = world
        .entity(id)?
        .power()
        .ok_or_else(|| Error::InvalidState(format!("Entity {} cannot attack", id)))?;

    let miss = TurnOutcome::new(
        false,
        TurnRecord::Attack {
            attacker: id,
            hit: None,
        },
    );

    let Some((_, victim)) = first_adjacent(point, &world.get_entities(EntityKind::Herbivore))
    else {
        return Ok(miss);
    };

    let stats = world.creature_mut(victim)?;
    if stats.hp <= 0 {
        return Ok(miss);
    }
    stats.hp -= power;
    if stats.hp <= 0 {
        debug!(attacker = %id, victim = %victim, "Herbivore killed");
    }

    Ok(TurnOutcome::new(
        true,
        TurnRecord::Attack {
            attacker: id,
            hit: Some((victim, power)),
        },
    ))
}

fn eat(id: EntityId, world: &mut World) -> Result<TurnOutcome> {
    let point = world.get_position(id)?;
    let target_kind = world
        .entity(id)?
        .target_kind()
        .ok_or_else(|| Error::InvalidState(format!("Entity {} has no food", id)))?;
    let prior_hp = world.creature(id)?.hp;

    let mut record = TurnRecord::Eat {
        eater: id,
        prior_hp,
        eaten: None,
    };

    let Some((food_point, food)) = first_adjacent(point, &world.get_entities(target_kind))
    else {
        return Ok(TurnOutcome::new(false, record));
    };

    let food_entity = world.entity(food)?;
    if !food_entity.can_be_eaten() {
        return Ok(TurnOutcome::new(false, record));
    }
    let nutrition = food_entity.nutritional_quality().unwrap_or(0);

    world.creature_mut(id)?.heal(nutrition);
    world.remove(food)?;

    if let TurnRecord::Eat { eaten, .. } = &mut record {
        *eaten = Some((food, food_point));
    }
    Ok(TurnOutcome::new(true, record))
}

/// Closest candidate by Manhattan distance, strictly inside `max_distance`.
/// The first candidate wins ties.
fn closest_target(from: Point, candidates: &[(Point, EntityId)], max_distance: i32) -> Option<Point> {
    let mut best = max_distance;
    let mut result = None;
    for (point, _) in candidates {
        let distance = from.manhattan_distance(point);
        if distance < best {
            best = distance;
            result = Some(*point);
        }
    }
    result
}

/// Random free point on the step rays within `radius`
fn wander_goal(from: Point, radius: i32, world: &World, rng: &mut ChaCha8Rng) -> Option<Point> {
    let candidates: Vec<Point> = from
        .rays(radius)
        .into_iter()
        .filter(|point| world.is_free(*point))
        .collect();
    candidates.choose(rng).copied()
}

fn first_adjacent(from: Point, candidates: &[(Point, EntityId)]) -> Option<(Point, EntityId)> {
    candidates
        .iter()
        .find(|(point, _)| from.is_adjacent(point))
        .copied()
}
