//! Per-tick world actions and the records that reverse them.

use crate::entity::EntityFilter;
use crate::factory::EntityFactory;
use crate::turn::{Turn, TurnRecord};
use crate::world::World;
use eco_core::{EntityId, EntityKind, Error, Point, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Random placement attempts per entity before falling back to the free list
const RANDOM_PLACEMENT_ATTEMPTS: usize = 64;

/// One step of the per-tick update
#[derive(Debug)]
pub enum Action {
    Spawn(Spawn),
    Interval(IntervalAction),
    Turns(TurnAction),
}

/// What an action changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionRecord {
    Spawn { spawned: Vec<EntityId> },
    Interval { fired: Option<Box<ActionRecord>> },
    Turns { executed: Vec<TurnRecord> },
}

impl Action {
    pub fn execute(&mut self, world: &mut World, rng: &mut ChaCha8Rng) -> Result<ActionRecord> {
        match self {
            Action::Spawn(spawn) => spawn.execute(world, rng),
            Action::Interval(interval) => interval.execute(world, rng),
            Action::Turns(turns) => turns.execute(world, rng),
        }
    }

    /// Reverse the effect recorded by the matching `execute`
    pub fn undo(&mut self, record: ActionRecord, world: &mut World) -> Result<()> {
        match (self, record) {
            (Action::Spawn(_), ActionRecord::Spawn { spawned }) => Spawn::undo(&spawned, world),
            (Action::Interval(interval), ActionRecord::Interval { fired }) => {
                interval.undo(fired, world)
            }
            (Action::Turns(_), ActionRecord::Turns { executed }) => {
                TurnAction::undo(&executed, world)
            }
            (action, record) => Err(Error::InvalidState(format!(
                "Record {:?} does not belong to {:?}",
                record, action
            ))),
        }
    }
}

impl From<Spawn> for Action {
    fn from(spawn: Spawn) -> Self {
        Action::Spawn(spawn)
    }
}

impl From<IntervalAction> for Action {
    fn from(interval: IntervalAction) -> Self {
        Action::Interval(interval)
    }
}

impl From<TurnAction> for Action {
    fn from(turns: TurnAction) -> Self {
        Action::Turns(turns)
    }
}

/// Place `count` new entities at random free points
#[derive(Debug)]
pub struct Spawn {
    count: usize,
    factory: Box<dyn EntityFactory>,
}

impl Spawn {
    pub fn new(count: usize, factory: Box<dyn EntityFactory>) -> Self {
        Self { count, factory }
    }

    fn execute(&mut self, world: &mut World, rng: &mut ChaCha8Rng) -> Result<ActionRecord> {
        let free = world.free_cell_count();
        let target = self.count.min(free);
        if target < self.count {
            warn!(
                requested = self.count,
                free_cells = free,
                "World is full, spawning fewer entities"
            );
        }

        let mut spawned = Vec::with_capacity(target);
        for _ in 0..target {
            let id = world.create(self.factory.spawn_entity());
            match place_randomly(id, world, rng) {
                Ok(_) => spawned.push(id),
                Err(e) => {
                    Self::undo(&spawned, world)?;
                    return Err(e);
                }
            }
        }

        Ok(ActionRecord::Spawn { spawned })
    }

    fn undo(spawned: &[EntityId], world: &mut World) -> Result<()> {
        for &id in spawned.iter().rev() {
            world.remove(id)?;
        }
        Ok(())
    }
}

fn place_randomly(id: EntityId, world: &mut World, rng: &mut ChaCha8Rng) -> Result<Point> {
    for _ in 0..RANDOM_PLACEMENT_ATTEMPTS {
        let point = Point::new(
            rng.gen_range(0..world.width()),
            rng.gen_range(0..world.height()),
        );
        match world.add(point, id) {
            Ok(()) => return Ok(point),
            Err(Error::PointOccupied(_)) => continue,
            Err(e) => return Err(e),
        }
    }

    let point = world
        .free_cells()
        .choose(rng)
        .copied()
        .ok_or_else(|| Error::InvalidState("No free cell left to spawn into".to_string()))?;
    world.add(point, id)?;
    Ok(point)
}

/// Run the inner action on every `interval`-th call
#[derive(Debug)]
pub struct IntervalAction {
    interval: u32,
    inner: Box<Action>,
    executed: u64,
}

impl IntervalAction {
    pub fn new(interval: u32, inner: impl Into<Action>) -> Result<Self> {
        if interval == 0 {
            return Err(Error::Validation("Interval must be non-zero".to_string()));
        }
        Ok(Self {
            interval,
            inner: Box::new(inner.into()),
            executed: 0,
        })
    }

    /// Calls made so far, net of undos
    pub fn executed(&self) -> u64 {
        self.executed
    }

    fn is_due(&self) -> bool {
        self.executed % u64::from(self.interval) == 0
    }

    fn execute(&mut self, world: &mut World, rng: &mut ChaCha8Rng) -> Result<ActionRecord> {
        self.executed += 1;
        if !self.is_due() {
            return Ok(ActionRecord::Interval { fired: None });
        }

        match self.inner.execute(world, rng) {
            Ok(record) => Ok(ActionRecord::Interval {
                fired: Some(Box::new(record)),
            }),
            Err(e) => {
                self.executed -= 1;
                Err(e)
            }
        }
    }

    fn undo(&mut self, fired: Option<Box<ActionRecord>>, world: &mut World) -> Result<()> {
        match (self.is_due(), fired) {
            (true, Some(record)) => self.inner.undo(*record, world)?,
            (false, None) => {}
            _ => {
                return Err(Error::InvalidState(format!(
                    "Interval record out of step at call {}",
                    self.executed
                )))
            }
        }
        self.executed -= 1;
        Ok(())
    }
}

/// Ordered turn list per species
#[derive(Debug, Clone, Default)]
pub struct TurnMap {
    turns: HashMap<EntityKind, Vec<Turn>>,
}

impl TurnMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append turns to the list for `kind`
    pub fn add(&mut self, kind: EntityKind, turns: impl IntoIterator<Item = Turn>) -> &mut Self {
        self.turns.entry(kind).or_default().extend(turns);
        self
    }

    pub fn get(&self, kind: EntityKind) -> &[Turn] {
        self.turns.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Walk every live creature through its species' turn list
#[derive(Debug, Clone)]
pub struct TurnAction {
    turn_map: TurnMap,
}

impl TurnAction {
    pub fn new(turn_map: TurnMap) -> Self {
        Self { turn_map }
    }

    fn execute(&mut self, world: &mut World, rng: &mut ChaCha8Rng) -> Result<ActionRecord> {
        let mut executed = Vec::new();

        if let Err(e) = self.run_creatures(world, rng, &mut executed) {
            if let Err(undo_err) = Self::undo(&executed, world) {
                warn!(error = %undo_err, "Failed to roll back partial turn");
            }
            return Err(e);
        }

        Ok(ActionRecord::Turns { executed })
    }

    fn run_creatures(
        &self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        executed: &mut Vec<TurnRecord>,
    ) -> Result<()> {
        // Creatures born or removed later in this call do not change who acts
        let snapshot = world.get_entities(EntityFilter::Creatures);

        for (_, id) in snapshot {
            if is_dead(id, world) {
                continue;
            }

            let kind = world.entity(id)?.kind();
            for turn in self.turn_map.get(kind) {
                let outcome = turn.execute(id, world, rng)?;
                executed.push(outcome.record);
                if outcome.ends_turn {
                    break;
                }
            }
        }

        debug!(records = executed.len(), "Creature turns resolved");
        Ok(())
    }

    fn undo(executed: &[TurnRecord], world: &mut World) -> Result<()> {
        for record in executed.iter().rev() {
            record.undo(world)?;
        }
        Ok(())
    }
}

fn is_dead(id: EntityId, world: &World) -> bool {
    !world.is_placed(id) || !world.creature(id).is_ok_and(|creature| creature.is_alive())
}
