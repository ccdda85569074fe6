//! Simulation driver: ticks, history and the interactive loop.

use crate::action::{Action, ActionRecord};
use crate::control::{Status, StatusHandle};
use crate::render::Renderer;
use crate::world::{Census, World};
use eco_core::{EntityKind, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub struct Simulation {
    world: World,
    turn_actions: Vec<Action>,
    /// One list of records per completed tick
    history: Vec<Vec<ActionRecord>>,
    rng: ChaCha8Rng,
}

/// End-of-run snapshot for headless runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub turn: u64,
    pub ticks: u64,
    pub width: i32,
    pub height: i32,
    pub census: Census,
}

impl Simulation {
    /// Run `init_actions` once against `world`, then keep `turn_actions` for
    /// every tick.
    pub fn new(
        mut world: World,
        init_actions: Vec<Action>,
        turn_actions: Vec<Action>,
        seed: u64,
    ) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for mut action in init_actions {
            action.execute(&mut world, &mut rng)?;
        }

        info!(
            seed,
            width = world.width(),
            height = world.height(),
            entities = world.len(),
            "Simulation initialised"
        );

        Ok(Self {
            world,
            turn_actions,
            history: Vec::new(),
            rng,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Number of the tick about to run, starting at 1
    pub fn turn_number(&self) -> u64 {
        self.history.len() as u64 + 1
    }

    /// Ticks that can still be undone
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Advance one tick. On error the world is rolled back to where it was
    /// before the tick and nothing is pushed to history.
    #[instrument(skip(self), fields(turn = self.turn_number()))]
    pub fn step(&mut self) -> Result<()> {
        let records = run_tick(&mut self.turn_actions, &mut self.world, &mut self.rng)?;
        self.history.push(records);

        let census = self.world.census();
        debug!(
            entities = census.total(),
            herbivores = census.get(EntityKind::Herbivore),
            predators = census.get(EntityKind::Predator),
            grass = census.get(EntityKind::Grass),
            "Tick complete"
        );
        Ok(())
    }

    /// Reverse the most recent tick. Returns `false` when there is nothing
    /// left to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(records) = self.history.pop() else {
            return Ok(false);
        };
        undo_tick(&mut self.turn_actions, records, &mut self.world)?;
        info!(turn = self.turn_number(), "Tick undone");
        Ok(true)
    }

    /// Run `ticks` ticks back to back
    pub fn run(&mut self, ticks: u64) -> Result<SimulationSummary> {
        info!(ticks, "Starting headless run");
        for _ in 0..ticks {
            self.step()?;
        }
        Ok(self.summary())
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            turn: self.turn_number(),
            ticks: self.history.len() as u64,
            width: self.world.width(),
            height: self.world.height(),
            census: self.world.census(),
        }
    }

    /// Drive the simulation from `status` until it reads [`Status::Quit`].
    ///
    /// The status is checked once per iteration, between ticks. Reverse
    /// falls back to Pause once history is exhausted.
    pub fn start<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        status: &StatusHandle,
        pacing: Duration,
    ) -> Result<()> {
        info!("Simulation started");
        renderer.render(&self.world, self.turn_number());

        let mut previous = None;
        loop {
            let current = status.get();
            match current {
                Status::Simulate => {
                    self.step()?;
                    renderer.clear_frame();
                    renderer.render(&self.world, self.turn_number());
                }
                Status::Pause => {
                    if previous != Some(Status::Pause) {
                        renderer.pause_notice();
                    }
                }
                Status::Reverse => {
                    if self.undo()? {
                        renderer.clear_frame();
                        renderer.render(&self.world, self.turn_number());
                    } else {
                        status.set(Status::Pause);
                    }
                }
                Status::Quit => {
                    renderer.end_notice();
                    info!(turn = self.turn_number(), "Simulation stopped");
                    return Ok(());
                }
            }
            previous = Some(current);
            thread::sleep(pacing);
        }
    }
}

fn run_tick(
    actions: &mut [Action],
    world: &mut World,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<ActionRecord>> {
    let mut records = Vec::with_capacity(actions.len());
    for index in 0..actions.len() {
        match actions[index].execute(world, rng) {
            Ok(record) => records.push(record),
            Err(e) => {
                if let Err(undo_err) = undo_tick(&mut actions[..index], records, world) {
                    warn!(error = %undo_err, "Failed to roll back partial tick");
                }
                return Err(e);
            }
        }
    }
    Ok(records)
}

/// Undo `records` against the actions that produced them, last first
fn undo_tick(actions: &mut [Action], records: Vec<ActionRecord>, world: &mut World) -> Result<()> {
    for (action, record) in actions.iter_mut().zip(records).rev() {
        action.undo(record, world)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{IntervalAction, Spawn, TurnAction, TurnMap};
    use crate::factory::{GrassFactory, HerbivoreFactory, RockFactory};
    use crate::pathfinding::PathStrategy;
    use crate::turn::Turn;
    use eco_core::{GrassConfig, HerbivoreConfig};

    fn grazing_simulation(seed: u64) -> Simulation {
        let init = vec![
            Spawn::new(6, Box::new(HerbivoreFactory::new(&HerbivoreConfig::default()))).into(),
            Spawn::new(20, Box::new(GrassFactory::new(&GrassConfig::default()))).into(),
            Spawn::new(10, Box::new(RockFactory)).into(),
        ];

        let mut map = TurnMap::new();
        map.add(
            EntityKind::Herbivore,
            [
                Turn::Starve { power: 1 },
                Turn::Move {
                    strategy: PathStrategy::AStar,
                },
                Turn::Eat,
            ],
        );
        let turns = vec![
            TurnAction::new(map).into(),
            IntervalAction::new(2, Spawn::new(3, Box::new(GrassFactory::new(&GrassConfig::default()))))
                .unwrap()
                .into(),
        ];

        Simulation::new(World::new(16, 12), init, turns, seed).unwrap()
    }

    struct ScriptedRenderer {
        status: StatusHandle,
        quit_after_renders: usize,
        renders: Vec<u64>,
        pauses: usize,
        ended: bool,
    }

    impl ScriptedRenderer {
        fn new(status: &StatusHandle, quit_after_renders: usize) -> Self {
            Self {
                status: status.clone(),
                quit_after_renders,
                renders: Vec::new(),
                pauses: 0,
                ended: false,
            }
        }
    }

    impl Renderer for ScriptedRenderer {
        fn render(&mut self, _world: &World, turn: u64) {
            self.renders.push(turn);
            if self.renders.len() == self.quit_after_renders {
                self.status.set(Status::Quit);
            }
        }

        fn clear_frame(&mut self) {}

        fn pause_notice(&mut self) {
            self.pauses += 1;
            self.status.set(Status::Quit);
        }

        fn end_notice(&mut self) {
            self.ended = true;
        }
    }

    #[test]
    fn test_init_actions_populate_world() {
        let sim = grazing_simulation(1);
        assert_eq!(sim.world().len(), 36);
        assert_eq!(sim.world().census().get(EntityKind::Herbivore), 6);
        assert_eq!(sim.turn_number(), 1);
        assert_eq!(sim.history_len(), 0);
    }

    #[test]
    fn test_step_then_undo_restores_world() {
        let mut sim = grazing_simulation(3);
        sim.step().unwrap();

        let bindings = sim.world().bindings();
        let records: Vec<_> = bindings
            .keys()
            .map(|id| sim.world().entity(*id).unwrap().clone())
            .collect();

        sim.step().unwrap();
        assert_eq!(sim.turn_number(), 3);
        assert!(sim.undo().unwrap());

        assert_eq!(sim.turn_number(), 2);
        assert_eq!(sim.world().bindings(), bindings);
        let restored: Vec<_> = bindings
            .keys()
            .map(|id| sim.world().entity(*id).unwrap().clone())
            .collect();
        assert_eq!(restored, records);
    }

    #[test]
    fn test_undo_all_the_way_back() {
        let mut sim = grazing_simulation(5);
        let initial = sim.world().bindings();
        for _ in 0..4 {
            sim.step().unwrap();
        }
        while sim.undo().unwrap() {}
        assert_eq!(sim.world().bindings(), initial);
        assert_eq!(sim.turn_number(), 1);
    }

    #[test]
    fn test_undo_with_empty_history() {
        let mut sim = grazing_simulation(1);
        assert!(!sim.undo().unwrap());
    }

    #[test]
    fn test_same_seed_same_run() {
        let mut first = grazing_simulation(42);
        let mut second = grazing_simulation(42);
        for _ in 0..10 {
            first.step().unwrap();
            second.step().unwrap();
            assert_eq!(first.world().bindings(), second.world().bindings());
        }
        assert_eq!(first.summary(), second.summary());
    }

    #[test]
    fn test_failed_tick_rolls_back() {
        let mut world = World::new(8, 8);
        let herbivore = world.create(crate::entity::Entity::herbivore(10, 1, 3, 5));
        world.add(eco_core::Point::new(4, 4), herbivore).unwrap();

        // Herbivores cannot attack, so the second step of their turn fails
        let mut map = TurnMap::new();
        map.add(EntityKind::Herbivore, [Turn::Starve { power: 2 }, Turn::Attack]);
        let turns = vec![
            Spawn::new(2, Box::new(RockFactory)).into(),
            TurnAction::new(map).into(),
        ];
        let mut sim = Simulation::new(world, vec![], turns, 9).unwrap();
        let before = sim.world().bindings();

        assert!(sim.step().is_err());
        assert_eq!(sim.world().bindings(), before);
        assert_eq!(sim.world().creature(herbivore).unwrap().hp, 10);
        assert_eq!(sim.history_len(), 0);
    }

    #[test]
    fn test_headless_run_summary() {
        let mut sim = grazing_simulation(11);
        let summary = sim.run(5).unwrap();
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.turn, 6);
        assert_eq!(summary.width, 16);
        assert_eq!(summary.census, sim.world().census());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["ticks"], 5);
    }

    #[test]
    fn test_start_runs_until_quit() {
        let mut sim = grazing_simulation(2);
        let status = StatusHandle::new(Status::Simulate);
        let mut renderer = ScriptedRenderer::new(&status, 3);

        sim.start(&mut renderer, &status, Duration::ZERO).unwrap();

        assert_eq!(renderer.renders, vec![1, 2, 3]);
        assert!(renderer.ended);
        assert_eq!(sim.history_len(), 2);
    }

    #[test]
    fn test_reverse_stops_at_empty_history() {
        let mut sim = grazing_simulation(2);
        sim.step().unwrap();
        sim.step().unwrap();

        let status = StatusHandle::new(Status::Reverse);
        let mut renderer = ScriptedRenderer::new(&status, usize::MAX);
        sim.start(&mut renderer, &status, Duration::ZERO).unwrap();

        assert_eq!(renderer.renders, vec![3, 2, 1]);
        assert_eq!(renderer.pauses, 1);
        assert!(renderer.ended);
        assert_eq!(sim.history_len(), 0);
    }
}
