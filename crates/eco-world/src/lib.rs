//! World simulation engine.
//!
//! This module implements the bounded 2D grid where herbivores and predators
//! roam, graze, hunt and starve, plus the reversible turn machinery that lets
//! the driver step a simulation backwards.

pub mod action;
pub mod control;
pub mod entity;
pub mod factory;
pub mod pathfinding;
pub mod render;
pub mod scenario;
pub mod simulation;
pub mod turn;
pub mod world;

pub use action::{Action, ActionRecord, IntervalAction, Spawn, TurnAction, TurnMap};
pub use control::{Status, StatusHandle};
pub use entity::{Creature, Entity, EntityFilter, Grass, Herbivore, Predator};
pub use factory::EntityFactory;
pub use pathfinding::PathStrategy;
pub use render::Renderer;
pub use simulation::{Simulation, SimulationSummary};
pub use turn::{Turn, TurnRecord};
pub use world::{Census, World};
