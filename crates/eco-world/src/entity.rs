//! Entity records and their capabilities.

use eco_core::EntityKind;
use serde::{Deserialize, Serialize};

/// Stats shared by every entity that takes turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub hp: i32,
    max_hp: i32,
    pub speed: i32,
    pub visual_radius: i32,
}

impl Creature {
    /// The starting hp doubles as the healing cap.
    pub fn new(hp: i32, speed: i32, visual_radius: i32) -> Self {
        Self {
            hp,
            max_hp: hp,
            speed,
            visual_radius,
        }
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Restore hp, never past `max_hp`
    pub fn heal(&mut self, amount: i32) {
        self.hp = self.max_hp.min(self.hp + amount);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grass {
    pub nutritional_quality: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Herbivore {
    pub creature: Creature,
    pub nutritional_quality: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predator {
    pub creature: Creature,
    pub power: i32,
}

/// Anything that can occupy a cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Entity {
    Rock,
    Tree,
    Grass(Grass),
    Herbivore(Herbivore),
    Predator(Predator),
}

impl Entity {
    pub fn grass(nutritional_quality: i32) -> Self {
        Entity::Grass(Grass {
            nutritional_quality,
        })
    }

    pub fn herbivore(hp: i32, speed: i32, visual_radius: i32, nutritional_quality: i32) -> Self {
        Entity::Herbivore(Herbivore {
            creature: Creature::new(hp, speed, visual_radius),
            nutritional_quality,
        })
    }

    pub fn predator(hp: i32, speed: i32, visual_radius: i32, power: i32) -> Self {
        Entity::Predator(Predator {
            creature: Creature::new(hp, speed, visual_radius),
            power,
        })
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Rock => EntityKind::Rock,
            Entity::Tree => EntityKind::Tree,
            Entity::Grass(_) => EntityKind::Grass,
            Entity::Herbivore(_) => EntityKind::Herbivore,
            Entity::Predator(_) => EntityKind::Predator,
        }
    }

    pub fn creature(&self) -> Option<&Creature> {
        match self {
            Entity::Herbivore(herbivore) => Some(&herbivore.creature),
            Entity::Predator(predator) => Some(&predator.creature),
            _ => None,
        }
    }

    pub fn creature_mut(&mut self) -> Option<&mut Creature> {
        match self {
            Entity::Herbivore(herbivore) => Some(&mut herbivore.creature),
            Entity::Predator(predator) => Some(&mut predator.creature),
            _ => None,
        }
    }

    /// Hp granted when eaten; `None` for entities that are never food
    pub fn nutritional_quality(&self) -> Option<i32> {
        match self {
            Entity::Grass(grass) => Some(grass.nutritional_quality),
            Entity::Herbivore(herbivore) => Some(herbivore.nutritional_quality),
            _ => None,
        }
    }

    /// Grass is always food; a herbivore only once it is dead.
    pub fn can_be_eaten(&self) -> bool {
        match self {
            Entity::Grass(_) => true,
            Entity::Herbivore(herbivore) => herbivore.creature.hp <= 0,
            _ => false,
        }
    }

    pub fn target_kind(&self) -> Option<EntityKind> {
        self.kind().target()
    }

    /// Attack damage, predators only
    pub fn power(&self) -> Option<i32> {
        match self {
            Entity::Predator(predator) => Some(predator.power),
            _ => None,
        }
    }
}

/// Selects entities by species or by the ability to take turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityFilter {
    All,
    Kind(EntityKind),
    Creatures,
}

impl EntityFilter {
    pub fn matches(&self, entity: &Entity) -> bool {
        match self {
            EntityFilter::All => true,
            EntityFilter::Kind(kind) => entity.kind() == *kind,
            EntityFilter::Creatures => entity.creature().is_some(),
        }
    }
}

impl From<EntityKind> for EntityFilter {
    fn from(kind: EntityKind) -> Self {
        EntityFilter::Kind(kind)
    }
}
