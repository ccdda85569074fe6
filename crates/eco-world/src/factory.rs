//! Entity factories used by spawn actions.

use crate::entity::Entity;
use eco_core::{EntityConfig, EntityKind, GrassConfig, HerbivoreConfig, PredatorConfig};
use std::fmt;

/// Produces fresh entity records for a spawn action
pub trait EntityFactory: fmt::Debug + Send {
    fn spawn_entity(&self) -> Entity;
}

#[derive(Debug, Clone)]
pub struct HerbivoreFactory {
    config: HerbivoreConfig,
}

impl HerbivoreFactory {
    pub fn new(config: &HerbivoreConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EntityFactory for HerbivoreFactory {
    fn spawn_entity(&self) -> Entity {
        Entity::herbivore(
            self.config.hp,
            self.config.speed,
            self.config.visual_radius,
            self.config.nutritional_quality,
        )
    }
}

#[derive(Debug, Clone)]
pub struct PredatorFactory {
    config: PredatorConfig,
}

impl PredatorFactory {
    pub fn new(config: &PredatorConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl EntityFactory for PredatorFactory {
    fn spawn_entity(&self) -> Entity {
        Entity::predator(
            self.config.hp,
            self.config.speed,
            self.config.visual_radius,
            self.config.power,
        )
    }
}

#[derive(Debug, Clone)]
pub struct GrassFactory {
    nutritional_quality: i32,
}

impl GrassFactory {
    pub fn new(config: &GrassConfig) -> Self {
        Self {
            nutritional_quality: config.nutritional_quality,
        }
    }
}

impl EntityFactory for GrassFactory {
    fn spawn_entity(&self) -> Entity {
        Entity::grass(self.nutritional_quality)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RockFactory;

impl EntityFactory for RockFactory {
    fn spawn_entity(&self) -> Entity {
        Entity::Rock
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeFactory;

impl EntityFactory for TreeFactory {
    fn spawn_entity(&self) -> Entity {
        Entity::Tree
    }
}

/// Factory for `kind` parametrised by the species presets
pub fn for_kind(kind: EntityKind, config: &EntityConfig) -> Box<dyn EntityFactory> {
    match kind {
        EntityKind::Rock => Box::new(RockFactory),
        EntityKind::Tree => Box::new(TreeFactory),
        EntityKind::Grass => Box::new(GrassFactory::new(&config.grass)),
        EntityKind::Herbivore => Box::new(HerbivoreFactory::new(&config.herbivore)),
        EntityKind::Predator => Box::new(PredatorFactory::new(&config.predator)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factories_follow_presets() {
        let config = EntityConfig::default();

        let herbivore = HerbivoreFactory::new(&config.herbivore).spawn_entity();
        let stats = herbivore.creature().unwrap();
        assert_eq!(stats.hp, config.herbivore.hp);
        assert_eq!(stats.max_hp(), config.herbivore.hp);
        assert_eq!(stats.speed, config.herbivore.speed);
        assert_eq!(
            herbivore.nutritional_quality(),
            Some(config.herbivore.nutritional_quality)
        );

        let predator = PredatorFactory::new(&config.predator).spawn_entity();
        assert_eq!(predator.power(), Some(config.predator.power));
    }

    #[test]
    fn test_for_kind() {
        let config = EntityConfig::default();
        for kind in EntityKind::all() {
            assert_eq!(for_kind(kind, &config).spawn_entity().kind(), kind);
        }
    }

    #[test]
    fn test_each_spawn_is_a_fresh_record() {
        let factory = HerbivoreFactory::new(&HerbivoreConfig::default());
        let mut first = factory.spawn_entity();
        first.creature_mut().unwrap().hp = 1;
        assert_eq!(
            factory.spawn_entity().creature().unwrap().hp,
            HerbivoreConfig::default().hp
        );
    }
}
