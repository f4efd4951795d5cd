use crate::api::config::PhysicsConfig;
use crate::api::types::EntityId;
use crate::components::entity::Entity;
use crate::core::rect::Rect;
use crate::core::scene::Scene;
use crate::systems::collision::CollisionStrategy;
use crate::systems::motion::{move_entities, MoveOptions};
use crate::systems::update::{update, UpdateReport};

/// A scene bundled with its configuration and collision strategy.
///
/// Convenience for drivers that do not want to thread bounds, options and
/// strategy through every call; the free functions in `systems` remain the
/// primitive API.
pub struct World {
    pub scene: Scene,
    config: PhysicsConfig,
    strategy: Box<dyn CollisionStrategy>,
    last_report: UpdateReport,
}

impl World {
    pub fn new(config: PhysicsConfig) -> Self {
        let strategy = config
            .strategy
            .build(config.quadtree.max_items, config.quadtree.max_levels);
        Self {
            scene: Scene::with_seed(config.seed),
            config,
            strategy,
            last_report: UpdateReport::default(),
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Swap configuration, keeping the live entities.
    pub fn set_config(&mut self, config: PhysicsConfig) {
        self.strategy = config
            .strategy
            .build(config.quadtree.max_items, config.quadtree.max_levels);
        self.config = config;
    }

    pub fn bounds(&self) -> Rect {
        self.config.bounds
    }

    pub fn options(&self) -> MoveOptions {
        self.config.options
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        self.scene.next_id()
    }

    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.scene.spawn(entity)
    }

    /// Move, detect and resolve collisions for one step of `dt`.
    pub fn step(&mut self, dt: f64) -> &UpdateReport {
        let bounds = self.config.bounds;
        let options = self.config.options;
        self.last_report = update(dt, &mut self.scene, &bounds, &options, self.strategy.as_mut());
        &self.last_report
    }

    /// Integrate and constrain without resolving collisions.
    pub fn move_only(&mut self, dt: f64) {
        move_entities(dt, self.scene.entities_mut(), &self.config.bounds, &self.config.options);
    }

    /// Report from the most recent `step`.
    pub fn last_report(&self) -> &UpdateReport {
        &self.last_report
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
