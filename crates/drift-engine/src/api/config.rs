use serde::{Deserialize, Serialize};

use crate::core::rect::Rect;
use crate::core::scene::Scene;
use crate::spatial::quadtree::{DEFAULT_MAX_ITEMS, DEFAULT_MAX_LEVELS};
use crate::systems::collision::StrategyKind;
use crate::systems::motion::MoveOptions;

/// World configuration, usually loaded from JSON by the host page.
/// Every field is optional in JSON and falls back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f64,
    /// World bounds entities are constrained against (default: 800x600).
    pub bounds: Rect,
    /// Boundary policy, gravity and speed cap.
    pub options: MoveOptions,
    /// How overlaps are found (default: brute force).
    pub strategy: StrategyKind,
    /// Quadtree tuning, used by the quad_tree strategy.
    pub quadtree: QuadTreeConfig,
    /// Seed for debris and other random spawns.
    pub seed: u64,
    /// Maximum number of entity snapshots exported per frame (default: 1024).
    pub max_snapshots: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadTreeConfig {
    pub max_items: usize,
    pub max_levels: u32,
}

impl Default for QuadTreeConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_ITEMS,
            max_levels: DEFAULT_MAX_LEVELS,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
            options: MoveOptions::default(),
            strategy: StrategyKind::default(),
            quadtree: QuadTreeConfig::default(),
            seed: Scene::DEFAULT_SEED,
            max_snapshots: 1024,
        }
    }
}

impl PhysicsConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let config = PhysicsConfig::from_json("{}").unwrap();
        assert_eq!(config, PhysicsConfig::default());
        assert_eq!(config.quadtree.max_items, 10);
        assert_eq!(config.quadtree.max_levels, 5);
    }

    #[test]
    fn parse_partial_config() {
        let json = r#"{
            "bounds": { "top": 0, "left": 0, "right": 320, "bottom": 240 },
            "options": { "wrap": true, "v_limit": 12.5 },
            "strategy": "quad_tree",
            "quadtree": { "max_items": 4 }
        }"#;
        let config = PhysicsConfig::from_json(json).unwrap();
        assert_eq!(config.bounds.right, 320.0);
        assert!(config.options.wrap);
        assert!(!config.options.deflect);
        assert_eq!(config.options.v_limit, Some(12.5));
        assert_eq!(config.options.gravity, None);
        assert_eq!(config.strategy, StrategyKind::QuadTree);
        assert_eq!(config.quadtree.max_items, 4);
        assert_eq!(config.quadtree.max_levels, 5);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(PhysicsConfig::from_json("{ \"fixed_dt\": \"fast\" }").is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = PhysicsConfig::default();
        config.options = MoveOptions::deflecting().with_gravity(0.2);
        let back = PhysicsConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
