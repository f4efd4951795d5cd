use drift_engine::{
    Deflecting, Entity, EntityId, EntityKind, FixedTimestep, PhysicsConfig, Polygon, Shatter,
    SnapshotBuffer, Vector2, World,
};

/// Policy codes accepted by [`WorldRunner::spawn_box`].
pub const POLICY_DESTRUCTIBLE: u32 = 0;
pub const POLICY_DEFLECTING: u32 = 1;
pub const POLICY_SHATTER: u32 = 2;

/// Wires a [`World`] to a browser frame loop.
///
/// The page calls `tick` with wall-clock frame time; the runner turns that
/// into fixed physics steps and rebuilds the snapshot buffer the renderer
/// reads through a raw pointer.
pub struct WorldRunner {
    world: World,
    timestep: FixedTimestep,
    snapshots: SnapshotBuffer,
    /// Collisions found during the last tick, summed over its steps.
    collision_count: u32,
    /// Entities removed during the last tick.
    removed: Vec<u32>,
}

impl WorldRunner {
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            snapshots: SnapshotBuffer::with_capacity(config.max_snapshots),
            world: World::new(config),
            collision_count: 0,
            removed: Vec::new(),
        }
    }

    /// Reconfigure from JSON. Invalid JSON is logged and the current
    /// configuration stays in place.
    pub fn init(&mut self, config_json: &str) -> bool {
        match PhysicsConfig::from_json(config_json) {
            Ok(config) => {
                self.timestep = FixedTimestep::new(config.fixed_dt);
                self.snapshots = SnapshotBuffer::with_capacity(config.max_snapshots);
                self.world.set_config(config);
                true
            }
            Err(e) => {
                log::error!("Failed to parse world config: {}", e);
                false
            }
        }
    }

    /// Run as many fixed steps as `frame_dt` covers, then rebuild snapshots.
    pub fn tick(&mut self, frame_dt: f64) {
        self.collision_count = 0;
        self.removed.clear();

        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            let report = self.world.step(self.timestep.dt());
            self.collision_count += report.collisions.len() as u32;
            self.removed.extend(report.removed.iter().map(|id| id.0));
        }

        self.snapshots.rebuild(self.world.scene.iter());
    }

    /// Spawn an axis-aligned box. Bit `k` of `collides_mask` makes it react
    /// to entities of kind `k`.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_box(
        &mut self,
        kind: u32,
        collides_mask: u32,
        policy: u32,
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        vx: f64,
        vy: f64,
    ) -> u32 {
        let id = self.world.next_id();
        let collides_with = (0..32)
            .filter(|bit| collides_mask & (1 << bit) != 0)
            .map(EntityKind);
        let entity = Entity::new(id, EntityKind(kind), Polygon::rectangle(w, h))
            .with_location(Vector2::new(x, y))
            .with_velocity(Vector2::new(vx, vy))
            .with_collides_with(collides_with);
        let entity = match policy {
            POLICY_DESTRUCTIBLE => entity,
            POLICY_DEFLECTING => entity.with_policy(Deflecting),
            POLICY_SHATTER => entity.with_policy(Shatter::new(3, 45.0)),
            other => {
                log::warn!("unknown policy code {}, using destructible", other);
                entity
            }
        };
        self.world.spawn(entity).0
    }

    pub fn despawn(&mut self, id: u32) -> bool {
        self.world.scene.despawn(EntityId(id)).is_some()
    }

    pub fn clear(&mut self) {
        self.world.scene.clear();
        self.timestep.reset();
        self.snapshots.rebuild(std::iter::empty());
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn snapshots_ptr(&self) -> *const f32 {
        self.snapshots.snapshots_ptr()
    }

    pub fn snapshot_count(&self) -> u32 {
        self.snapshots.count()
    }

    pub fn max_snapshots(&self) -> u32 {
        self.snapshots.capacity() as u32
    }

    pub fn entity_count(&self) -> u32 {
        self.world.scene.len() as u32
    }

    pub fn collision_count(&self) -> u32 {
        self.collision_count
    }

    pub fn removed_ids(&self) -> &[u32] {
        &self.removed
    }

    pub fn world_width(&self) -> f64 {
        self.world.bounds().width()
    }

    pub fn world_height(&self) -> f64 {
        self.world.bounds().height()
    }

    /// Interpolation factor between the last two physics steps.
    pub fn alpha(&self) -> f64 {
        self.timestep.alpha()
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}

impl Default for WorldRunner {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
