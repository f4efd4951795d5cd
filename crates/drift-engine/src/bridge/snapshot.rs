use bytemuck::{Pod, Zeroable};

use crate::components::entity::Entity;

/// Per-entity state written each frame for the JavaScript renderer.
/// Must match the TypeScript reader: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EntitySnapshot {
    /// Top-left corner of the entity's box.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    pub vx: f32,
    pub vy: f32,
    /// Entity kind tag, as a float.
    pub kind: f32,
}

impl EntitySnapshot {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            x: entity.location.x as f32,
            y: entity.location.y as f32,
            width: entity.width() as f32,
            height: entity.height() as f32,
            rotation: entity.rotation() as f32,
            vx: entity.velocity.x as f32,
            vy: entity.velocity.y as f32,
            kind: entity.kind.0 as f32,
        }
    }
}

/// Flat snapshot list with a fixed capacity, read through a raw pointer.
pub struct SnapshotBuffer {
    snapshots: Vec<EntitySnapshot>,
    max: usize,
}

impl SnapshotBuffer {
    pub fn with_capacity(max: usize) -> Self {
        Self {
            snapshots: Vec::with_capacity(max),
            max,
        }
    }

    /// Rewrite the buffer from live (non-expired) entities, in scene order.
    /// Entities beyond capacity are dropped from the export.
    pub fn rebuild<'a>(&mut self, entities: impl Iterator<Item = &'a Entity>) {
        self.snapshots.clear();
        let mut dropped = 0usize;
        for entity in entities.filter(|e| !e.expired) {
            if self.snapshots.len() == self.max {
                dropped += 1;
                continue;
            }
            self.snapshots.push(EntitySnapshot::from_entity(entity));
        }
        if dropped > 0 {
            log::warn!("snapshot buffer full: {} entities not exported", dropped);
        }
    }

    pub fn as_slice(&self) -> &[EntitySnapshot] {
        &self.snapshots
    }

    /// The snapshots as raw floats.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.snapshots)
    }

    pub fn count(&self) -> u32 {
        self.snapshots.len() as u32
    }

    pub fn capacity(&self) -> usize {
        self.max
    }

    /// Raw pointer to snapshot data for SharedArrayBuffer reads.
    pub fn snapshots_ptr(&self) -> *const f32 {
        self.snapshots.as_ptr() as *const f32
    }
}
