//! Axis-aligned level geometry.
//!
//! A flat list of boxes implementing [`CollisionQuery`]. Levels are small,
//! so every query is a linear scan; results are ordered by distance and then
//! by collider id so identical queries always answer identically.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Collider, ColliderId, CollisionQuery, Hit, SurfaceKind};

/// Parallel-axis threshold for slab tests.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Errors from loading a level description.
#[derive(Debug, Error)]
pub enum LevelError {
    /// File could not be read.
    #[error("failed to read level file: {0}")]
    Io(#[from] std::io::Error),

    /// File is not a valid level description.
    #[error("invalid level description: {0}")]
    Parse(#[from] serde_json::Error),

    /// A block has a non-positive or non-finite size.
    #[error("block {index} has invalid size {size}")]
    InvalidBlock {
        /// Index of the block in the description.
        index: usize,
        /// The rejected size.
        size: Vec2,
    },
}

/// One block of a serialized level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockDescription {
    /// Center position.
    pub center: Vec2,
    /// Full width and height.
    pub size: Vec2,
    /// Gameplay classification.
    #[serde(default)]
    pub kind: SurfaceKind,
    /// Whether grapple lines may attach.
    #[serde(default = "default_grippable")]
    pub grippable: bool,
}

fn default_grippable() -> bool {
    true
}

/// Serialized level: spawn point plus blocks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelDescription {
    /// Where the character starts.
    pub spawn: Vec2,
    /// Level geometry.
    pub blocks: Vec<BlockDescription>,
}

impl LevelDescription {
    /// Parse a level from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Load a level from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> Result<(), LevelError> {
        for (index, block) in self.blocks.iter().enumerate() {
            if !block.size.is_finite() || block.size.x <= 0.0 || block.size.y <= 0.0 {
                return Err(LevelError::InvalidBlock {
                    index,
                    size: block.size,
                });
            }
        }
        Ok(())
    }

    /// A small demo course: floor, a wall, an overhang to swing from,
    /// a non-grippable pillar, a spike pit, a checkpoint and an exit.
    pub fn demo() -> Self {
        let block = |center: Vec2, size: Vec2, kind: SurfaceKind, grippable: bool| {
            BlockDescription {
                center,
                size,
                kind,
                grippable,
            }
        };

        Self {
            spawn: Vec2::new(0.0, 1.0),
            blocks: vec![
                block(Vec2::new(0.0, -0.5), Vec2::new(20.0, 1.0), SurfaceKind::Solid, true),
                block(Vec2::new(-10.5, 5.0), Vec2::new(1.0, 12.0), SurfaceKind::Solid, true),
                block(Vec2::new(16.0, 9.0), Vec2::new(12.0, 1.0), SurfaceKind::Solid, true),
                block(Vec2::new(7.0, 2.0), Vec2::new(1.0, 4.0), SurfaceKind::Solid, false),
                block(Vec2::new(15.0, -3.0), Vec2::new(10.0, 1.0), SurfaceKind::Hazard, false),
                block(Vec2::new(24.0, -0.5), Vec2::new(8.0, 1.0), SurfaceKind::Solid, true),
                block(Vec2::new(23.0, 0.75), Vec2::new(0.5, 1.5), SurfaceKind::Checkpoint, false),
                block(Vec2::new(27.0, 1.0), Vec2::new(1.0, 2.0), SurfaceKind::Exit, false),
            ],
        }
    }
}

/// A box in the level.
#[derive(Clone, Copy, Debug)]
struct Block {
    collider: Collider,
    half_extents: Vec2,
}

impl Block {
    fn min(&self) -> Vec2 {
        self.collider.center - self.half_extents
    }

    fn max(&self) -> Vec2 {
        self.collider.center + self.half_extents
    }
}

/// The collision world: an ordered set of axis-aligned boxes.
#[derive(Clone, Debug, Default)]
pub struct LevelGeometry {
    blocks: Vec<Block>,
    next_id: ColliderId,
}

impl LevelGeometry {
    /// Create an empty level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build geometry from a level description.
    pub fn from_description(level: &LevelDescription) -> Self {
        let mut geometry = Self::new();
        for block in &level.blocks {
            geometry.add_block(block.center, block.size * 0.5, block.kind, block.grippable);
        }
        geometry
    }

    /// Add a box to the level.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position in world space
    /// * `half_extents` - Half-size on each axis
    /// * `kind` - Gameplay classification
    /// * `grippable` - Whether grapple lines may attach
    ///
    /// # Returns
    ///
    /// The collider id.
    pub fn add_block(
        &mut self,
        center: Vec2,
        half_extents: Vec2,
        kind: SurfaceKind,
        grippable: bool,
    ) -> ColliderId {
        let id = self.next_id;
        self.next_id += 1;

        self.blocks.push(Block {
            collider: Collider {
                id,
                kind,
                grippable,
                center,
            },
            half_extents: half_extents.abs(),
        });

        id
    }

    /// Add a grippable solid box.
    pub fn add_solid(&mut self, center: Vec2, half_extents: Vec2) -> ColliderId {
        self.add_block(center, half_extents, SurfaceKind::Solid, true)
    }

    /// Add a hazard box.
    pub fn add_hazard(&mut self, center: Vec2, half_extents: Vec2) -> ColliderId {
        self.add_block(center, half_extents, SurfaceKind::Hazard, false)
    }

    /// Add a checkpoint trigger.
    pub fn add_checkpoint(&mut self, center: Vec2, half_extents: Vec2) -> ColliderId {
        self.add_block(center, half_extents, SurfaceKind::Checkpoint, false)
    }

    /// Add a level exit trigger.
    pub fn add_exit(&mut self, center: Vec2, half_extents: Vec2) -> ColliderId {
        self.add_block(center, half_extents, SurfaceKind::Exit, false)
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the level has no geometry.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Slab test of a ray against an AABB.
///
/// Returns `(distance, normal)` of the entry face. A ray starting inside the
/// box reports distance 0 with the normal facing against the ray.
fn ray_vs_aabb(origin: Vec2, direction: Vec2, min: Vec2, max: Vec2) -> Option<(f32, Vec2)> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;
    let mut normal = -direction;

    for axis in 0..2 {
        let o = origin[axis];
        let d = direction[axis];
        let (lo, hi) = (min[axis], max[axis]);

        if d.abs() < PARALLEL_EPSILON {
            if o <= lo || o >= hi {
                return None;
            }
            continue;
        }

        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        let (enter, exit) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        if enter > t_near {
            t_near = enter;
            normal = Vec2::ZERO;
            normal[axis] = -d.signum();
        }
        t_far = t_far.min(exit);
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }

    if t_near < 0.0 {
        return Some((0.0, -direction));
    }

    Some((t_near, normal))
}

/// Shallowest-axis push-out normal for a point strictly inside an AABB.
fn inside_normal(point: Vec2, min: Vec2, max: Vec2) -> Option<Vec2> {
    let inside = point.x > min.x && point.x < max.x && point.y > min.y && point.y < max.y;
    if !inside {
        return None;
    }

    let left = point.x - min.x;
    let right = max.x - point.x;
    let down = point.y - min.y;
    let up = max.y - point.y;

    let depth_x = left.min(right);
    let depth_y = down.min(up);

    let normal = if depth_x < depth_y {
        if left < right { Vec2::NEG_X } else { Vec2::X }
    } else if down < up {
        Vec2::NEG_Y
    } else {
        Vec2::Y
    };
    Some(normal)
}

fn by_distance_then_id(a: &Hit, b: &Hit) -> std::cmp::Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then(a.collider.id.cmp(&b.collider.id))
}

impl CollisionQuery for LevelGeometry {
    fn ray_cast_all(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .blocks
            .iter()
            .filter_map(|block| {
                let (distance, normal) = ray_vs_aabb(origin, direction, block.min(), block.max())?;
                (distance <= max_distance).then(|| Hit {
                    point: origin + direction * distance,
                    normal,
                    distance,
                    collider: block.collider,
                })
            })
            .collect();

        hits.sort_by(by_distance_then_id);
        hits
    }

    fn box_overlap(&self, center: Vec2, size: Vec2) -> Vec<Collider> {
        let half = size.abs() * 0.5;
        self.blocks
            .iter()
            .filter(|block| {
                let delta = (center - block.collider.center).abs();
                let reach = half + block.half_extents;
                delta.x < reach.x && delta.y < reach.y
            })
            .map(|block| block.collider)
            .collect()
    }

    fn box_cast(
        &self,
        center: Vec2,
        size: Vec2,
        direction: Vec2,
        max_distance: f32,
    ) -> Option<Hit> {
        let half = size.abs() * 0.5;

        self.blocks
            .iter()
            .filter(|block| block.collider.kind.is_solid())
            .filter_map(|block| {
                // Minkowski sum: sweep the box center against the grown block.
                let min = block.min() - half;
                let max = block.max() + half;

                let (distance, normal) = match inside_normal(center, min, max) {
                    // Already overlapping: only block motion that digs deeper.
                    Some(normal) if direction.dot(normal) < 0.0 => (0.0, normal),
                    Some(_) => return None,
                    None => ray_vs_aabb(center, direction, min, max)?,
                };

                if distance > max_distance {
                    return None;
                }

                let swept_center = center + direction * distance;
                Some(Hit {
                    point: swept_center - normal * half,
                    normal,
                    distance,
                    collider: block.collider,
                })
            })
            .min_by(by_distance_then_id)
    }
}
