//! In-memory model representation: pivot-corrected mesh pieces.

use glam::Vec3;

/// One disjoint chunk of a model's geometry.
///
/// `positions` are stored with the piece's bounding-box center at the
/// origin; `center` is where that center sat in model space before the
/// re-origin. A physics body synthesized from this piece therefore has its
/// implied center of mass exactly on the visual center.
#[derive(Debug, Clone)]
pub struct MeshPiece {
    pub name: String,
    /// Vertex positions, re-origined on the bounding-box center.
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    /// Model-space offset of the bounding-box center (the pivot correction).
    pub center: Vec3,
    /// Bounding-box half extents about `center`.
    pub half_extents: Vec3,
}

impl MeshPiece {
    /// Build a piece from raw model-space geometry, performing the pivot
    /// correction. Returns `None` for empty geometry.
    pub fn from_positions(
        name: impl Into<String>,
        mut positions: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Option<Self> {
        if positions.is_empty() {
            return None;
        }
        let mut min = positions[0];
        let mut max = positions[0];
        for p in &positions[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        let center = (min + max) * 0.5;
        let half_extents = (max - min) * 0.5;
        for p in &mut positions {
            *p -= center;
        }
        Some(Self {
            name: name.into(),
            positions,
            indices,
            center,
            half_extents,
        })
    }
}

/// Triangle indices of the 8-corner cuboid emitted by [`MeshPiece::cuboid`].
const CUBOID_INDICES: [u32; 36] = [
    0, 1, 3, 0, 3, 2, // -x
    4, 6, 7, 4, 7, 5, // +x
    0, 4, 5, 0, 5, 1, // -y
    2, 3, 7, 2, 7, 6, // +y
    0, 2, 6, 0, 6, 4, // -z
    1, 5, 7, 1, 7, 3, // +z
];

impl MeshPiece {
    /// Axis-aligned cuboid piece centered at `center` in model space.
    /// Used for procedurally authored placeholder models.
    pub fn cuboid(name: impl Into<String>, center: Vec3, half_extents: Vec3) -> Self {
        let mut positions = Vec::with_capacity(8);
        for sx in [-1.0, 1.0] {
            for sy in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    positions.push(half_extents * Vec3::new(sx, sy, sz));
                }
            }
        }
        Self {
            name: name.into(),
            positions,
            indices: CUBOID_INDICES.to_vec(),
            center,
            half_extents,
        }
    }
}

/// A loaded model: a named, flat list of pieces.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub pieces: Vec<MeshPiece>,
}

impl Model {
    pub fn new(name: impl Into<String>, pieces: Vec<MeshPiece>) -> Self {
        Self {
            name: name.into(),
            pieces,
        }
    }

    /// Combined bounding box of all pieces in model space:
    /// `(center, half_extents)`.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.pieces.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for piece in &self.pieces {
            min = min.min(piece.center - piece.half_extents);
            max = max.max(piece.center + piece.half_extents);
        }
        ((min + max) * 0.5, (max - min) * 0.5)
    }
}

/// Options for spawning a model into the scene. Every recognized knob is a
/// field with an explicit default; callers override with struct-update
/// syntax.
#[derive(Debug, Clone, Copy)]
pub struct SpawnOptions {
    pub mass: f32,
    pub position: Vec3,
    pub scale: f32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for SpawnOptions {
    fn default() -> Self {
        Self {
            mass: 10.0,
            position: Vec3::ZERO,
            scale: 1.0,
            friction: 0.5,
            restitution: 0.2,
        }
    }
}
