//! Procedurally authored placeholder models.
//!
//! Stands in for the intact/broken model pairs an art pipeline would ship as
//! glTF files: the intact building is a single box with its base on the
//! ground, the broken variant is the same volume pre-split into a grid of
//! chunks. Registered in the model catalog under the same names a disk-based
//! catalog would use.

use assets::{MeshPiece, Model};
use glam::Vec3;

/// Intact building: one box, base resting on y = 0.
pub fn intact_building(size: Vec3) -> Model {
    let center = Vec3::new(0.0, size.y * 0.5, 0.0);
    Model::new(
        "building/intact",
        vec![MeshPiece::cuboid("building", center, size * 0.5)],
    )
}

/// Broken variant: the same volume split into `chunks` pieces per axis.
pub fn broken_building(size: Vec3, chunks: [u32; 3]) -> Model {
    let counts = [chunks[0].max(1), chunks[1].max(1), chunks[2].max(1)];
    let cell = size / Vec3::new(counts[0] as f32, counts[1] as f32, counts[2] as f32);
    let mut pieces = Vec::with_capacity((counts[0] * counts[1] * counts[2]) as usize);
    for x in 0..counts[0] {
        for y in 0..counts[1] {
            for z in 0..counts[2] {
                let center = Vec3::new(
                    (x as f32 + 0.5) * cell.x - size.x * 0.5,
                    (y as f32 + 0.5) * cell.y,
                    (z as f32 + 0.5) * cell.z - size.z * 0.5,
                );
                pieces.push(MeshPiece::cuboid(
                    format!("chunk_{x}_{y}_{z}"),
                    center,
                    cell * 0.5,
                ));
            }
        }
    }
    Model::new("building/broken", pieces)
}
