//! Common ECS components used across the engine.

/// Mesh reference component - links entity to a mesh for rendering.
///
/// The renderer itself is a host concern; the simulation only tags entities
/// with what they should look like.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshInstance {
    pub mesh_id: u32,
    pub material_id: u32,
}

impl MeshInstance {
    pub fn new(mesh_id: u32, material_id: u32) -> Self {
        Self {
            mesh_id,
            material_id,
        }
    }
}
