//! glTF model loading.

use crate::model::{MeshPiece, Model};
use glam::{Quat, Vec3};
use std::path::PathBuf;
use thiserror::Error;

/// Why a model failed to load. Load failures are non-fatal to callers: the
/// registry logs them and leaves prior state intact.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load glTF: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("model '{0}' contains no mesh geometry")]
    NoGeometry(String),
}

/// Loads models from a base directory. Each glTF node carrying a mesh
/// becomes one [`MeshPiece`] with its node transform baked into the
/// vertices, so "broken" models authored as one-node-per-chunk arrive as an
/// explicit, typed piece list.
pub struct ModelSource {
    base: PathBuf,
}

impl ModelSource {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Load `name` (a path relative to the base directory).
    pub fn load(&self, name: &str) -> Result<Model, AssetError> {
        let path = self.base.join(name);
        let (document, buffers, _images) = gltf::import(&path)?;

        let mut pieces = Vec::new();
        for node in document.nodes() {
            let Some(mesh) = node.mesh() else { continue };
            let (translation, rotation, scale) = node.transform().decomposed();
            let translation = Vec3::from(translation);
            let rotation = Quat::from_array(rotation);
            let scale = Vec3::from(scale);

            let mut positions: Vec<Vec3> = Vec::new();
            let mut indices: Vec<u32> = Vec::new();
            for primitive in mesh.primitives() {
                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
                let vertex_base = positions.len() as u32;
                if let Some(iter) = reader.read_positions() {
                    positions
                        .extend(iter.map(|p| translation + rotation * (Vec3::from(p) * scale)));
                }
                if let Some(iter) = reader.read_indices() {
                    indices.extend(iter.into_u32().map(|i| i + vertex_base));
                }
            }

            let piece_name = node.name().unwrap_or("piece").to_string();
            if let Some(piece) = MeshPiece::from_positions(piece_name, positions, indices) {
                pieces.push(piece);
            }
        }

        if pieces.is_empty() {
            return Err(AssetError::NoGeometry(name.to_string()));
        }
        log::debug!("loaded model '{}': {} pieces", name, pieces.len());
        Ok(Model::new(name, pieces))
    }
}

/// Cache of loaded models keyed by name.
///
/// Procedurally authored models are inserted directly; anything else is
/// loaded through the source on first use and kept for later transitions.
pub struct ModelCatalog {
    source: ModelSource,
    models: std::collections::HashMap<String, Model>,
}

impl ModelCatalog {
    pub fn new(source: ModelSource) -> Self {
        Self {
            source,
            models: std::collections::HashMap::new(),
        }
    }

    /// Register an in-memory model under a name.
    pub fn insert(&mut self, name: impl Into<String>, model: Model) {
        self.models.insert(name.into(), model);
    }

    /// Fetch a model, loading it from disk on first use.
    pub fn get_or_load(&mut self, name: &str) -> Result<&Model, AssetError> {
        if !self.models.contains_key(name) {
            let model = self.source.load(name)?;
            self.models.insert(name.to_string(), model);
        }
        Ok(&self.models[name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MeshPiece;
    use glam::Vec3;

    #[test]
    fn missing_file_is_an_error_not_a_panic() {
        let source = ModelSource::new("does/not/exist");
        let result = source.load("nothing.glb");
        assert!(matches!(result, Err(AssetError::Gltf(_))));
    }

    #[test]
    fn catalog_serves_inserted_models_without_touching_disk() {
        let mut catalog = ModelCatalog::new(ModelSource::new("unused"));
        let piece = MeshPiece::from_positions(
            "p",
            vec![Vec3::ZERO, Vec3::ONE],
            vec![],
        )
        .unwrap();
        catalog.insert("authored", Model::new("authored", vec![piece]));
        assert!(catalog.get_or_load("authored").is_ok());
        assert!(catalog.get_or_load("missing").is_err());
    }
}
