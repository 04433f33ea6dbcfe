//! Model loading and the typed fragment-list representation.
//!
//! A [`Model`] is a flat list of [`MeshPiece`]s — for intact buildings that
//! is usually a single piece, for pre-authored "broken" variants one piece
//! per disjoint chunk. Pieces arrive already pivot-corrected: geometry is
//! re-origined on its bounding-box center and the original offset recorded,
//! so the destruction pipeline never walks a scene-node tree.

pub mod loader;
pub mod model;

pub use loader::*;
pub use model::*;
