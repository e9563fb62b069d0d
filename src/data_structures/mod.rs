//! Viewer data structures: instances, meshes, materials, textures and the
//! composite scene graph.
//!
//! - `instance` holds per-part transformation data and its GPU layout
//! - `model` contains mesh and material definitions and their GPU resources
//! - `scene_graph` is the composite object the assembler builds
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
