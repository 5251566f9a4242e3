//! Tessera engine crate.
//!
//! Vertex/index storage with validation and merging, shader-aware checks,
//! and runtime text meshing. Drawing goes through a [`render::MeshSink`].

pub mod geometry;
pub mod shader;
pub mod text;
pub mod shapes;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
