//! Render boundary.
//!
//! Drawables own a [`Mesh`] (material + geometry) and hand it to a
//! [`MeshSink`] at draw time. Sinks decide what "drawing" means: recording
//! for inspection, or uploading to the GPU via [`gpu`].
//!
//! Convention:
//! - geometry is in model space; the sink receives the accumulated transform
//! - the engine core never issues graphics API calls outside of `gpu`

pub mod gpu;
mod material;
mod mesh;
mod sink;

pub use material::{Material, TextureKey};
pub use mesh::Mesh;
pub use sink::{DrawCall, DrawRecord, MeshSink, RecordingSink, RenderState};
