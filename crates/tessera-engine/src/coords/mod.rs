//! Coordinate types shared by geometry producers and the render boundary.
//!
//! Model space:
//! - +X right, +Y up
//! - text origin sits on the first line's baseline
//!
//! Transforms map model space into whatever space the draw sink expects.

mod bounds;
mod transform;
mod vec2;

pub use bounds::Bounds;
pub use transform::{Affine, Transform, TransformStack};
pub use vec2::Vec2;
