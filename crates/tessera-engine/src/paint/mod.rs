//! Colour model used by materials.

mod color;

pub use color::Color;
