//! Drawable components built on [`Mesh`](crate::render::Mesh).

mod text;

pub use text::{Text, DEFAULT_TAB_WIDTH};
