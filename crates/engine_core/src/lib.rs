//! Core types shared by every crate in the orbital viewer.
//!
//! - `Rgb` palette colours (stored sRGB, converted to linear for the GPU)
//! - `FrameClock` for per-frame delta time

pub mod color;
pub mod time;

pub use color::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
