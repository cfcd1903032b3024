//! Procedural voxel fields for the scale comparison: the Earth shell, the Orbital
//! ring band, and the star backdrop.

pub mod field;
pub mod ring;
pub mod sphere;
pub mod starfield;

pub use field::*;
pub use ring::*;
pub use sphere::*;
pub use starfield::*;
