//! Earth as a shell of voxels on a Fibonacci sphere.
//!
//! Placement is closed-form (golden-angle spiral), so the same radius and count always
//! give the same field. Colour comes from a cheap trigonometric "noise" over the unit
//! sphere: ice caps above |y| > 0.8, land where the noise clears 0.2, ocean elsewhere.

use crate::field::VoxelField;
use engine_core::Rgb;
use glam::Vec3;

/// Default voxel count for the Earth shell.
pub const EARTH_VOXEL_COUNT: usize = 800;
/// Earth's radius in scene units; every other distance is measured against it.
pub const EARTH_RADIUS: f32 = 1.0;
/// Voxel edge length as a fraction of the sphere radius.
pub const EARTH_VOXEL_SHRINK: f32 = 0.15;

/// |y| on the unit sphere above which a voxel is polar ice.
pub const EARTH_POLAR_CUTOFF: f32 = 0.8;
/// Noise value above which a non-polar voxel is land.
pub const EARTH_LAND_CUTOFF: f32 = 0.2;
const EARTH_NOISE_FREQUENCY: f32 = 5.0;

/// Surface class of one Earth voxel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceClass {
    Polar,
    Land,
    Ocean,
}

impl SurfaceClass {
    /// Classify a point given in unit-sphere coordinates (before scaling by radius).
    pub fn classify(unit: Vec3) -> Self {
        if unit.y.abs() > EARTH_POLAR_CUTOFF {
            return SurfaceClass::Polar;
        }
        let noise = (unit.x * EARTH_NOISE_FREQUENCY).sin()
            * (unit.y * EARTH_NOISE_FREQUENCY).cos()
            * (unit.z * EARTH_NOISE_FREQUENCY).sin();
        if noise > EARTH_LAND_CUTOFF {
            SurfaceClass::Land
        } else {
            SurfaceClass::Ocean
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            SurfaceClass::Polar => Rgb::from_hex(0xF3F4F6),
            SurfaceClass::Land => Rgb::from_hex(0x10B981),
            SurfaceClass::Ocean => Rgb::from_hex(0x1E3A8A),
        }
    }
}

/// Golden angle, π·(3 − √5).
pub fn golden_angle() -> f32 {
    std::f32::consts::PI * (3.0 - 5.0_f32.sqrt())
}

/// Unit-sphere position of spiral index `i` out of `count`.
fn fibonacci_point(i: usize, count: usize) -> Vec3 {
    let y = 1.0 - (i as f32 / (count - 1) as f32) * 2.0;
    let radius_at_y = (1.0 - y * y).max(0.0).sqrt();
    let theta = golden_angle() * i as f32;
    Vec3::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y)
}

/// Edge length of one Earth voxel for a sphere of `radius`.
pub fn earth_voxel_size(radius: f32) -> f32 {
    radius * EARTH_VOXEL_SHRINK
}

/// Evenly spread voxels on a sphere, centred at the origin.
#[derive(Debug, Clone)]
pub struct SphereField {
    pub radius: f32,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    classes: Vec<SurfaceClass>,
}

impl SphereField {
    /// Generate `count` voxels on a sphere of `radius`.
    ///
    /// `count` must be at least 2: the spiral divides by `count - 1`.
    pub fn generate(radius: f32, count: usize) -> Self {
        debug_assert!(count > 1, "sphere field needs at least two points");

        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut classes = Vec::with_capacity(count);

        for i in 0..count {
            let unit = fibonacci_point(i, count);
            let class = SurfaceClass::classify(unit);
            positions.push(unit * radius);
            colors.push(class.color());
            classes.push(class);
        }

        log::debug!("Generated sphere field: {} voxels, radius {}", count, radius);

        Self { radius, positions, colors, classes }
    }

    pub fn classes(&self) -> &[SurfaceClass] {
        &self.classes
    }
}

impl VoxelField for SphereField {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sphere_exact_count() {
        for count in [2, 3, 10, 800, 2500] {
            assert_eq!(SphereField::generate(1.0, count).len(), count);
        }
    }

    #[test]
    fn sphere_points_lie_on_surface() {
        for radius in [0.5, 1.0, 42.0] {
            let field = SphereField::generate(radius, 800);
            for p in field.positions() {
                assert!(
                    (p.length() - radius).abs() < radius * 1e-4,
                    "|{:?}| = {} should be {}",
                    p,
                    p.length(),
                    radius
                );
            }
        }
    }

    #[test]
    fn sphere_points_are_distinct() {
        let field = SphereField::generate(1.0, 3000);
        let unique: HashSet<[u32; 3]> = field
            .positions()
            .iter()
            .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
            .collect();
        assert_eq!(unique.len(), field.len());
    }

    #[test]
    fn sphere_is_deterministic() {
        let a = SphereField::generate(2.0, 500);
        let b = SphereField::generate(2.0, 500);
        assert_eq!(a.positions(), b.positions());
        assert_eq!(a.classes(), b.classes());
    }

    #[test]
    fn sphere_spiral_runs_pole_to_pole() {
        let field = SphereField::generate(3.0, 100);
        let first = field.positions()[0];
        let last = field.positions()[99];
        assert!((first.y - 3.0).abs() < 1e-5);
        assert!((last.y + 3.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_poles_are_ice() {
        let field = SphereField::generate(1.0, 800);
        for (p, class) in field.positions().iter().zip(field.classes()) {
            if p.y.abs() > EARTH_POLAR_CUTOFF {
                assert_eq!(*class, SurfaceClass::Polar);
            } else {
                assert_ne!(*class, SurfaceClass::Polar);
            }
        }
    }

    #[test]
    fn classify_uses_unit_coordinates() {
        // Classification must not depend on the radius the field is scaled to.
        let small = SphereField::generate(1.0, 400);
        let big = SphereField::generate(250.0, 400);
        assert_eq!(small.classes(), big.classes());
    }

    #[test]
    fn classify_noise_thresholds() {
        // sin(5x)·cos(0)·sin(5z) with x = z ≈ 0.314 gives sin(π/2)² = 1 → land.
        let q = std::f32::consts::FRAC_PI_2 / EARTH_NOISE_FREQUENCY;
        assert_eq!(SurfaceClass::classify(Vec3::new(q, 0.0, q)), SurfaceClass::Land);
        // Noise is zero on the equator at x = 0 → ocean.
        assert_eq!(SurfaceClass::classify(Vec3::new(0.0, 0.0, 1.0)), SurfaceClass::Ocean);
        assert_eq!(SurfaceClass::classify(Vec3::new(0.0, -0.9, 0.1)), SurfaceClass::Polar);
    }

    #[test]
    fn colors_match_classes() {
        let field = SphereField::generate(1.0, 200);
        for (color, class) in field.colors().iter().zip(field.classes()) {
            assert_eq!(*color, class.color());
        }
    }
}
