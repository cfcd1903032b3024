//! Static star backdrop: random points in a thick spherical shell.

use crate::field::VoxelField;
use engine_core::Rgb;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::TAU;

pub const STAR_COUNT: usize = 5000;
pub const STAR_SHELL_RADIUS: f32 = 300.0;
pub const STAR_SHELL_DEPTH: f32 = 50.0;
/// Edge length of one star cube.
pub const STAR_VOXEL_SIZE: f32 = 0.6;

const MIN_BRIGHTNESS: f32 = 0.35;

#[derive(Debug, Clone)]
pub struct StarField {
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
}

impl StarField {
    /// Scatter `count` stars uniformly over directions, at distances in
    /// `[inner_radius, inner_radius + depth]`, with random grey-white brightness.
    pub fn generate<R: Rng + ?Sized>(count: usize, inner_radius: f32, depth: f32, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);

        for _ in 0..count {
            let z: f32 = rng.gen_range(-1.0..=1.0);
            let phi: f32 = rng.gen_range(0.0..TAU);
            let r_xy = (1.0 - z * z).max(0.0).sqrt();
            let direction = Vec3::new(phi.cos() * r_xy, phi.sin() * r_xy, z);
            let distance = inner_radius + rng.gen::<f32>() * depth.max(0.0);
            positions.push(direction * distance);

            let brightness = MIN_BRIGHTNESS + rng.gen::<f32>() * (1.0 - MIN_BRIGHTNESS);
            colors.push(Rgb::WHITE.scaled(brightness));
        }

        log::debug!("Generated star field: {} stars", count);

        Self { positions, colors }
    }
}

impl VoxelField for StarField {
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

    #[test]
    fn stars_stay_inside_shell() {
        let mut rng = StdRng::seed_from_u64(5);
        let stars = StarField::generate(2000, STAR_SHELL_RADIUS, STAR_SHELL_DEPTH, &mut rng);
        assert_eq!(stars.len(), 2000);
        for p in stars.positions() {
            let d = p.length();
            assert!(d >= STAR_SHELL_RADIUS - 1e-2 && d <= STAR_SHELL_RADIUS + STAR_SHELL_DEPTH + 1e-2);
        }
    }

    #[test]
    fn stars_cover_both_hemispheres() {
        let mut rng = StdRng::seed_from_u64(6);
        let stars = StarField::generate(500, 10.0, 0.0, &mut rng);
        assert!(stars.positions().iter().any(|p| p.z > 0.0));
        assert!(stars.positions().iter().any(|p| p.z < 0.0));
    }

    #[test]
    fn star_brightness_never_black() {
        let mut rng = StdRng::seed_from_u64(7);
        let stars = StarField::generate(300, 10.0, 1.0, &mut rng);
        assert!(stars.colors().iter().all(|c| c.r >= MIN_BRIGHTNESS - 1e-6));
    }
}
