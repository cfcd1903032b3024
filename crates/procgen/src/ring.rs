//! The Orbital as a band of voxels swept around the Z axis.
//!
//! Angles are spaced evenly; the position across the plate width is jittered at
//! random, and so is part of the terrain noise. Features sit at a radial offset
//! *inward* from the floor radius, since "up" on a spun habitat points toward the
//! rotation axis: sea at the floor, land 2 units in, rim walls 5, clouds 15.
//!
//! Randomness is drawn from the caller's RNG. [`RingGenerator`] decides whether that
//! RNG is fresh on every call (shimmering terrain) or replayed from a seed (stable
//! terrain, cached per radius and width).

use crate::field::VoxelField;
use engine_core::Rgb;
use glam::{Quat, Vec3};
use rand::prelude::*;
use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};
use std::sync::Arc;

/// Default voxel count for the ring.
pub const RING_VOXEL_COUNT: usize = 4000;
/// Default plate width in scene units (a continent-sized band, ~0.75 Earth diameters).
pub const RING_WIDTH: f32 = 1.5;

/// Fraction of the width, measured from the centre line, beyond which voxels are rim wall.
pub const RING_WALL_BAND: f32 = 0.45;
/// Noise value above which a non-wall voxel is land.
pub const RING_LAND_CUTOFF: f32 = 0.5;
/// Amplitude of the random term added to the terrain noise.
pub const RING_NOISE_JITTER: f32 = 0.2;
/// Chance that a land voxel is lifted into the cloud layer instead.
pub const RING_CLOUD_CHANCE: f32 = 0.05;
/// Ring radius per unit of voxel edge length; voxels never shrink below 1.
pub const RING_VOXEL_DIVISOR: f32 = 800.0;

const TERRAIN_FREQUENCY: f32 = 50.0;
const ACROSS_FREQUENCY: f32 = 0.5;

/// Seeded fields kept per (radius, width) before the cache is flushed.
const RING_CACHE_CAPACITY: usize = 128;

/// What a ring voxel represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingFeature {
    Sea,
    Land,
    Wall,
    Cloud,
}

impl RingFeature {
    /// Offset from the floor radius. Negative values point toward the axis.
    pub fn radial_offset(self) -> f32 {
        match self {
            RingFeature::Sea => 0.0,
            RingFeature::Land => -2.0,
            RingFeature::Wall => -5.0,
            RingFeature::Cloud => -15.0,
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            RingFeature::Sea => Rgb::from_hex(0x0EA5E9),
            RingFeature::Land => Rgb::from_hex(0x22C55E),
            RingFeature::Wall => Rgb::from_hex(0x64748B),
            RingFeature::Cloud => Rgb::from_hex(0xFFFFFF),
        }
    }

    /// Classify one sample.
    ///
    /// - `z`: offset across the plate, in `[-width/2, width/2]`
    /// - `noise`: terrain noise including its random term
    /// - `cloud_roll`: uniform sample in `[0, 1)`, only consulted for land
    pub fn classify(z: f32, width: f32, noise: f32, cloud_roll: f32) -> Self {
        if z.abs() > RING_WALL_BAND * width {
            RingFeature::Wall
        } else if noise > RING_LAND_CUTOFF {
            if cloud_roll > 1.0 - RING_CLOUD_CHANCE {
                RingFeature::Cloud
            } else {
                RingFeature::Land
            }
        } else {
            RingFeature::Sea
        }
    }
}

/// Voxel edge length for a ring of `radius`. One size for the whole ring.
pub fn ring_voxel_size(radius: f32) -> f32 {
    (radius / RING_VOXEL_DIVISOR).max(1.0)
}

/// Rotation about the ring normal (+Z) that lines a voxel's face up with the local tangent.
pub fn ring_voxel_rotation(theta: f32) -> Quat {
    Quat::from_rotation_z(theta + FRAC_PI_2)
}

/// A generated ring band, centred at the origin in the XY plane.
#[derive(Debug, Clone)]
pub struct RingField {
    pub radius: f32,
    pub width: f32,
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    angles: Vec<f32>,
    features: Vec<RingFeature>,
}

impl RingField {
    /// Generate `count` voxels around a full turn. A non-positive width gives a flat ring.
    pub fn generate<R: Rng + ?Sized>(radius: f32, width: f32, count: usize, rng: &mut R) -> Self {
        let width = width.max(0.0);

        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        let mut angles = Vec::with_capacity(count);
        let mut features = Vec::with_capacity(count);

        for i in 0..count {
            let theta = (i as f32 / count as f32) * TAU;
            let z = (rng.gen::<f32>() - 0.5) * width;
            let noise = (theta * TERRAIN_FREQUENCY).sin() * (z * ACROSS_FREQUENCY).cos()
                + rng.gen::<f32>() * RING_NOISE_JITTER;
            let cloud_roll = rng.gen::<f32>();

            let feature = RingFeature::classify(z, width, noise, cloud_roll);
            let r = radius + feature.radial_offset();

            positions.push(Vec3::new(theta.cos() * r, theta.sin() * r, z));
            colors.push(feature.color());
            angles.push(theta);
            features.push(feature);
        }

        log::debug!(
            "Generated ring field: {} voxels, radius {:.1}, width {:.2}",
            count,
            radius,
            width
        );

        Self { radius, width, positions, colors, angles, features }
    }

    /// Angle around the ring of each voxel, for orienting instances.
    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    pub fn features(&self) -> &[RingFeature] {
        &self.features
    }

    pub fn count(&self, feature: RingFeature) -> usize {
        self.features.iter().filter(|&&f| f == feature).count()
    }
}

impl VoxelField for RingField {
    fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

/// How ring terrain behaves across regenerations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingTerrain {
    /// Fresh randomness on every regeneration.
    Shimmer,
    /// Replayed from a fixed seed; identical for identical (radius, width).
    Seeded(u64),
}

/// Owns the RNG (and, for seeded terrain, a cache) behind ring regeneration.
pub struct RingGenerator {
    count: usize,
    terrain: RingTerrain,
    rng: StdRng,
    cache: HashMap<(u32, u32), Arc<RingField>>,
}

impl RingGenerator {
    pub fn new(count: usize, terrain: RingTerrain) -> Self {
        let rng = match terrain {
            RingTerrain::Shimmer => StdRng::from_entropy(),
            RingTerrain::Seeded(seed) => StdRng::seed_from_u64(seed),
        };
        Self { count, terrain, rng, cache: HashMap::new() }
    }

    pub fn shimmer(count: usize) -> Self {
        Self::new(count, RingTerrain::Shimmer)
    }

    pub fn seeded(count: usize, seed: u64) -> Self {
        Self::new(count, RingTerrain::Seeded(seed))
    }

    pub fn terrain(&self) -> RingTerrain {
        self.terrain
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Build the field for (radius, width) from scratch, or fetch it from the cache
    /// when terrain is seeded.
    pub fn generate(&mut self, radius: f32, width: f32) -> Arc<RingField> {
        match self.terrain {
            RingTerrain::Shimmer => {
                Arc::new(RingField::generate(radius, width, self.count, &mut self.rng))
            }
            RingTerrain::Seeded(seed) => {
                let key = (radius.to_bits(), width.to_bits());
                if let Some(field) = self.cache.get(&key) {
                    log::trace!("Ring cache hit for radius {:.2}", radius);
                    return Arc::clone(field);
                }
                if self.cache.len() >= RING_CACHE_CAPACITY {
                    log::debug!("Ring cache full ({} fields), flushing", self.cache.len());
                    self.cache.clear();
                }
                self.rng = StdRng::seed_from_u64(seed);
                let field = Arc::new(RingField::generate(radius, width, self.count, &mut self.rng));
                self.cache.insert(key, Arc::clone(&field));
                field
            }
        }
    }

    pub fn cached_fields(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(radius: f32, width: f32, seed: u64) -> RingField {
        let mut rng = StdRng::seed_from_u64(seed);
        RingField::generate(radius, width, RING_VOXEL_COUNT, &mut rng)
    }

    #[test]
    fn ring_exact_count() {
        for count in [1, 7, 4000] {
            let mut rng = StdRng::seed_from_u64(1);
            let f = RingField::generate(15.0, 1.5, count, &mut rng);
            assert_eq!(f.len(), count);
            assert_eq!(f.angles().len(), count);
            assert_eq!(f.colors().len(), count);
        }
    }

    #[test]
    fn ring_radius_matches_feature_offset() {
        for (radius, width) in [(15.0, 1.5), (350.0, 1.5), (100.0, 0.0), (40.0, 20.0)] {
            let f = field(radius, width, 7);
            for (p, feature) in f.positions().iter().zip(f.features()) {
                let projected = p.truncate().length();
                let expected = radius + feature.radial_offset();
                assert!(
                    (projected - expected).abs() < 1e-3 * radius.max(1.0),
                    "{:?} at radius {} should be {}",
                    feature,
                    projected,
                    expected
                );
            }
        }
    }

    #[test]
    fn ring_walls_sit_outside_band() {
        let width = 1.5;
        let f = field(50.0, width, 99);
        assert!(f.count(RingFeature::Wall) > 0);
        for (p, feature) in f.positions().iter().zip(f.features()) {
            if *feature == RingFeature::Wall {
                assert!(p.z.abs() > RING_WALL_BAND * width);
            } else {
                assert!(p.z.abs() <= RING_WALL_BAND * width);
            }
        }
    }

    #[test]
    fn ring_zero_width_is_flat_and_wall_free() {
        let f = field(30.0, 0.0, 3);
        assert!(f.positions().iter().all(|p| p.z == 0.0));
        assert_eq!(f.count(RingFeature::Wall), 0);
    }

    #[test]
    fn ring_negative_width_degenerates_to_flat() {
        let f = field(30.0, -4.0, 3);
        assert_eq!(f.width, 0.0);
        assert!(f.positions().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn ring_angles_evenly_spaced() {
        let f = field(15.0, 1.5, 5);
        let step = TAU / RING_VOXEL_COUNT as f32;
        for (i, theta) in f.angles().iter().enumerate() {
            assert!((theta - step * i as f32).abs() < 1e-4);
        }
    }

    #[test]
    fn ring_has_every_feature() {
        let f = field(350.0, 1.5, 11);
        for feature in [RingFeature::Sea, RingFeature::Land, RingFeature::Wall, RingFeature::Cloud] {
            assert!(f.count(feature) > 0, "no {:?} voxels", feature);
        }
    }

    #[test]
    fn classify_wall_wins_over_land() {
        assert_eq!(RingFeature::classify(0.7, 1.5, 0.9, 0.0), RingFeature::Wall);
        assert_eq!(RingFeature::classify(0.0, 1.5, 0.9, 0.0), RingFeature::Land);
        assert_eq!(RingFeature::classify(0.0, 1.5, 0.9, 0.99), RingFeature::Cloud);
        assert_eq!(RingFeature::classify(0.0, 1.5, 0.5, 0.99), RingFeature::Sea);
    }

    #[test]
    fn voxel_size_floor_is_one() {
        assert_eq!(ring_voxel_size(15.0), 1.0);
        assert_eq!(ring_voxel_size(350.0), 1.0);
        assert_eq!(ring_voxel_size(1600.0), 2.0);
    }

    #[test]
    fn voxel_rotation_faces_tangent() {
        // At θ = 0 the tangent is +Y; the rotated +X axis should point along it.
        let x = ring_voxel_rotation(0.0) * Vec3::X;
        assert!((x - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn shimmer_regenerates_fresh_terrain() {
        let mut generator = RingGenerator::shimmer(RING_VOXEL_COUNT);
        let a = generator.generate(20.0, 1.5);
        let b = generator.generate(20.0, 1.5);
        assert_ne!(a.positions(), b.positions());
        assert_eq!(generator.cached_fields(), 0);
    }

    #[test]
    fn seeded_terrain_is_stable_and_cached() {
        let mut generator = RingGenerator::seeded(500, 42);
        let a = generator.generate(20.0, 1.5);
        let _ = generator.generate(21.0, 1.5);
        let b = generator.generate(20.0, 1.5);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(generator.cached_fields(), 2);

        let mut other = RingGenerator::seeded(500, 42);
        let c = other.generate(20.0, 1.5);
        assert_eq!(a.positions(), c.positions());
    }

    #[test]
    fn seeded_terrain_keeps_layout_across_radii() {
        let mut generator = RingGenerator::seeded(300, 8);
        let small = generator.generate(15.0, 1.5);
        let large = generator.generate(350.0, 1.5);
        assert_eq!(small.features(), large.features());
    }

    #[test]
    fn seeded_cache_is_bounded() {
        let mut generator = RingGenerator::seeded(4, 1);
        for i in 0..(RING_CACHE_CAPACITY + 10) {
            generator.generate(15.0 + i as f32, 1.5);
        }
        assert!(generator.cached_fields() <= RING_CACHE_CAPACITY);
    }
}
