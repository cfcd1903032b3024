//! Scene composition: places Earth, the ring and the stars and turns them into voxel instances.

use crate::config::ViewerConfig;
use glam::{Mat4, Quat, Vec3};
use procgen::{
    earth_voxel_size, ring_voxel_rotation, ring_voxel_size, RingField, RingGenerator, SphereField,
    StarField, VoxelField, EARTH_RADIUS, STAR_SHELL_DEPTH, STAR_SHELL_RADIUS, STAR_VOXEL_SIZE,
};
use rand::prelude::*;
use renderer::InstanceData;
use std::sync::Arc;

/// Gap between the ring's outer edge and Earth's centre, in Earth radii.
pub const EARTH_OFFSET: f32 = 5.0;

pub struct SceneComposer {
    earth: SphereField,
    ring: Arc<RingField>,
    ring_width: f32,
    stars: StarField,
    generator: RingGenerator,
}

impl SceneComposer {
    pub fn new(config: &ViewerConfig, ring_radius: f32) -> Self {
        let earth = SphereField::generate(EARTH_RADIUS, config.earth_voxels);

        let mut generator = match config.ring_seed {
            Some(seed) => RingGenerator::seeded(config.ring_voxels, seed),
            None => RingGenerator::shimmer(config.ring_voxels),
        };
        let ring = generator.generate(ring_radius, config.ring_width);

        let mut star_rng = match config.ring_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(1)),
            None => StdRng::from_entropy(),
        };
        let stars = StarField::generate(config.star_count, STAR_SHELL_RADIUS, STAR_SHELL_DEPTH, &mut star_rng);

        log::info!(
            "Scene ready: {} earth, {} ring, {} star voxels ({:?} terrain)",
            earth.len(),
            ring.len(),
            stars.len(),
            generator.terrain()
        );

        Self {
            earth,
            ring,
            ring_width: config.ring_width,
            stars,
            generator,
        }
    }

    /// Regenerate the ring for a new radius. Returns `false` if the radius is unchanged.
    pub fn set_ring_radius(&mut self, radius: f32) -> bool {
        if radius == self.ring.radius {
            return false;
        }
        self.ring = self.generator.generate(radius, self.ring_width);
        true
    }

    pub fn ring(&self) -> &RingField {
        &self.ring
    }

    /// Earth hovers just outside the ring on +X.
    pub fn earth_position(&self) -> Vec3 {
        Vec3::new(self.ring.radius + EARTH_OFFSET, 0.0, 0.0)
    }

    pub fn instance_count(&self) -> usize {
        self.earth.len() + self.ring.len() + self.stars.len()
    }

    /// Every voxel as a GPU instance: Earth, then the ring, then the unlit stars.
    /// The backdrop goes last so it is what a renderer short on slots drops.
    pub fn instances(&self) -> Vec<InstanceData> {
        let mut instances = Vec::with_capacity(self.instance_count());

        let earth_scale = Vec3::splat(earth_voxel_size(self.earth.radius));
        let earth_origin = self.earth_position();
        instances.extend(self.earth.points().map(|p| {
            InstanceData::lit(
                Mat4::from_scale_rotation_translation(earth_scale, Quat::IDENTITY, earth_origin + p.position),
                p.color,
            )
        }));

        let ring_scale = Vec3::splat(ring_voxel_size(self.ring.radius));
        instances.extend(self.ring.points().zip(self.ring.angles()).map(|(p, &theta)| {
            InstanceData::lit(
                Mat4::from_scale_rotation_translation(ring_scale, ring_voxel_rotation(theta), p.position),
                p.color,
            )
        }));

        let star_scale = Vec3::splat(STAR_VOXEL_SIZE);
        instances.extend(self.stars.points().map(|p| {
            InstanceData::emissive(Mat4::from_scale_rotation_translation(star_scale, Quat::IDENTITY, p.position), p.color)
        }));

        instances
    }
}
