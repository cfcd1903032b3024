//! Shared shape of a generated voxel field.

use engine_core::Rgb;
use glam::Vec3;

/// One voxel: where it sits and what colour it is. Never mutated after generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelPoint {
    pub position: Vec3,
    pub color: Rgb,
}

/// A fixed-size point cloud: index `i` of `positions()` and `colors()` describe the
/// same voxel. The scene builds GPU instances from `points()`; the flat arrays are
/// the export form for consumers that want plain `f32` buffers.
pub trait VoxelField {
    fn positions(&self) -> &[Vec3];
    fn colors(&self) -> &[Rgb];

    fn len(&self) -> usize {
        self.positions().len()
    }

    fn is_empty(&self) -> bool {
        self.positions().is_empty()
    }

    fn points(&self) -> impl Iterator<Item = VoxelPoint> + '_ {
        self.positions()
            .iter()
            .zip(self.colors())
            .map(|(&position, &color)| VoxelPoint { position, color })
    }

    /// Positions as `[x0, y0, z0, x1, ...]`.
    fn flat_positions(&self) -> Vec<f32> {
        self.positions().iter().flat_map(|p| p.to_array()).collect()
    }

    /// Colours as `[r0, g0, b0, r1, ...]`.
    fn flat_colors(&self) -> Vec<f32> {
        self.colors().iter().flat_map(|c| c.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        positions: Vec<Vec3>,
        colors: Vec<Rgb>,
    }

    impl VoxelField for Pair {
        fn positions(&self) -> &[Vec3] {
            &self.positions
        }

        fn colors(&self) -> &[Rgb] {
            &self.colors
        }
    }

    #[test]
    fn flat_arrays_interleave_components() {
        let field = Pair {
            positions: vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)],
            colors: vec![Rgb::WHITE, Rgb::new(0.5, 0.25, 0.0)],
        };
        assert_eq!(field.len(), 2);
        assert_eq!(field.flat_positions(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(field.flat_colors(), vec![1.0, 1.0, 1.0, 0.5, 0.25, 0.0]);
        let second = field.points().nth(1).unwrap();
        assert_eq!(second.position, Vec3::new(4.0, 5.0, 6.0));
    }
}
