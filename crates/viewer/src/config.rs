//! Viewer configuration (window, scene density, Ship Mind). Loaded from config.ron at startup.

use procgen::{EARTH_VOXEL_COUNT, RING_VOXEL_COUNT, RING_WIDTH, STAR_COUNT};
use serde::{Deserialize, Serialize};
use shipmind::ShipMindConfig;
use std::path::{Path, PathBuf};

/// Persistent viewer settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Orbit drag sensitivity multiplier (1.0 = default).
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    /// Voxels on the Earth sphere (at least 2).
    #[serde(default = "default_earth_voxels")]
    pub earth_voxels: usize,
    /// Voxels around the ring (at least 1).
    #[serde(default = "default_ring_voxels")]
    pub ring_voxels: usize,
    /// Ring plate width in Earth radii.
    #[serde(default = "default_ring_width")]
    pub ring_width: f32,
    #[serde(default = "default_star_count")]
    pub star_count: usize,
    /// Fixed terrain seed. `None` regenerates the ring with fresh randomness on every change.
    #[serde(default)]
    pub ring_seed: Option<u64>,
    #[serde(default)]
    pub ship_mind: ShipMindConfig,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_sensitivity() -> f32 {
    1.0
}
fn default_earth_voxels() -> usize {
    EARTH_VOXEL_COUNT
}
fn default_ring_voxels() -> usize {
    RING_VOXEL_COUNT
}
fn default_ring_width() -> f32 {
    RING_WIDTH
}
fn default_star_count() -> usize {
    STAR_COUNT
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            sensitivity: default_sensitivity(),
            earth_voxels: default_earth_voxels(),
            ring_voxels: default_ring_voxels(),
            ring_width: default_ring_width(),
            star_count: default_star_count(),
            ring_seed: None,
            ship_mind: ShipMindConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::from_ron(&data) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    return config;
                }
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(_) => log::debug!("No config at {:?}, using defaults", path),
        }
        Self::default()
    }

    /// Parse and sanitize a RON document.
    pub fn from_ron(data: &str) -> Result<Self, ron::error::SpannedError> {
        let config: Self = ron::from_str(data)?;
        Ok(config.sanitized())
    }

    /// Clamp values the generators cannot handle.
    pub fn sanitized(mut self) -> Self {
        if self.earth_voxels < 2 {
            log::warn!("earth_voxels {} too small, using 2", self.earth_voxels);
            self.earth_voxels = 2;
        }
        if self.ring_voxels < 1 {
            log::warn!("ring_voxels must be positive, using 1");
            self.ring_voxels = 1;
        }
        if !(self.ring_width >= 0.0) {
            log::warn!("ring_width {} invalid, using 0", self.ring_width);
            self.ring_width = 0.0;
        }
        if !(self.sensitivity > 0.0) {
            self.sensitivity = default_sensitivity();
        }
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
        self
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ViewerConfig::from_ron("()").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.ring_voxels, 4000);
        assert_eq!(config.earth_voxels, 800);
        assert_eq!(config.ring_seed, None);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = ViewerConfig::from_ron(
            "(ring_seed: Some(42), ring_width: 3.0, ship_mind: (model: \"other-model\"))",
        )
        .unwrap();
        assert_eq!(config.ring_seed, Some(42));
        assert_eq!(config.ring_width, 3.0);
        assert_eq!(config.ship_mind.model, "other-model");
        assert_eq!(config.ship_mind.api_key_env, "API_KEY");
        assert_eq!(config.window_width, 1280);
    }

    #[test]
    fn sanitize_raises_counts_and_clamps_width() {
        let config = ViewerConfig::from_ron("(earth_voxels: 1, ring_voxels: 0, ring_width: -2.0)").unwrap();
        assert_eq!(config.earth_voxels, 2);
        assert_eq!(config.ring_voxels, 1);
        assert_eq!(config.ring_width, 0.0);
    }

    #[test]
    fn invalid_document_is_an_error() {
        assert!(ViewerConfig::from_ron("(window_width: \"wide\")").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = ViewerConfig::load_from(Path::new("/nonexistent/orbital/config.ron"));
        assert_eq!(config, ViewerConfig::default());
    }
}
