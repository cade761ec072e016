//! Build configuration for SDF octrees.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::node::NodeGeometry;
use crate::core::{Error, Result};
use crate::core::types::Vec3;

/// Parameters that size and drive one octree build.
///
/// Passed by value into the builder so several builds with different
/// parameters can coexist in one process.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OctreeConfig {
    /// Centre of the root cube
    pub root_centre: [f32; 3],
    /// Half edge length of the root cube
    pub root_half_length: f32,
    /// Nodes with `half_length <= min_leaf_size` are never subdivided
    pub min_leaf_size: f32,
    /// Evaluate each level's containment tests on the rayon pool
    pub parallel: bool,
    /// Smallest frontier worth handing to rayon
    pub parallel_threshold: usize,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            root_centre: [2.0, 2.0, 2.0],
            root_half_length: 6.0,
            min_leaf_size: 0.02,
            parallel: true,
            parallel_threshold: 256,
        }
    }
}

impl OctreeConfig {
    /// Config for a root cube at `centre` with half edge `root_half_length`
    pub fn new(centre: Vec3, root_half_length: f32, min_leaf_size: f32) -> Self {
        Self {
            root_centre: centre.to_array(),
            root_half_length,
            min_leaf_size,
            ..Default::default()
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn root_centre(&self) -> Vec3 {
        Vec3::from_array(self.root_centre)
    }

    /// Geometry of node 0
    pub fn root_geometry(&self) -> NodeGeometry {
        NodeGeometry::new(self.root_centre(), self.root_half_length)
    }

    /// Depth of the deepest possible node, `ceil(log2(root / min_leaf))`.
    ///
    /// Counted by halving so it agrees with the builder's own arithmetic.
    pub fn max_depth(&self) -> u32 {
        let mut half_length = self.root_half_length;
        let mut depth = 0;
        while half_length > self.min_leaf_size {
            half_length /= 2.0;
            depth += 1;
        }
        depth
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.root_centre.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidConfig(format!(
                "root_centre must be finite, got {:?}", self.root_centre
            )));
        }
        if !(self.root_half_length.is_finite() && self.root_half_length > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "root_half_length must be positive and finite, got {}", self.root_half_length
            )));
        }
        if !(self.min_leaf_size.is_finite() && self.min_leaf_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "min_leaf_size must be positive and finite, got {}", self.min_leaf_size
            )));
        }
        Ok(())
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON, creating parent directories
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}
