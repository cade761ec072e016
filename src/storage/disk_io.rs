//! Octree snapshot serialization and disk I/O

use std::path::Path;

use rkyv::{Archive, Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::core::types::Vec3;
use crate::octree::{ChildLink, NodeGeometry, NodeTopology, SdfOctree};

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// File extension for octree snapshots
pub const OCTREE_FILE_EXTENSION: &str = "bsvo";

/// One node, both records flattened
#[derive(Clone, Copy, Debug, PartialEq, Archive, Deserialize, Serialize)]
pub struct SnapshotNode {
    pub parent: u32,
    pub first_child: Option<u32>,
    pub centre: [f32; 3],
    pub half_length: f32,
}

/// Serializable form of an [`SdfOctree`]
#[derive(Clone, Debug, PartialEq, Archive, Deserialize, Serialize)]
pub struct OctreeSnapshot {
    pub version: u32,
    pub root_half_length: f32,
    pub min_leaf_size: f32,
    pub nodes: Vec<SnapshotNode>,
}

impl From<&SdfOctree> for OctreeSnapshot {
    fn from(tree: &SdfOctree) -> Self {
        let nodes = tree
            .topology()
            .iter()
            .zip(tree.geometry())
            .map(|(topo, geo)| SnapshotNode {
                parent: topo.parent,
                first_child: topo.first_child(),
                centre: geo.centre.to_array(),
                half_length: geo.half_length,
            })
            .collect();

        Self {
            version: SNAPSHOT_VERSION,
            root_half_length: tree.root_half_length(),
            min_leaf_size: tree.min_leaf_size(),
            nodes,
        }
    }
}

impl OctreeSnapshot {
    /// Rebuild the tree, re-checking its invariants
    pub fn into_tree(self) -> Result<SdfOctree> {
        if self.version != SNAPSHOT_VERSION {
            return Err(Error::Serialization(format!(
                "unsupported snapshot version {} (expected {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        if self.nodes.first().map(|root| root.half_length) != Some(self.root_half_length) {
            return Err(Error::InvalidTree("root half length does not match header".into()));
        }

        let (topology, geometry) = self
            .nodes
            .into_iter()
            .map(|node| {
                let children = match node.first_child {
                    Some(first_child) => ChildLink::Internal { first_child },
                    None => ChildLink::Leaf,
                };
                (
                    NodeTopology { parent: node.parent, children },
                    NodeGeometry::new(Vec3::from_array(node.centre), node.half_length),
                )
            })
            .unzip();

        SdfOctree::from_parts(topology, geometry, self.min_leaf_size)
    }
}

/// Serialize a tree to bytes (uncompressed)
pub fn serialize_octree(tree: &SdfOctree) -> Result<Vec<u8>> {
    let snapshot = OctreeSnapshot::from(tree);
    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&snapshot)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    Ok(bytes.to_vec())
}

/// Deserialize a tree from bytes (uncompressed)
pub fn deserialize_octree(data: &[u8]) -> Result<SdfOctree> {
    // rkyv validates alignment; a plain byte slice carries no guarantee
    let mut aligned = rkyv::util::AlignedVec::<16>::with_capacity(data.len());
    aligned.extend_from_slice(data);

    let archived = rkyv::access::<ArchivedOctreeSnapshot, rkyv::rancor::Error>(&aligned)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    let snapshot = rkyv::deserialize::<OctreeSnapshot, rkyv::rancor::Error>(archived)
        .map_err(|e| Error::Serialization(e.to_string()))?;

    snapshot.into_tree()
}

/// Serialize and LZ4-compress a tree
pub fn compress_octree(tree: &SdfOctree) -> Result<Vec<u8>> {
    let serialized = serialize_octree(tree)?;
    Ok(lz4_flex::compress_prepend_size(&serialized))
}

/// Decompress and deserialize a tree
pub fn decompress_octree(data: &[u8]) -> Result<SdfOctree> {
    let decompressed = lz4_flex::decompress_size_prepended(data)
        .map_err(|e| Error::Serialization(format!("LZ4 decompression failed: {}", e)))?;
    deserialize_octree(&decompressed)
}

/// Save a tree to disk (compressed), creating parent directories
pub fn save_octree(path: &Path, tree: &SdfOctree) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let compressed = compress_octree(tree)?;
    std::fs::write(path, &compressed)?;

    log::info!("Saved {} nodes to {} ({} bytes)", tree.node_count(), path.display(), compressed.len());
    Ok(())
}

/// Load a tree saved with [`save_octree`]
pub fn load_octree(path: &Path) -> Result<SdfOctree> {
    let compressed = std::fs::read(path)?;
    let tree = decompress_octree(&compressed)?;

    log::debug!("Loaded {} nodes from {}", tree.node_count(), path.display());
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::octree::{OctreeBuilder, OctreeConfig};
    use crate::sdf::{Mandelbulb, Sphere};
    use tempfile::TempDir;

    fn sphere_tree() -> SdfOctree {
        let sphere = Sphere::at_origin(2.0);
        OctreeBuilder::new(&sphere, OctreeConfig::new(Vec3::ZERO, 8.0, 1.0))
            .expect("valid config")
            .build()
    }

    #[test]
    fn test_compressed_round_trip() {
        let bulb = Mandelbulb::default();
        let tree = OctreeBuilder::new(&bulb, OctreeConfig::new(Vec3::ZERO, 1.5, 0.1))
            .expect("valid config")
            .build();

        let compressed = compress_octree(&tree).expect("compress failed");
        let restored = decompress_octree(&compressed).expect("decompress failed");
        assert_eq!(restored, tree);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let path = temp_dir.path().join("trees").join(format!("sphere.{}", OCTREE_FILE_EXTENSION));

        let tree = sphere_tree();
        save_octree(&path, &tree).expect("save failed");
        assert!(path.exists());

        let loaded = load_octree(&path).expect("load failed");
        assert_eq!(loaded.node_count(), 137);
        assert_eq!(loaded, tree);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let result = load_octree(&temp_dir.path().join("missing.bsvo"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let mut snapshot = OctreeSnapshot::from(&sphere_tree());
        snapshot.version = 99;
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&snapshot).expect("serialize failed");
        assert!(matches!(deserialize_octree(&bytes), Err(Error::Serialization(_))));
    }

    #[test]
    fn test_rejects_tampered_nodes() {
        let mut snapshot = OctreeSnapshot::from(&sphere_tree());
        snapshot.nodes[4].half_length = 0.5;
        let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&snapshot).expect("serialize failed");
        assert!(matches!(deserialize_octree(&bytes), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(decompress_octree(&[1, 2, 3]).is_err());
        assert!(deserialize_octree(&[0u8; 3]).is_err());
    }
}
