//! Persistence of built octrees

pub mod disk_io;

pub use disk_io::{
    compress_octree, decompress_octree, deserialize_octree, load_octree, save_octree,
    serialize_octree, OctreeSnapshot, SnapshotNode, OCTREE_FILE_EXTENSION, SNAPSHOT_VERSION,
};
