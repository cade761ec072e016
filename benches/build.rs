use criterion::{criterion_group, criterion_main, Criterion, black_box};

use bulbtree::gpu::pack_octree;
use bulbtree::octree::{classify, NodeGeometry, OctreeBuilder, OctreeConfig};
use bulbtree::sdf::{Mandelbulb, Sphere};
use bulbtree::storage::{compress_octree, decompress_octree};

use glam::Vec3;

fn bench_sphere_build(c: &mut Criterion) {
    let sphere = Sphere::at_origin(2.0);
    let config = OctreeConfig::new(Vec3::ZERO, 8.0, 0.05);

    c.bench_function("sphere_build_min_leaf_0.05", |b| {
        b.iter(|| {
            let builder = OctreeBuilder::new(&sphere, black_box(config.clone())).unwrap();
            builder.build()
        });
    });
}

fn bench_bulb_build_serial(c: &mut Criterion) {
    let bulb = Mandelbulb::default();
    let config = OctreeConfig::new(Vec3::ZERO, 1.5, 0.05).with_parallel(false);

    c.bench_function("bulb_build_serial", |b| {
        b.iter(|| {
            let builder = OctreeBuilder::new(&bulb, black_box(config.clone())).unwrap();
            builder.build()
        });
    });
}

fn bench_bulb_build_parallel(c: &mut Criterion) {
    let bulb = Mandelbulb::default();
    let config = OctreeConfig::new(Vec3::ZERO, 1.5, 0.05).with_parallel(true);

    c.bench_function("bulb_build_parallel", |b| {
        b.iter(|| {
            let builder = OctreeBuilder::new(&bulb, black_box(config.clone())).unwrap();
            builder.build()
        });
    });
}

fn bench_bulb_classify(c: &mut Criterion) {
    let bulb = Mandelbulb::default();
    // Ambiguous band, exercises the gradient tier
    let region = NodeGeometry::new(Vec3::splat(0.75), 0.2);

    c.bench_function("bulb_classify", |b| {
        b.iter(|| classify(&bulb, black_box(&region)));
    });
}

fn bench_pack_and_compress(c: &mut Criterion) {
    let bulb = Mandelbulb::default();
    let tree = OctreeBuilder::new(&bulb, OctreeConfig::new(Vec3::ZERO, 1.5, 0.05))
        .unwrap()
        .build();

    c.bench_function("pack_octree", |b| {
        b.iter(|| pack_octree(black_box(&tree)));
    });

    c.bench_function("compress_octree", |b| {
        b.iter(|| compress_octree(black_box(&tree)).unwrap());
    });

    let compressed = compress_octree(&tree).unwrap();
    c.bench_function("decompress_octree", |b| {
        b.iter(|| decompress_octree(black_box(&compressed)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_sphere_build,
    bench_bulb_build_serial,
    bench_bulb_build_parallel,
    bench_bulb_classify,
    bench_pack_and_compress,
);
criterion_main!(benches);
