//! Octree build utility.
//!
//! Builds the acceleration octree for a distance field and writes the
//! snapshot plus upload-ready GPU buffers to an output directory.

use std::path::PathBuf;
use std::time::Instant;

use bulbtree::core::{logging, Result};
use bulbtree::gpu::pack_octree;
use bulbtree::octree::{OctreeBuilder, OctreeConfig};
use bulbtree::sdf::{DistanceField, Mandelbulb, Sphere};
use bulbtree::storage::{save_octree, OCTREE_FILE_EXTENSION};

const DEFAULT_OUTPUT_DIR: &str = "assets/octree";

#[derive(Debug)]
struct Args {
    config: Option<PathBuf>,
    output_dir: PathBuf,
    root_size: Option<f32>,
    min_leaf: Option<f32>,
    sphere: Option<f32>,
    power: Option<f32>,
    jobs: Option<usize>,
    serial: bool,
    verbose: bool,
}

fn parse_args() -> std::result::Result<Args, String> {
    let mut args = std::env::args().skip(1);

    let mut parsed = Args {
        config: None,
        output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        root_size: None,
        min_leaf: None,
        sphere: None,
        power: None,
        jobs: None,
        serial: false,
        verbose: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" | "--config" => parsed.config = Some(PathBuf::from(value(&mut args, &arg)?)),
            "-o" | "--output" => parsed.output_dir = PathBuf::from(value(&mut args, &arg)?),
            "--root-size" => parsed.root_size = Some(number(&mut args, &arg)?),
            "--min-leaf" => parsed.min_leaf = Some(number(&mut args, &arg)?),
            "--sphere" => parsed.sphere = Some(number(&mut args, &arg)?),
            "--power" => parsed.power = Some(number(&mut args, &arg)?),
            "-j" | "--jobs" => parsed.jobs = Some(number(&mut args, &arg)?),
            "--serial" => parsed.serial = true,
            "-v" | "--verbose" => parsed.verbose = true,
            "-h" | "--help" | "help" => return Err("show_help".to_string()),
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(parsed)
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> std::result::Result<String, String> {
    args.next().ok_or_else(|| format!("{flag} needs a value"))
}

fn number<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> std::result::Result<T, String> {
    let raw = value(args, flag)?;
    raw.parse().map_err(|_| format!("{flag}: invalid value '{raw}'"))
}

fn print_help() {
    println!("Usage: build_octree [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>    JSON octree config (defaults otherwise)");
    println!("  -o, --output <DIR>     Output directory [default: {DEFAULT_OUTPUT_DIR}]");
    println!("      --root-size <F>    Root cube half length");
    println!("      --min-leaf <F>     Minimum leaf half length");
    println!("      --sphere <R>       Use a sphere of radius R instead of the bulb");
    println!("      --power <F>        Bulb exponent [default: 8]");
    println!("  -j, --jobs <N>         Worker threads for per-level containment tests");
    println!("      --serial           Disable parallel containment tests");
    println!("  -v, --verbose          Debug logging");
    println!("  -h, --help             Show this help");
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => OctreeConfig::load_json(path)?,
        None => OctreeConfig::default(),
    };
    if let Some(root_size) = args.root_size {
        config.root_half_length = root_size;
    }
    if let Some(min_leaf) = args.min_leaf {
        config.min_leaf_size = min_leaf;
    }
    if args.serial {
        config.parallel = false;
    }

    if let Some(jobs) = args.jobs {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
            log::warn!("Could not configure thread pool: {}", e);
        }
    }

    let field: Box<dyn DistanceField> = match args.sphere {
        Some(radius) => Box::new(Sphere::new(config.root_centre(), radius)),
        None => Box::new(Mandelbulb::default().with_power(args.power.unwrap_or(8.0))),
    };

    println!("=== Bulbtree Octree Builder ===");
    match args.sphere {
        Some(radius) => println!("Field:    sphere r={}", radius),
        None => println!("Field:    bulb power={}", args.power.unwrap_or(8.0)),
    }
    println!("Root:     centre {:?}, half length {}", config.root_centre, config.root_half_length);
    println!("Min leaf: {} (max depth {})", config.min_leaf_size, config.max_depth());
    println!("Output:   {}", args.output_dir.display());
    println!();

    let builder = OctreeBuilder::new(field.as_ref(), config.clone())?;
    let start = Instant::now();
    let mut build = builder.start();
    while let Some(report) = build.step() {
        log::info!(
            "  depth {:>2}: {:>8} nodes, {:>8} split, {:>9} total",
            report.depth, report.processed, report.subdivided, report.total_nodes
        );
    }
    let tree = build.into_tree();
    let elapsed = start.elapsed();

    let stats = tree.stats();
    println!(
        "Built {} nodes ({} leaves, depth {}) in {:.2}s",
        stats.node_count,
        stats.leaf_count,
        stats.max_depth,
        elapsed.as_secs_f64()
    );

    std::fs::create_dir_all(&args.output_dir)?;
    save_octree(&args.output_dir.join(format!("octree.{}", OCTREE_FILE_EXTENSION)), &tree)?;

    let packed = pack_octree(&tree);
    std::fs::write(args.output_dir.join("topology.bin"), packed.topology_bytes())?;
    std::fs::write(args.output_dir.join("geometry.bin"), packed.geometry_bytes())?;
    std::fs::write(args.output_dir.join("params.bin"), packed.params_bytes())?;
    config.save_json(&args.output_dir.join("config.json"))?;

    println!(
        "GPU buffers: {} KB topology, {} KB geometry",
        packed.topology_bytes().len() / 1024,
        packed.geometry_bytes().len() / 1024
    );

    Ok(())
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) if e == "show_help" => {
            print_help();
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            print_help();
            std::process::exit(2);
        }
    };

    if args.verbose {
        logging::init_with_filter("bulbtree=debug,build_octree=debug");
    } else {
        logging::init();
    }

    if let Err(e) = run(args) {
        log::error!("Octree build failed: {}", e);
        std::process::exit(1);
    }
}
