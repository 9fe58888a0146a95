//! Throughput benchmark for CellWorld::update across lattice sizes

use std::time::Instant;
use cell_world::{CellWorld, WorldConfig, domain::{BriansBrain, LifeRule, Rule, State}};

fn lattice(size: u32) -> WorldConfig {
    WorldConfig {
        width: size,
        height: size,
        cell_size: 1,
        gap: 0,
        ..Default::default()
    }
}

/// Average milliseconds per generation
fn benchmark(size: u32, iterations: u32, rule: Box<dyn Rule>) -> f64 {
    let config = lattice(size);
    let mut world = match CellWorld::new(rule, &config) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("Failed to build {}x{} world: {}", size, size, e);
            return f64::NAN;
        }
    };
    world.randomize(config.random_fill);

    let start = Instant::now();
    for _ in 0..iterations {
        world.update();
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("=== CellWorld Update Benchmark ===\n");

    let sizes = [64, 128, 256, 512, 1024];
    let iterations = 20;
    let palette = WorldConfig::default().palette;

    println!("{:>10} {:>12} {:>12} {:>16}", "Size", "Conway", "BriansBrain", "Cells/sec");
    println!("{:-<54}", "");

    for size in sizes {
        let conway_ms = benchmark(size, iterations, Box::new(LifeRule::conway(&palette)));
        let brain_ms = benchmark(size, iterations, Box::new(BriansBrain::new(&palette, State::RED)));
        let cells = (size * size) as f64;

        println!(
            "{:>10} {:>12.2} {:>12.2} {:>15.1}M",
            format!("{}x{}", size, size),
            conway_ms,
            brain_ms,
            cells / (conway_ms / 1000.0) / 1_000_000.0
        );
    }
}
