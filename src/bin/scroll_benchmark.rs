use std::time::Instant;
use terrain_explorer::world::defaults;
use terrain_explorer::world::{Command, ScrollDirection, TerrainWorld, WorldSettings};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let size: u32 = 512;
    let speed: u32 = defaults::MOVING_SPEED;
    let repeats: usize = 4;

    println!(
        "Scroll benchmark: {}x{} speed={} repeats={}",
        size, size, speed, repeats
    );

    let mut world = TerrainWorld::new(WorldSettings::infinite(size, size))?;
    let mut pans = Vec::new();
    let mut rebuilds = Vec::new();

    for round in 0..repeats {
        for direction in ScrollDirection::ALL {
            let start = Instant::now();
            world.apply(Command::Pan(direction, speed))?;
            pans.push(start.elapsed().as_secs_f64() * 1000.0);
        }

        let start = Instant::now();
        world.apply(Command::Init)?;
        rebuilds.push(start.elapsed().as_secs_f64() * 1000.0);

        println!("Completed round {}", round + 1);
    }

    report("Incremental pan", &mut pans);
    report("Full rebuild", &mut rebuilds);
    Ok(())
}

fn report(label: &str, durations: &mut [f64]) {
    if durations.is_empty() {
        return;
    }
    durations.sort_by(|a, b| a.total_cmp(b));
    let total = durations.len();
    let avg = durations.iter().sum::<f64>() / total as f64;
    let median = durations[total / 2];
    let min = durations[0];
    let max = durations[total - 1];

    println!("{} ({} samples)", label, total);
    println!(
        "  Avg: {:.2} ms  Median: {:.2} ms  Min: {:.2} ms  Max: {:.2} ms",
        avg, median, min, max
    );
}
