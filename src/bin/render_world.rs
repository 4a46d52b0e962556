use rand::Rng;
use std::error::Error;
use std::path::PathBuf;

use terrain_explorer::world::{
    Command, ExplorerConfig, ScrollDirection, TerrainWorld, WorldMode,
};

const USAGE: &str = "usage: render_world [--config FILE] [--mode finite|infinite] \
[--seed N|random] [--size WxH] [--pan DIR:PX]... [--heightmap] [--out FILE]";

struct Options {
    config: ExplorerConfig,
    seed: Option<i64>,
    pans: Vec<(ScrollDirection, u32)>,
    heightmap: bool,
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = parse_args(std::env::args().skip(1))?;

    let mut config = options.config;
    if let Some(seed) = options.seed {
        match config.mode {
            WorldMode::Finite => config.finite.seed = seed,
            WorldMode::Infinite => config.infinite.seed = seed,
        }
    }

    println!(
        "Rendering {} world {}x{}",
        config.mode.label(),
        config.width,
        config.height
    );

    let mut world = TerrainWorld::new(config.world_settings())?;
    for (direction, speed) in &options.pans {
        let outcome = world.apply(Command::Pan(*direction, *speed))?;
        println!("  pan {:?} {}px -> {:?}", direction, speed, outcome);
    }

    let water = world
        .buffer()
        .water_ratio(world.sampler().classifier());
    println!("  Seed        : {}", world.seed());
    println!("  Offset      : {:?}", world.offset());
    println!("  Water cover : {:.1}%", water * 100.0);

    if options.heightmap {
        world.heightmap().save(&options.output)?;
    } else {
        world.export_png(&options.output)?;
    }
    println!("Wrote {}", options.output.display());

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, Box<dyn Error>> {
    let mut config = ExplorerConfig::default();
    let mut mode = None;
    let mut size = None;
    let mut seed = None;
    let mut pans = Vec::new();
    let mut heightmap = false;
    let mut output = PathBuf::from("terrain.png");

    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{arg} expects a value\n{USAGE}"));
        match arg.as_str() {
            "--config" => config = ExplorerConfig::load(value()?)?,
            "--mode" => mode = Some(value()?.parse::<WorldMode>()?),
            "--seed" => {
                let raw = value()?;
                seed = Some(if raw == "random" {
                    rand::thread_rng().gen_range(-10_000..=10_000)
                } else {
                    raw.parse::<i64>()?
                });
            }
            "--size" => size = Some(parse_size(&value()?)?),
            "--pan" => pans.push(parse_pan(&value()?)?),
            "--heightmap" => heightmap = true,
            "--out" => output = PathBuf::from(value()?),
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument `{other}`\n{USAGE}").into()),
        }
    }

    // Flags win over whatever the config file said.
    if let Some(mode) = mode {
        config.mode = mode;
    }
    if let Some((width, height)) = size {
        config.width = width;
        config.height = height;
    }

    Ok(Options {
        config,
        seed,
        pans,
        heightmap,
        output,
    })
}

fn parse_size(raw: &str) -> Result<(u32, u32), Box<dyn Error>> {
    let (width, height) = raw
        .split_once('x')
        .ok_or_else(|| format!("size `{raw}` is not WIDTHxHEIGHT"))?;
    Ok((width.parse()?, height.parse()?))
}

fn parse_pan(raw: &str) -> Result<(ScrollDirection, u32), Box<dyn Error>> {
    let (direction, speed) = raw
        .split_once(':')
        .ok_or_else(|| format!("pan `{raw}` is not DIRECTION:PIXELS"))?;
    let direction = match direction.to_ascii_lowercase().as_str() {
        "up" => ScrollDirection::Up,
        "down" => ScrollDirection::Down,
        "left" => ScrollDirection::Left,
        "right" => ScrollDirection::Right,
        other => return Err(format!("unknown pan direction `{other}`").into()),
    };
    Ok((direction, speed.parse()?))
}
