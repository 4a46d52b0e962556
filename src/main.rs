use bevy::prelude::*;
use bevy::window::{PresentMode, WindowResolution};
use std::error::Error;

use terrain_explorer::explorer::{ExplorerPlugin, ExplorerState};
use terrain_explorer::world::{ExplorerConfig, TerrainWorld, WorldMode};

/// Usage: `terrain_explorer [config.json] [finite|infinite]`
fn main() -> Result<(), Box<dyn Error>> {
    let mut config = ExplorerConfig::default();
    let mut mode_override = None;

    for arg in std::env::args().skip(1) {
        match arg.parse::<WorldMode>() {
            Ok(mode) => mode_override = Some(mode),
            Err(_) => config = ExplorerConfig::load(&arg)?,
        }
    }
    if let Some(mode) = mode_override {
        config.mode = mode;
    }

    let world = TerrainWorld::new(config.world_settings())?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "World explorer".into(),
                resolution: WindowResolution::new(config.width as f32, config.height as f32),
                present_mode: PresentMode::AutoVsync,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ExplorerState::new(world))
        .insert_resource(config)
        .add_plugins(ExplorerPlugin)
        .run();

    Ok(())
}
