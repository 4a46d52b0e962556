use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::input::InputPlugin;
use crate::world::{TerrainWorld, WorldMode};

/// Shows a [`TerrainWorld`] as a window-sized texture and keeps it in sync
/// with the commands issued from the keyboard.
pub struct ExplorerPlugin;

impl Plugin for ExplorerPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(InputPlugin)
            .add_systems(Startup, setup_explorer)
            .add_systems(Update, (refresh_map_texture, update_seed_caption));
    }
}

#[derive(Resource)]
pub struct ExplorerState {
    pub world: TerrainWorld,
    pub needs_redraw: bool,
}

impl ExplorerState {
    pub fn new(world: TerrainWorld) -> Self {
        Self {
            world,
            needs_redraw: false,
        }
    }

    pub fn caption(&self) -> String {
        match self.world.mode() {
            WorldMode::Finite => format!("SEED: {}", self.world.seed()),
            WorldMode::Infinite => {
                let (x, y) = self.world.offset();
                format!("SEED: {}   X: {}  Y: {}", self.world.seed(), x, y)
            }
        }
    }
}

#[derive(Resource)]
struct MapTexture(Handle<Image>);

#[derive(Component)]
struct WorldMap;

#[derive(Component)]
struct SeedCaption;

fn setup_explorer(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    state: Res<ExplorerState>,
) {
    let buffer = state.world.buffer();
    // The world is built before the log subscriber exists.
    info!("Opening explorer on {}", state.world.summary());

    let map_image = Image::new(
        Extent3d {
            width: buffer.width(),
            height: buffer.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        buffer.to_rgba_bytes(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    let map_texture = images.add(map_image);

    commands.spawn(Camera2dBundle::default());

    commands.spawn((
        SpriteBundle {
            texture: map_texture.clone(),
            sprite: Sprite {
                custom_size: Some(Vec2::new(buffer.width() as f32, buffer.height() as f32)),
                ..default()
            },
            ..default()
        },
        WorldMap,
    ));

    commands.spawn((
        TextBundle::from_section(
            state.caption(),
            TextStyle {
                font_size: 30.0,
                color: Color::WHITE,
                ..default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            bottom: Val::Px(10.0),
            ..default()
        }),
        SeedCaption,
    ));

    commands.insert_resource(MapTexture(map_texture));
}

fn refresh_map_texture(
    mut state: ResMut<ExplorerState>,
    texture: Option<Res<MapTexture>>,
    mut images: ResMut<Assets<Image>>,
) {
    if !state.needs_redraw {
        return;
    }
    let Some(texture) = texture else {
        return;
    };

    if let Some(image) = images.get_mut(&texture.0) {
        image.data = state.world.buffer().to_rgba_bytes();
    } else {
        warn!("World map image asset missing during repaint");
    }

    state.needs_redraw = false;
}

fn update_seed_caption(
    state: Res<ExplorerState>,
    mut captions: Query<&mut Text, With<SeedCaption>>,
) {
    if !state.is_changed() {
        return;
    }

    for mut text in captions.iter_mut() {
        if let Some(section) = text.sections.first_mut() {
            section.value = state.caption();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Command, NoiseParameters, ScrollDirection, WorldSettings};

    #[test]
    fn caption_shows_seed_and_offset() {
        let settings = WorldSettings::infinite(16, 16)
            .with_noise(NoiseParameters::infinite().with_seed(4));
        let mut state = ExplorerState::new(TerrainWorld::new(settings).unwrap());
        state
            .world
            .apply(Command::Pan(ScrollDirection::Left, 4))
            .unwrap();
        assert_eq!(state.caption(), "SEED: 4   X: -4  Y: 0");

        let finite = TerrainWorld::new(WorldSettings::finite(16, 16)).unwrap();
        assert_eq!(ExplorerState::new(finite).caption(), "SEED: 0");
    }
}
