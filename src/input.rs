use bevy::prelude::*;

use crate::explorer::ExplorerState;
use crate::world::{Command, CommandOutcome, ExplorerConfig, ScrollDirection, WorldMode};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, explorer_input_system);
    }
}

/// Key bindings of the explorer window.
///
/// Infinite worlds pan with the arrow keys and change seed with `W`/`S`.
/// Finite worlds cannot pan, so their arrow keys step the seed instead.
pub fn command_for_key(mode: WorldMode, key: KeyCode, moving_speed: u32) -> Option<Command> {
    match (mode, key) {
        (_, KeyCode::Escape) => Some(Command::Quit),
        (_, KeyCode::KeyR) => Some(Command::Init),
        (WorldMode::Infinite, KeyCode::ArrowUp) => {
            Some(Command::Pan(ScrollDirection::Up, moving_speed))
        }
        (WorldMode::Infinite, KeyCode::ArrowDown) => {
            Some(Command::Pan(ScrollDirection::Down, moving_speed))
        }
        (WorldMode::Infinite, KeyCode::ArrowLeft) => {
            Some(Command::Pan(ScrollDirection::Left, moving_speed))
        }
        (WorldMode::Infinite, KeyCode::ArrowRight) => {
            Some(Command::Pan(ScrollDirection::Right, moving_speed))
        }
        (WorldMode::Infinite, KeyCode::KeyW) => Some(Command::ChangeSeed(1)),
        (WorldMode::Infinite, KeyCode::KeyS) => Some(Command::ChangeSeed(-1)),
        (WorldMode::Finite, KeyCode::ArrowUp) => Some(Command::ChangeSeed(1)),
        (WorldMode::Finite, KeyCode::ArrowDown) => Some(Command::ChangeSeed(-1)),
        _ => None,
    }
}

fn explorer_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<ExplorerConfig>,
    mut state: ResMut<ExplorerState>,
    mut exit: EventWriter<AppExit>,
) {
    let mode = state.world.mode();
    let moving_speed = config.moving_speed;

    for key in keyboard.get_just_pressed() {
        let Some(command) = command_for_key(mode, *key, moving_speed) else {
            continue;
        };

        match state.world.apply(command) {
            Ok(CommandOutcome::Quit) => {
                exit.send(AppExit::Success);
            }
            Ok(CommandOutcome::Ignored) => {}
            Ok(_) => state.needs_redraw = true,
            Err(error) => warn!("Rejected {:?}: {}", command, error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_bindings_pan_and_reseed() {
        let mode = WorldMode::Infinite;
        assert_eq!(
            command_for_key(mode, KeyCode::ArrowRight, 40),
            Some(Command::Pan(ScrollDirection::Right, 40))
        );
        assert_eq!(
            command_for_key(mode, KeyCode::ArrowUp, 12),
            Some(Command::Pan(ScrollDirection::Up, 12))
        );
        assert_eq!(command_for_key(mode, KeyCode::KeyW, 40), Some(Command::ChangeSeed(1)));
        assert_eq!(command_for_key(mode, KeyCode::KeyS, 40), Some(Command::ChangeSeed(-1)));
    }

    #[test]
    fn finite_arrows_step_the_seed() {
        let mode = WorldMode::Finite;
        assert_eq!(command_for_key(mode, KeyCode::ArrowUp, 40), Some(Command::ChangeSeed(1)));
        assert_eq!(command_for_key(mode, KeyCode::ArrowDown, 40), Some(Command::ChangeSeed(-1)));
        assert_eq!(command_for_key(mode, KeyCode::ArrowLeft, 40), None);
        assert_eq!(command_for_key(mode, KeyCode::KeyW, 40), None);
    }

    #[test]
    fn escape_and_reset_work_in_both_modes() {
        for mode in [WorldMode::Finite, WorldMode::Infinite] {
            assert_eq!(command_for_key(mode, KeyCode::Escape, 1), Some(Command::Quit));
            assert_eq!(command_for_key(mode, KeyCode::KeyR, 1), Some(Command::Init));
            assert_eq!(command_for_key(mode, KeyCode::Space, 1), None);
        }
    }
}
