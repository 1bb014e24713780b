//! Input handling systems
//!
//! Keys and on-screen buttons become `InputEvent`s queued on the world; the
//! next fixed tick applies them.

use bevy::log::warn;
use bevy::prelude::*;

use super::components::{ControlButton, NavButton, SimWorldResource};
use crate::simulation::{Control, InputEvent, LogSink, SimWorld};

const DRIVING_KEYS: [(KeyCode, Control); 3] = [
    (KeyCode::ArrowRight, Control::Accelerate),
    (KeyCode::ArrowLeft, Control::Brake),
    (KeyCode::KeyH, Control::Horn),
];

const STATION_KEYS: [KeyCode; 6] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
];

/// Audio starts on the first user gesture
fn unlock_audio(world: &mut SimWorld) {
    if !world.audio_available() {
        world.unlock_audio(Box::new(LogSink));
    }
}

fn navigate(world: &mut SimWorld, station_id: &str) {
    if let Err(err) = world.navigate(station_id) {
        warn!("Ignoring navigation: {:#}", err);
    }
}

/// Handle keyboard driving, station shortcuts and exit
pub fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut sim_world: ResMut<SimWorldResource>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
        return;
    }
    let any_pressed = keyboard.get_just_pressed().next().is_some();
    if !any_pressed && keyboard.get_just_released().next().is_none() {
        return;
    }

    let world = &mut sim_world.0;
    if any_pressed {
        unlock_audio(world);
    }

    for (key, control) in DRIVING_KEYS {
        if keyboard.just_pressed(key) {
            world.handle_input(InputEvent::Press(control));
        }
        if keyboard.just_released(key) {
            world.handle_input(InputEvent::Release(control));
        }
    }

    for (index, key) in STATION_KEYS.iter().enumerate() {
        if !keyboard.just_pressed(*key) {
            continue;
        }
        let station_id = world.route.stations().get(index).map(|s| s.id.clone());
        if let Some(station_id) = station_id {
            navigate(world, &station_id);
        }
    }
}

/// Press-and-hold on-screen driving buttons. A button releases its control
/// when the pointer lets go or leaves it.
pub fn handle_control_buttons(
    mut sim_world: ResMut<SimWorldResource>,
    interaction_query: Query<(&Interaction, &ControlButton), Changed<Interaction>>,
    mut pressed: Local<Vec<Control>>,
) {
    for (interaction, button) in interaction_query.iter() {
        let world = &mut sim_world.0;
        match *interaction {
            Interaction::Pressed => {
                unlock_audio(world);
                world.handle_input(InputEvent::Press(button.0));
                pressed.push(button.0);
            }
            Interaction::Hovered | Interaction::None => {
                if let Some(index) = pressed.iter().position(|c| *c == button.0) {
                    pressed.swap_remove(index);
                    world.handle_input(InputEvent::Release(button.0));
                }
            }
        }
    }
}

/// Station nav links
pub fn handle_nav_buttons(
    mut sim_world: ResMut<SimWorldResource>,
    interaction_query: Query<(&Interaction, &NavButton), Changed<Interaction>>,
) {
    for (interaction, button) in interaction_query.iter() {
        if *interaction == Interaction::Pressed {
            let world = &mut sim_world.0;
            unlock_audio(world);
            navigate(world, &button.0);
        }
    }
}
