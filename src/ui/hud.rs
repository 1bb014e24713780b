//! Page chrome: progress bar, gear readout, station nav, content panels,
//! on-screen controls and floating station labels

use bevy::prelude::*;

use super::components::{
    ControlButton, HudText, NavButton, ProgressFill, SimWorldResource, StationLabel, StationPanel,
};
use crate::simulation::Control;

const PANEL_BACKGROUND: Color = Color::srgba(0.0, 0.0, 0.0, 0.7);
pub const BUTTON_IDLE: Color = Color::srgb(0.25, 0.25, 0.3);
pub const BUTTON_ACTIVE: Color = Color::srgb(0.9, 0.6, 0.1);

/// Spawn all screen-space UI from the route in the simulation
pub fn setup_hud(mut commands: Commands, sim_world: Res<SimWorldResource>) {
    let world = &sim_world.0;

    // Progress bar across the top
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Px(6.0),
                position_type: PositionType::Absolute,
                top: Val::Px(0.0),
                left: Val::Px(0.0),
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
        ))
        .with_children(|parent| {
            parent.spawn((
                ProgressFill,
                Node {
                    width: Val::Percent(0.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(BUTTON_ACTIVE),
            ));
        });

    // Readouts at top-left
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(16.0),
                left: Val::Px(10.0),
                padding: UiRect::all(Val::Px(10.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(5.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
        ))
        .with_children(|parent| {
            for (field, initial, size) in [
                (HudText::Gear, "D1", 24.0),
                (HudText::Speed, "Speed: 0.00", 14.0),
                (HudText::Autopilot, "Autopilot: off", 14.0),
                (HudText::Light, "Light: Green", 14.0),
            ] {
                parent.spawn((
                    Text::new(initial),
                    TextFont {
                        font_size: size,
                        ..default()
                    },
                    TextColor(Color::srgb(0.9, 0.9, 0.9)),
                    field,
                ));
            }
        });

    // Station nav links along the top
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(10.0),
            ..default()
        })
        .with_children(|parent| {
            for station in world.route.stations() {
                parent
                    .spawn((
                        Button,
                        NavButton(station.id.clone()),
                        Node {
                            padding: UiRect::axes(Val::Px(10.0), Val::Px(5.0)),
                            border: UiRect::all(Val::Px(1.0)),
                            ..default()
                        },
                        BorderColor::all(Color::WHITE),
                        BackgroundColor(BUTTON_IDLE),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(station.name.clone()),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });

    // Content panels, one visible while parked at its station
    for station in world.route.stations() {
        commands
            .spawn((
                StationPanel(station.id.clone()),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(70.0),
                    right: Val::Px(10.0),
                    width: Val::Px(320.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
                Visibility::Hidden,
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(station.name.clone()),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
    }

    // Press-and-hold controls at bottom-right
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(16.0),
            right: Val::Px(16.0),
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|parent| {
            for (control, label) in [
                (Control::Brake, "< Brake"),
                (Control::Horn, "Horn"),
                (Control::Accelerate, "Go >"),
            ] {
                parent
                    .spawn((
                        Button,
                        ControlButton(control),
                        Node {
                            width: Val::Px(80.0),
                            height: Val::Px(44.0),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            border: UiRect::all(Val::Px(2.0)),
                            ..default()
                        },
                        BorderColor::all(Color::WHITE),
                        BackgroundColor(BUTTON_IDLE),
                    ))
                    .with_children(|button| {
                        button.spawn((
                            Text::new(label),
                            TextFont {
                                font_size: 14.0,
                                ..default()
                            },
                            TextColor(Color::WHITE),
                        ));
                    });
            }
        });

    // Floating labels, positioned every frame from the projected anchors
    for station in world.route.stations() {
        commands.spawn((
            StationLabel(station.id.clone()),
            Text::new(station.name.clone()),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                position_type: PositionType::Absolute,
                ..default()
            },
            Visibility::Hidden,
        ));
    }
}
