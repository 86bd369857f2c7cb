// Title screen and end-of-game screen.

use bevy::prelude::*;

use crate::game::report;
use crate::sections::Sections;
use crate::session::{GameSession, Mode, Outcome};

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Sections::Menu), setup_menu)
            .add_systems(OnEnter(Sections::Ended), setup_end_screen)
            .add_systems(Update, (button_visuals, button_actions));
    }
}

const NORMAL_BUTTON: Color = Color::srgb(0.15, 0.15, 0.15);
const HOVERED_BUTTON: Color = Color::srgb(0.25, 0.25, 0.25);
const PRESSED_BUTTON: Color = Color::srgb(0.35, 0.35, 0.35);
const BORDER_IDLE: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);

const SUCCESS_PANEL: Color = Color::srgb(0.106, 0.369, 0.125);
const FAILURE_PANEL: Color = Color::srgb(0.718, 0.11, 0.11);

#[derive(Component)]
enum MenuButton {
    Start,
    BackToTitle,
    #[cfg(not(target_arch = "wasm32"))]
    Exit,
}

/// Title, message and panel colour for the end screen.
pub fn end_text(outcome: Outcome) -> (&'static str, &'static str, Color) {
    match outcome {
        Outcome::Success => (
            "Made it!",
            "You reached the toilet in time.",
            SUCCESS_PANEL,
        ),
        Outcome::Failure => (
            "Game over",
            "Burst!\n\"Don't run, you'll leak.\"",
            FAILURE_PANEL,
        ),
    }
}

fn setup_menu(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            DespawnOnExit(Sections::Menu),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Hold Out"),
                TextFont {
                    font_size: 64.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    margin: UiRect::bottom(Val::Px(32.0)),
                    ..default()
                },
            ));

            spawn_button(parent, "Start", MenuButton::Start);

            // Exit button (native only).
            #[cfg(not(target_arch = "wasm32"))]
            spawn_button(parent, "Exit", MenuButton::Exit);
        });
}

fn setup_end_screen(mut commands: Commands, session: Res<GameSession>) {
    let Mode::Ended(outcome) = session.mode() else {
        return;
    };
    let (title, message, panel) = end_text(outcome);

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.9)),
            GlobalZIndex(200),
            DespawnOnExit(Sections::Ended),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(20.0),
                        padding: UiRect::all(Val::Px(40.0)),
                        max_width: Val::Px(400.0),
                        border: UiRect::all(Val::Px(3.0)),
                        ..default()
                    },
                    BackgroundColor(panel),
                    BorderColor::all(Color::WHITE),
                ))
                .with_children(|panel| {
                    panel.spawn((
                        Text::new(title),
                        TextFont {
                            font_size: 36.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                    panel.spawn((
                        Text::new(message),
                        TextFont {
                            font_size: 20.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                    spawn_button(panel, "Back to title", MenuButton::BackToTitle);
                });
        });
}

pub fn spawn_button<M: Component>(parent: &mut ChildSpawnerCommands, label: &str, marker: M) {
    parent
        .spawn((
            marker,
            Button,
            Node {
                min_width: Val::Px(200.0),
                height: Val::Px(50.0),
                padding: UiRect::horizontal(Val::Px(12.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(2.0)),
                ..default()
            },
            BorderColor::all(BORDER_IDLE),
            BackgroundColor(NORMAL_BUTTON),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn button_visuals(
    mut query: Query<
        (&Interaction, &mut BackgroundColor, &mut BorderColor),
        (Changed<Interaction>, With<Button>),
    >,
) {
    for (interaction, mut bg, mut border) in &mut query {
        match *interaction {
            Interaction::Pressed => {
                *bg = PRESSED_BUTTON.into();
                *border = BorderColor::all(Color::WHITE);
            }
            Interaction::Hovered => {
                *bg = HOVERED_BUTTON.into();
                *border = BorderColor::all(Color::WHITE);
            }
            Interaction::None => {
                *bg = NORMAL_BUTTON.into();
                *border = BorderColor::all(BORDER_IDLE);
            }
        }
    }
}

fn button_actions(
    query: Query<(&Interaction, &MenuButton), Changed<Interaction>>,
    mut session: ResMut<GameSession>,
    #[cfg(not(target_arch = "wasm32"))] mut exit: MessageWriter<AppExit>,
) {
    for (interaction, button) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match button {
            MenuButton::Start => report(session.start_game()),
            MenuButton::BackToTitle => report(session.acknowledge_end()),
            #[cfg(not(target_arch = "wasm32"))]
            MenuButton::Exit => {
                exit.write(AppExit::Success);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_text() {
        let (title, _, panel) = end_text(Outcome::Success);
        assert_eq!(title, "Made it!");
        assert_eq!(panel, SUCCESS_PANEL);
        let (title, message, panel) = end_text(Outcome::Failure);
        assert_eq!(title, "Game over");
        assert!(message.contains("Burst!"));
        assert_eq!(panel, FAILURE_PANEL);
    }
}
