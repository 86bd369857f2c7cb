// In-game HUD: gauges, scene text, speed/patience controls and the branch prompt.

use bevy::prelude::*;

use crate::game::report;
use crate::menu::spawn_button;
use crate::scenes::BranchChoice;
use crate::sections::Sections;
use crate::session::{GameSession, Notice};

pub struct HudPlugin;

impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(Sections::Playing), setup_hud)
            .add_systems(
                Update,
                (hud_buttons, update_gauges, update_labels, update_background)
                    .chain()
                    .run_if(in_state(Sections::Playing)),
            );
    }
}

const URGENCY_COLOR: Color = Color::srgb(0.9, 0.1, 0.1);
const URGENCY_CRITICAL_COLOR: Color = Color::srgb(0.45, 0.0, 0.0);
const HEART_COLOR: Color = Color::srgb(0.9, 0.4, 0.6);
const MOVE_COLOR: Color = Color::srgb(0.3, 0.69, 0.31);

const BAR_WIDTH: f32 = 240.0;
const BAR_HEIGHT: f32 = 16.0;

#[derive(Component, Clone, Copy)]
enum GaugeBar {
    Urgency,
    Heart,
    Move,
}

#[derive(Component)]
struct SceneText;

#[derive(Component)]
struct SceneBackground;

#[derive(Component)]
struct SpeedLabel;

#[derive(Component)]
struct BranchPrompt;

#[derive(Component, Clone, Copy)]
enum HudButton {
    Speed,
    Patience,
    Forward,
    Branch(BranchChoice),
}

pub fn speed_label(is_running: bool) -> &'static str {
    if is_running {
        "Running (tap to walk)"
    } else {
        "Walking (tap to run)"
    }
}

fn urgency_color(critical: bool) -> Color {
    if critical {
        URGENCY_CRITICAL_COLOR
    } else {
        URGENCY_COLOR
    }
}

fn setup_hud(mut commands: Commands, session: Res<GameSession>, asset_server: Res<AssetServer>) {
    let snapshot = session.snapshot();

    commands.spawn((
        SceneBackground,
        ImageNode::new(asset_server.load(snapshot.background)),
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        GlobalZIndex(-1),
        DespawnOnExit(Sections::Playing),
    ));

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::SpaceBetween,
                padding: UiRect::all(Val::Px(16.0)),
                ..default()
            },
            DespawnOnExit(Sections::Playing),
        ))
        .with_children(|parent| {
            // Gauges, top left.
            parent
                .spawn(Node {
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(6.0),
                    ..default()
                })
                .with_children(|gauges| {
                    spawn_gauge(gauges, "Urgency", GaugeBar::Urgency, URGENCY_COLOR);
                    spawn_gauge(gauges, "Heart", GaugeBar::Heart, HEART_COLOR);
                    spawn_gauge(gauges, "Move", GaugeBar::Move, MOVE_COLOR);
                });

            parent.spawn((
                SceneText,
                Text::new(snapshot.scene_text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                Node {
                    align_self: AlignSelf::Center,
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                },
            ));

            // Controls, bottom row.
            parent
                .spawn(Node {
                    justify_content: JustifyContent::Center,
                    column_gap: Val::Px(16.0),
                    ..default()
                })
                .with_children(|controls| {
                    spawn_button(controls, "Hold on!", HudButton::Patience);
                    spawn_button(controls, "Forward", HudButton::Forward);
                    controls
                        .spawn((
                            HudButton::Speed,
                            Button,
                            Node {
                                min_width: Val::Px(240.0),
                                height: Val::Px(50.0),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                border: UiRect::all(Val::Px(2.0)),
                                ..default()
                            },
                            BorderColor::all(Color::srgba(1.0, 1.0, 1.0, 0.3)),
                            BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
                        ))
                        .with_children(|btn| {
                            btn.spawn((
                                SpeedLabel,
                                Text::new(speed_label(snapshot.is_running)),
                                TextFont {
                                    font_size: 20.0,
                                    ..default()
                                },
                                TextColor(Color::WHITE),
                            ));
                        });
                });
        });

    // Branch prompt, hidden until the gate is reached.
    commands
        .spawn((
            BranchPrompt,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(16.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            GlobalZIndex(50),
            Visibility::Hidden,
            DespawnOnExit(Sections::Playing),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            spawn_button(
                parent,
                "Narrow corridor (shortcut)",
                HudButton::Branch(BranchChoice::Danger),
            );
            spawn_button(
                parent,
                "Hall (long way round)",
                HudButton::Branch(BranchChoice::Safe),
            );
        });
}

fn spawn_gauge(parent: &mut ChildSpawnerCommands, label: &str, bar: GaugeBar, color: Color) {
    parent
        .spawn(Node {
            align_items: AlignItems::Center,
            column_gap: Val::Px(8.0),
            ..default()
        })
        .with_children(|row| {
            row.spawn((
                Text::new(label),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    width: Val::Px(72.0),
                    ..default()
                },
            ));
            row.spawn((
                Node {
                    width: Val::Px(BAR_WIDTH),
                    height: Val::Px(BAR_HEIGHT),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
            ))
            .with_children(|track| {
                track.spawn((
                    bar,
                    Node {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(color),
                ));
            });
        });
}

fn hud_buttons(
    query: Query<(&Interaction, &HudButton), Changed<Interaction>>,
    mut session: ResMut<GameSession>,
) {
    for (interaction, button) in &query {
        if *interaction != Interaction::Pressed {
            continue;
        }
        match *button {
            HudButton::Speed => report(session.toggle_speed()),
            HudButton::Patience => report(session.press_patience()),
            HudButton::Forward => report(session.advance()),
            HudButton::Branch(choice) => report(session.choose_branch(choice)),
        }
    }
}

fn update_gauges(
    session: Res<GameSession>,
    mut bars: Query<(&GaugeBar, &mut Node, &mut BackgroundColor)>,
) {
    let snapshot = session.snapshot();
    for (bar, mut node, mut color) in &mut bars {
        let value = match bar {
            GaugeBar::Urgency => {
                color.0 = urgency_color(snapshot.urgency_critical);
                snapshot.urgency
            }
            GaugeBar::Heart => snapshot.heart_rate,
            GaugeBar::Move => snapshot.move_progress,
        };
        node.width = Val::Percent(value.clamp(0.0, 100.0));
    }
}

fn update_labels(
    session: Res<GameSession>,
    mut scene_text: Query<&mut Text, (With<SceneText>, Without<SpeedLabel>)>,
    mut speed_text: Query<&mut Text, (With<SpeedLabel>, Without<SceneText>)>,
    mut prompt: Query<(&mut Visibility, &Children), With<BranchPrompt>>,
    mut prompt_text: Query<&mut Text, (Without<SceneText>, Without<SpeedLabel>)>,
) {
    let snapshot = session.snapshot();

    if let Ok(mut text) = scene_text.single_mut() {
        if text.0 != snapshot.scene_text {
            **text = snapshot.scene_text.to_string();
        }
    }
    if let Ok(mut text) = speed_text.single_mut() {
        let label = speed_label(snapshot.is_running);
        if text.0 != label {
            **text = label.to_string();
        }
    }

    let Ok((mut visibility, children)) = prompt.single_mut() else {
        return;
    };
    let wanted = if snapshot.awaiting_branch && !snapshot.is_moving {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    if *visibility != wanted {
        *visibility = wanted;
        if let Some(first) = children.first() {
            if let Ok(mut text) = prompt_text.get_mut(*first) {
                **text = snapshot.scene_text.to_string();
            }
        }
    }
}

fn update_background(
    mut notices: MessageReader<Notice>,
    session: Res<GameSession>,
    asset_server: Res<AssetServer>,
    mut background: Query<&mut ImageNode, With<SceneBackground>>,
) {
    let entered = notices
        .read()
        .any(|notice| matches!(notice, Notice::SceneEntered(_)));
    if !entered {
        return;
    }
    let Ok(mut image) = background.single_mut() else {
        return;
    };
    image.image = asset_server.load(session.snapshot().background);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_label() {
        assert_eq!(speed_label(true), "Running (tap to walk)");
        assert_eq!(speed_label(false), "Walking (tap to run)");
    }

    #[test]
    fn test_urgency_turns_dark_when_critical() {
        assert_eq!(urgency_color(false), URGENCY_COLOR);
        assert_eq!(urgency_color(true), URGENCY_CRITICAL_COLOR);
    }
}
