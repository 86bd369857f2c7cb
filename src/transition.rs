// Screen flashes, pop-up messages and the panic glitch overlay.

use bevy::picking::Pickable;
use bevy::prelude::*;
use rand::Rng;

use crate::sections::Sections;
use crate::session::{GameSession, Notice};

pub struct TransitionPlugin;

impl Plugin for TransitionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, (spawn_notice_effects, fade_effects, jitter_glitch).chain());
    }
}

const FLASH_EVADE: f32 = 0.5;
const FLASH_HIT: f32 = 1.0;

const MESSAGE_FADE_IN: f32 = 0.3;
const MESSAGE_HOLD: f32 = 2.7;
const MESSAGE_FADE_OUT: f32 = 0.3;

/// Max glitch offset in pixels.
const GLITCH_MAX_SHAKE: f32 = 6.0;

const EVADE_GREEN: Color = Color::srgba(0.3, 0.69, 0.31, 0.9);
const HIT_RED: Color = Color::srgba(0.96, 0.26, 0.21, 0.9);

/// Fades an overlay in, holds it, fades it out, then despawns it.
#[derive(Component)]
struct Fade {
    timer: f32,
    fade_in: f32,
    hold: f32,
    fade_out: f32,
    color: Color,
    /// Session generation the effect belongs to.
    generation: u32,
}

impl Fade {
    fn total(&self) -> f32 {
        self.fade_in + self.hold + self.fade_out
    }
}

#[derive(Component)]
struct Glitch;

/// Opacity multiplier `t` seconds into a fade.
fn fade_alpha(t: f32, fade_in: f32, hold: f32, fade_out: f32) -> f32 {
    if t < fade_in {
        t / fade_in
    } else if t < fade_in + hold {
        1.0
    } else if fade_out > 0.0 {
        (1.0 - (t - fade_in - hold) / fade_out).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn spawn_notice_effects(
    mut commands: Commands,
    mut notices: MessageReader<Notice>,
    session: Res<GameSession>,
    glitches: Query<Entity, With<Glitch>>,
) {
    let generation = session.generation();
    for notice in notices.read() {
        match notice {
            Notice::HorrorEvaded => {
                spawn_flash(&mut commands, EVADE_GREEN, FLASH_EVADE, generation);
                spawn_message(&mut commands, "Outran it!", EVADE_GREEN, generation);
            }
            Notice::HorrorHit => {
                spawn_flash(&mut commands, HIT_RED, FLASH_HIT, generation);
                spawn_message(
                    &mut commands,
                    "Something got you! You can't hold it much longer...",
                    HIT_RED,
                    generation,
                );
            }
            Notice::CrisisEntered => {
                if glitches.is_empty() {
                    spawn_glitch(&mut commands);
                }
            }
            Notice::CrisisExited | Notice::GameEnded(_) => {
                for entity in &glitches {
                    commands.entity(entity).despawn();
                }
            }
            Notice::SceneEntered(_) => {}
        }
    }
}

fn spawn_flash(commands: &mut Commands, color: Color, duration: f32, generation: u32) {
    commands.spawn((
        Fade {
            timer: 0.0,
            fade_in: 0.0,
            hold: duration * 0.5,
            fade_out: duration * 0.5,
            color,
            generation,
        },
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(color.with_alpha(color.alpha() * 0.5)),
        GlobalZIndex(100),
        Pickable::IGNORE,
    ));
}

fn spawn_message(commands: &mut Commands, text: &str, color: Color, generation: u32) {
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
            GlobalZIndex(150),
            Pickable::IGNORE,
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Fade {
                        timer: 0.0,
                        fade_in: MESSAGE_FADE_IN,
                        hold: MESSAGE_HOLD,
                        fade_out: MESSAGE_FADE_OUT,
                        color,
                        generation,
                    },
                    Node {
                        padding: UiRect::axes(Val::Px(30.0), Val::Px(15.0)),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(color.with_alpha(0.0)),
                    BorderColor::all(color.with_alpha(1.0)),
                ))
                .with_children(|card| {
                    card.spawn((
                        Text::new(text),
                        TextFont {
                            font_size: 18.0,
                            ..default()
                        },
                        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
                    ));
                });
        });
}

fn spawn_glitch(commands: &mut Commands) {
    commands.spawn((
        Glitch,
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            left: Val::Px(0.0),
            top: Val::Px(0.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        BackgroundColor(Color::srgba(0.6, 0.0, 0.2, 0.15)),
        GlobalZIndex(90),
        Pickable::IGNORE,
        DespawnOnExit(Sections::Playing),
    ));
}

fn fade_effects(
    mut commands: Commands,
    time: Res<Time>,
    session: Res<GameSession>,
    mut fades: Query<(Entity, &mut Fade, &mut BackgroundColor, Option<&Children>, Option<&ChildOf>)>,
    mut texts: Query<&mut TextColor>,
) {
    for (entity, mut fade, mut bg, children, parent) in &mut fades {
        fade.timer += time.delta_secs();

        // Effects from an earlier game or past their time are removed.
        if fade.generation != session.generation() || fade.timer >= fade.total() {
            let root = parent.map_or(entity, |p| p.parent());
            commands.entity(root).despawn();
            continue;
        }

        let alpha = fade_alpha(fade.timer, fade.fade_in, fade.hold, fade.fade_out);
        bg.0 = fade.color.with_alpha(fade.color.alpha() * alpha);
        let Some(children) = children else {
            continue;
        };
        for &child in &**children {
            if let Ok(mut color) = texts.get_mut(child) {
                color.0 = color.0.with_alpha(alpha);
            }
        }
    }
}

fn jitter_glitch(mut glitches: Query<&mut Node, With<Glitch>>) {
    let mut rng = rand::rng();
    for mut node in &mut glitches {
        node.left = Val::Px(rng.random_range(-GLITCH_MAX_SHAKE..=GLITCH_MAX_SHAKE));
        node.top = Val::Px(rng.random_range(-GLITCH_MAX_SHAKE..=GLITCH_MAX_SHAKE));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_alpha_phases() {
        assert_eq!(fade_alpha(0.0, 0.3, 2.7, 0.3), 0.0);
        assert!((fade_alpha(0.15, 0.3, 2.7, 0.3) - 0.5).abs() < 1e-5);
        assert_eq!(fade_alpha(1.0, 0.3, 2.7, 0.3), 1.0);
        assert!((fade_alpha(3.15, 0.3, 2.7, 0.3) - 0.5).abs() < 1e-4);
        assert_eq!(fade_alpha(5.0, 0.3, 2.7, 0.3), 0.0);
    }

    #[test]
    fn test_flash_without_fade_in_starts_opaque() {
        assert_eq!(fade_alpha(0.0, 0.0, 0.25, 0.25), 1.0);
    }
}
