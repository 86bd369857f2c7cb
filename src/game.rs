// Fixed-rate tick, keyboard input and notice forwarding.

use std::time::Duration;

use bevy::prelude::*;

use crate::error::GameError;
use crate::movement::TICK_INTERVAL_MS;
use crate::sections::{Sections, log_enter_section, sync_sections};
use crate::session::{GameSession, Mode, Notice};

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_duration(Duration::from_millis(
            TICK_INTERVAL_MS,
        )))
        .add_message::<Notice>()
        .add_systems(FixedUpdate, fixed_tick)
        .add_systems(
            Update,
            (keyboard_input, forward_notices, sync_sections).chain(),
        )
        .add_systems(OnEnter(Sections::Menu), log_enter_section)
        .add_systems(OnEnter(Sections::Playing), log_enter_section)
        .add_systems(OnEnter(Sections::Ended), log_enter_section);
    }
}

/// Log a rejected input. Nothing here is surfaced to the player.
pub fn report(result: Result<(), GameError>) {
    match result {
        Ok(()) => {}
        // Already logged where it was raised.
        Err(GameError::InvalidMoveRequest { .. }) => {}
        Err(err @ (GameError::InvalidBranchChoice(_) | GameError::NotAtBranchGate)) => {
            warn!("input rejected: {err}");
        }
        Err(err) => debug!("input ignored: {err}"),
    }
}

fn fixed_tick(mut session: ResMut<GameSession>) {
    if let Err(err) = session.tick() {
        error!("tick failed: {err}");
    }
}

fn keyboard_input(keyboard: Res<ButtonInput<KeyCode>>, mut session: ResMut<GameSession>) {
    match session.mode() {
        Mode::Menu => {
            if keyboard.just_pressed(KeyCode::Enter) {
                report(session.start_game());
            }
        }
        Mode::Playing => {
            if keyboard.just_pressed(KeyCode::Space) {
                report(session.press_patience());
            }
            if keyboard.any_just_pressed([KeyCode::Tab, KeyCode::KeyR]) {
                report(session.toggle_speed());
            }
            if keyboard.just_pressed(KeyCode::Enter) {
                report(session.advance());
            }
            // Options are labelled A and B on the prompt.
            if keyboard.any_just_pressed([KeyCode::Digit1, KeyCode::KeyA]) {
                report(session.choose_branch_input("a"));
            }
            if keyboard.any_just_pressed([KeyCode::Digit2, KeyCode::KeyB]) {
                report(session.choose_branch_input("b"));
            }
        }
        Mode::Ended(_) => {
            if keyboard.any_just_pressed([KeyCode::Escape, KeyCode::Enter]) {
                report(session.acknowledge_end());
            }
        }
    }
}

fn forward_notices(mut session: ResMut<GameSession>, mut notices: MessageWriter<Notice>) {
    for notice in session.drain_notices() {
        notices.write(notice);
    }
}
