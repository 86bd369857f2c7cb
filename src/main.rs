// Main
mod error;
mod game;
mod gauges;
mod hud;
mod menu;
mod movement;
mod scenes;
mod sections;
mod session;
mod transition;

use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use game::GamePlugin;
use hud::HudPlugin;
use menu::MenuPlugin;
use scenes::SceneGraph;
use sections::Sections;
use session::GameSession;
use transition::TransitionPlugin;

fn main() -> AppExit {
    // Broken scene content is a build mistake, refuse to start.
    let graph = match SceneGraph::reference() {
        Ok(graph) => graph,
        Err(err) => {
            eprintln!("invalid scene content: {err}");
            return AppExit::error();
        }
    };

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Hold Out".into(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    level: Level::INFO,
                    filter: "wgpu=error,naga=warn,holdout=debug".to_string(),
                    ..default()
                }),
        )
        .insert_resource(ClearColor(Color::BLACK))
        .insert_resource(GameSession::new(graph))
        .init_state::<Sections>()
        .add_systems(Startup, spawn_camera)
        .add_plugins((GamePlugin, MenuPlugin, HudPlugin, TransitionPlugin))
        .run()
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}
