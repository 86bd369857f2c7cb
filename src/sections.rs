/// Top-level screens, mirrored from the session mode.
use bevy::prelude::*;

use crate::session::{GameSession, Mode};

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum Sections {
    #[default]
    Menu,
    Playing,
    Ended,
}

impl From<Mode> for Sections {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Menu => Sections::Menu,
            Mode::Playing => Sections::Playing,
            Mode::Ended(_) => Sections::Ended,
        }
    }
}

/// Request a section change whenever the session mode no longer matches.
pub fn sync_sections(
    session: Res<GameSession>,
    section: Res<State<Sections>>,
    mut next_section: ResMut<NextState<Sections>>,
) {
    let wanted = Sections::from(session.mode());
    if **section != wanted {
        next_section.set(wanted);
    }
}

pub fn log_enter_section(section: Res<State<Sections>>) {
    info!("STATE: entered {:?}", **section);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::state::app::StatesPlugin;

    use crate::scenes::SceneGraph;

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .init_state::<Sections>()
            .insert_resource(GameSession::new(SceneGraph::reference().unwrap()))
            .add_systems(Update, sync_sections);
        app
    }

    fn section(app: &App) -> Sections {
        **app.world().resource::<State<Sections>>()
    }

    #[test]
    fn test_mode_mapping() {
        assert_eq!(Sections::from(Mode::Menu), Sections::Menu);
        assert_eq!(Sections::from(Mode::Playing), Sections::Playing);
        assert_eq!(
            Sections::from(Mode::Ended(crate::session::Outcome::Failure)),
            Sections::Ended
        );
    }

    #[test]
    fn test_section_follows_session() {
        let mut app = app();
        app.update();
        assert_eq!(section(&app), Sections::Menu);

        app.world_mut()
            .resource_mut::<GameSession>()
            .start_game()
            .unwrap();
        app.update();
        app.update();
        assert_eq!(section(&app), Sections::Playing);
    }
}
