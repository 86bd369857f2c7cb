// Errors raised by the game core.

use thiserror::Error;

use crate::scenes::SceneId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Scene content points at a scene that was never defined. Fatal at load.
    #[error("scene `{from}` references undefined scene `{to}`")]
    UnknownSceneReference { from: SceneId, to: SceneId },
    #[error("scene `{0}` is not defined")]
    UnknownScene(SceneId),
    /// A move was requested while another one is still in flight.
    #[error("already moving to `{active}`")]
    InvalidMoveRequest { active: SceneId },
    #[error("invalid branch choice `{0}`")]
    InvalidBranchChoice(String),
    #[error("not waiting at the branch gate")]
    NotAtBranchGate,
    #[error("no game in progress")]
    NotPlaying,
    #[error("game has not ended")]
    NotEnded,
}
