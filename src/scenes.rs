//! Static scene graph: start -> corridor -> branch gate -> {danger | safe} -> goal.

use std::collections::HashMap;
use std::str::FromStr;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::GameError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum SceneId {
    Start,
    CorridorMid,
    BranchPoint,
    DangerRoute,
    SafeRoute,
    Goal,
}

/// The two routes offered at the branch gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum BranchChoice {
    #[strum(to_string = "danger", serialize = "a")]
    Danger,
    #[strum(to_string = "safe", serialize = "b")]
    Safe,
}

impl BranchChoice {
    /// Parse textual input, mapping anything unknown to `InvalidBranchChoice`.
    pub fn parse(input: &str) -> Result<Self, GameError> {
        Self::from_str(input.trim()).map_err(|_| GameError::InvalidBranchChoice(input.to_string()))
    }
}

/// A timed transition out of a scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: SceneId,
    pub time_cost: f32,
    pub has_event: bool,
}

impl Edge {
    pub const fn new(target: SceneId, time_cost: f32) -> Self {
        Self {
            target,
            time_cost,
            has_event: false,
        }
    }

    pub const fn with_event(mut self) -> Self {
        self.has_event = true;
        self
    }
}

/// One side of the branch gate: the edge to follow and the heart-rate shift
/// applied the moment the player picks it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchRoute {
    pub edge: Edge,
    pub heart_delta: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Exit {
    /// Fires automatically shortly after the scene is entered.
    Edge(Edge),
    /// Waits for the player to pick a route.
    BranchGate {
        danger: BranchRoute,
        safe: BranchRoute,
    },
    /// Arriving here wins the game.
    Goal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub id: SceneId,
    pub text: &'static str,
    pub background: &'static str,
    pub exit: Exit,
}

impl Scene {
    /// Every scene id this scene can lead to.
    fn targets(&self) -> Vec<SceneId> {
        match self.exit {
            Exit::Edge(edge) => vec![edge.target],
            Exit::BranchGate { danger, safe } => vec![danger.edge.target, safe.edge.target],
            Exit::Goal => Vec::new(),
        }
    }
}

pub const START_SCENE: SceneId = SceneId::Start;

/// Read-only lookup over the scene content.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    scenes: HashMap<SceneId, Scene>,
}

impl SceneGraph {
    /// Build a graph, rejecting any reference to a scene that is not defined.
    pub fn new(scenes: impl IntoIterator<Item = Scene>) -> Result<Self, GameError> {
        let scenes: HashMap<SceneId, Scene> = scenes.into_iter().map(|s| (s.id, s)).collect();

        if !scenes.contains_key(&START_SCENE) {
            return Err(GameError::UnknownScene(START_SCENE));
        }
        // Walk in declaration order so the first bad reference is reported.
        for scene in SceneId::iter().filter_map(|id| scenes.get(&id)) {
            for target in scene.targets() {
                if !scenes.contains_key(&target) {
                    return Err(GameError::UnknownSceneReference {
                        from: scene.id,
                        to: target,
                    });
                }
            }
        }
        Ok(Self { scenes })
    }

    /// The corridor the game ships with.
    pub fn reference() -> Result<Self, GameError> {
        Self::new(reference_scenes())
    }

    pub fn scene(&self, id: SceneId) -> Result<&Scene, GameError> {
        self.scenes.get(&id).ok_or(GameError::UnknownScene(id))
    }

    /// Route for `choice`, valid only when `at` is a branch gate.
    pub fn resolve_branch(&self, at: SceneId, choice: BranchChoice) -> Result<BranchRoute, GameError> {
        match self.scene(at)?.exit {
            Exit::BranchGate { danger, safe } => Ok(match choice {
                BranchChoice::Danger => danger,
                BranchChoice::Safe => safe,
            }),
            _ => Err(GameError::NotAtBranchGate),
        }
    }
}

fn reference_scenes() -> Vec<Scene> {
    vec![
        Scene {
            id: SceneId::Start,
            text: "A dim corridor. The toilet seems to be at the far end.",
            background: "images/corridor_start.png",
            exit: Exit::Edge(Edge::new(SceneId::CorridorMid, 200.0)),
        },
        Scene {
            id: SceneId::CorridorMid,
            text: "The floor creaks. Your heart is loud.",
            background: "images/corridor_mid.png",
            exit: Exit::Edge(Edge::new(SceneId::BranchPoint, 200.0)),
        },
        Scene {
            id: SceneId::BranchPoint,
            text: "A fork. The narrow corridor on the left, or the hall on the right...",
            background: "images/corridor_branch.png",
            exit: Exit::BranchGate {
                danger: BranchRoute {
                    edge: Edge::new(SceneId::DangerRoute, 150.0).with_event(),
                    heart_delta: 20.0,
                },
                safe: BranchRoute {
                    edge: Edge::new(SceneId::SafeRoute, 350.0),
                    heart_delta: -10.0,
                },
            },
        },
        Scene {
            id: SceneId::DangerRoute,
            text: "A shortcut, but something is here!",
            background: "images/danger_path.png",
            exit: Exit::Edge(Edge::new(SceneId::Goal, 150.0).with_event()),
        },
        Scene {
            id: SceneId::SafeRoute,
            text: "The long way round, but quiet. Time to calm down.",
            background: "images/safe_path.png",
            exit: Exit::Edge(Edge::new(SceneId::Goal, 350.0)),
        },
        Scene {
            id: SceneId::Goal,
            text: "The toilet door! Almost there...",
            background: "images/toilet_door.png",
            exit: Exit::Goal,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_graph_defines_every_scene() {
        let graph = SceneGraph::reference().unwrap();
        for id in SceneId::iter() {
            assert_eq!(graph.scene(id).unwrap().id, id);
        }
    }

    #[test]
    fn test_linear_chain() {
        let graph = SceneGraph::reference().unwrap();
        let Exit::Edge(edge) = graph.scene(SceneId::Start).unwrap().exit else {
            panic!("start should have a regular edge");
        };
        assert_eq!(edge.target, SceneId::CorridorMid);
        assert_eq!(edge.time_cost, 200.0);
        assert!(!edge.has_event);
        assert_eq!(graph.scene(SceneId::Goal).unwrap().exit, Exit::Goal);
    }

    #[test]
    fn test_resolve_branch() {
        let graph = SceneGraph::reference().unwrap();

        let danger = graph
            .resolve_branch(SceneId::BranchPoint, BranchChoice::Danger)
            .unwrap();
        assert_eq!(danger.edge.target, SceneId::DangerRoute);
        assert_eq!(danger.edge.time_cost, 150.0);
        assert!(danger.edge.has_event);
        assert_eq!(danger.heart_delta, 20.0);

        let safe = graph
            .resolve_branch(SceneId::BranchPoint, BranchChoice::Safe)
            .unwrap();
        assert_eq!(safe.edge.target, SceneId::SafeRoute);
        assert_eq!(safe.edge.time_cost, 350.0);
        assert!(!safe.edge.has_event);
        assert_eq!(safe.heart_delta, -10.0);
    }

    #[test]
    fn test_resolve_branch_off_gate() {
        let graph = SceneGraph::reference().unwrap();
        assert_eq!(
            graph.resolve_branch(SceneId::CorridorMid, BranchChoice::Safe),
            Err(GameError::NotAtBranchGate)
        );
    }

    #[test]
    fn test_unknown_reference_rejected() {
        let scenes: Vec<Scene> = reference_scenes()
            .into_iter()
            .filter(|s| s.id != SceneId::SafeRoute)
            .collect();
        assert_eq!(
            SceneGraph::new(scenes).unwrap_err(),
            GameError::UnknownSceneReference {
                from: SceneId::BranchPoint,
                to: SceneId::SafeRoute,
            }
        );
    }

    #[test]
    fn test_missing_start_rejected() {
        let scenes: Vec<Scene> = reference_scenes()
            .into_iter()
            .filter(|s| s.id != SceneId::Start)
            .collect();
        assert_eq!(
            SceneGraph::new(scenes).unwrap_err(),
            GameError::UnknownScene(SceneId::Start)
        );
    }

    #[test]
    fn test_lookup_of_undefined_scene() {
        let graph = SceneGraph::new(vec![Scene {
            id: SceneId::Start,
            text: "",
            background: "",
            exit: Exit::Goal,
        }])
        .unwrap();
        assert_eq!(
            graph.scene(SceneId::Goal).unwrap_err(),
            GameError::UnknownScene(SceneId::Goal)
        );
    }

    #[test]
    fn test_branch_choice_parse() {
        assert_eq!(BranchChoice::parse("a").unwrap(), BranchChoice::Danger);
        assert_eq!(BranchChoice::parse("Danger").unwrap(), BranchChoice::Danger);
        assert_eq!(BranchChoice::parse(" B ").unwrap(), BranchChoice::Safe);
        assert_eq!(
            BranchChoice::parse("c"),
            Err(GameError::InvalidBranchChoice("c".to_string()))
        );
        assert_eq!(BranchChoice::Safe.to_string(), "safe");
    }

    #[test]
    fn test_scene_id_display() {
        assert_eq!(SceneId::CorridorMid.to_string(), "corridor_mid");
        assert_eq!(SceneId::DangerRoute.to_string(), "danger_route");
    }
}
