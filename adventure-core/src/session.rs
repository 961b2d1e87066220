//! Traversal engine driving one play-through of a decoded graph.

use tracing::{debug, info};

use crate::{
    error::SessionError,
    graph::{Graph, Node, Role},
};

/// Whether a session is still in progress.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SessionState {
    /// The end room has not been reached yet.
    Playing,
    /// The end room was reached; further moves are rejected.
    Won,
}

/// Result of a single [`Session::move_to`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    /// The session moved to the requested room.
    Moved {
        /// Whether the room reached was the end room.
        won: bool,
    },
    /// The requested room is not a neighbour of the current room.
    Rejected,
    /// The session has already been won.
    AlreadyWon,
}

/// Snapshot of the current room and its exits.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location<'session> {
    /// Current room name.
    pub name: &'session str,
    /// Neighbour names in stored order.
    pub neighbours: &'session [String],
}

/// A single traversal from the start room towards the end room.
///
/// The session owns its graph; nothing else can mutate the rooms while a
/// player is moving through them.
///
/// # Examples
/// ```
/// use adventure_core::{MoveOutcome, Record, Session, SessionState, decode};
///
/// let graph = decode(&[
///     Record::new("a", "ROOM NAME: A\nCONNECTION 1: B\nROOM TYPE: START_ROOM\n"),
///     Record::new("b", "ROOM NAME: B\nCONNECTION 1: A\nCONNECTION 2: C\nROOM TYPE: MID_ROOM\n"),
///     Record::new("c", "ROOM NAME: C\nCONNECTION 1: B\nROOM TYPE: END_ROOM\n"),
/// ])?;
/// let mut session = Session::new(graph)?;
/// assert_eq!(session.move_to("C"), MoveOutcome::Rejected);
/// assert_eq!(session.move_to("B"), MoveOutcome::Moved { won: false });
/// assert_eq!(session.move_to("C"), MoveOutcome::Moved { won: true });
/// assert_eq!(session.state(), SessionState::Won);
/// assert_eq!(session.path_taken(), ["B".to_owned(), "C".to_owned()]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct Session {
    graph: Graph,
    current: Node,
    path: Vec<String>,
    state: SessionState,
}

impl Session {
    /// Starts a session in the graph's start room.
    ///
    /// # Errors
    /// Returns [`SessionError::RoleCount`] unless the graph holds exactly one
    /// start room and exactly one end room.
    pub fn new(graph: Graph) -> Result<Self, SessionError> {
        for role in [Role::Start, Role::End] {
            let found = graph.rooms_with_role(role).count();
            if found != 1 {
                return Err(SessionError::RoleCount { role, found });
            }
        }
        let current = graph
            .rooms_with_role(Role::Start)
            .next()
            .cloned()
            .ok_or(SessionError::RoleCount {
                role: Role::Start,
                found: 0,
            })?;
        debug!(start = current.name(), "session started");
        Ok(Self {
            graph,
            current,
            path: Vec::new(),
            state: SessionState::Playing,
        })
    }

    /// Moves to `target` if it is a neighbour of the current room.
    ///
    /// Matching is exact and case-sensitive. Rejected moves leave the session
    /// unchanged.
    pub fn move_to(&mut self, target: &str) -> MoveOutcome {
        if self.state == SessionState::Won {
            return MoveOutcome::AlreadyWon;
        }
        if !self.current.is_linked_to(target) {
            debug!(target, "move rejected");
            return MoveOutcome::Rejected;
        }
        let Some(next) = self.graph.node(target) else {
            return MoveOutcome::Rejected;
        };

        self.current = next.clone();
        self.path.push(target.to_owned());
        let won = self.current.role() == Role::End;
        if won {
            self.state = SessionState::Won;
            info!(steps = self.steps(), "end room reached");
        }
        MoveOutcome::Moved { won }
    }

    /// Current room and its exits.
    #[must_use]
    pub fn describe_current(&self) -> Location<'_> {
        let node = &self.current;
        Location {
            name: node.name(),
            neighbours: node.neighbours(),
        }
    }

    /// Rooms entered after the start room, revisits included.
    #[must_use]
    pub fn path_taken(&self) -> &[String] {
        &self.path
    }

    /// Number of successful moves.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len()
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns whether the end room has been reached.
    #[must_use]
    pub fn is_won(&self) -> bool {
        self.state == SessionState::Won
    }

    /// The graph being traversed.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    /// Start `S` links to `M`, which links to end `E`; `S` also links to `X`.
    #[fixture]
    fn graph() -> Graph {
        let mut graph = Graph::default();
        for (name, role) in [
            ("S", Role::Start),
            ("M", Role::Mid),
            ("E", Role::End),
            ("X", Role::Mid),
        ] {
            graph
                .insert(Node::new(name, name, role))
                .expect("unique names");
        }
        graph.link(0, 1).expect("S-M");
        graph.link(1, 2).expect("M-E");
        graph.link(0, 3).expect("S-X");
        graph
    }

    #[rstest]
    fn starts_in_start_room(graph: Graph) {
        let session = Session::new(graph).expect("valid roles");
        let here = session.describe_current();
        assert_eq!(here.name, "S");
        assert_eq!(here.neighbours, ["M".to_owned(), "X".to_owned()]);
        assert_eq!(session.steps(), 0);
        assert!(session.path_taken().is_empty());
        assert_eq!(session.state(), SessionState::Playing);
    }

    #[rstest]
    #[case::not_adjacent("E")]
    #[case::wrong_case("m")]
    #[case::unknown("Nowhere")]
    #[case::current("S")]
    fn rejected_moves_change_nothing(graph: Graph, #[case] target: &str) {
        let mut session = Session::new(graph).expect("valid roles");
        assert_eq!(session.move_to(target), MoveOutcome::Rejected);
        assert_eq!(session.describe_current().name, "S");
        assert_eq!(session.steps(), 0);
    }

    #[rstest]
    fn start_room_need_not_come_first() {
        let mut graph = Graph::default();
        for (name, role) in [("E", Role::End), ("M", Role::Mid), ("S", Role::Start)] {
            graph
                .insert(Node::new(name, name, role))
                .expect("unique names");
        }
        graph.link(2, 1).expect("S-M");
        graph.link(1, 0).expect("M-E");

        let mut session = Session::new(graph).expect("valid roles");
        assert_eq!(session.describe_current().name, "S");
        assert_eq!(session.steps(), 0);
        assert_eq!(session.move_to("M"), MoveOutcome::Moved { won: false });
        let here = session.describe_current();
        assert_eq!(here.name, "M");
        assert_eq!(here.neighbours, ["S".to_owned(), "E".to_owned()]);
        assert_eq!(session.steps(), 1);
        assert_eq!(session.path_taken(), ["M".to_owned()]);
    }

    #[rstest]
    fn path_includes_revisits(graph: Graph) {
        let mut session = Session::new(graph).expect("valid roles");
        for target in ["X", "S", "M"] {
            assert_eq!(session.move_to(target), MoveOutcome::Moved { won: false });
        }
        assert_eq!(session.move_to("E"), MoveOutcome::Moved { won: true });
        assert_eq!(session.path_taken(), ["X", "S", "M", "E"].map(String::from));
        assert_eq!(session.steps(), 4);
        assert!(session.is_won());
    }

    #[rstest]
    fn won_session_rejects_further_moves(graph: Graph) {
        let mut session = Session::new(graph).expect("valid roles");
        session.move_to("M");
        session.move_to("E");
        assert_eq!(session.move_to("M"), MoveOutcome::AlreadyWon);
        assert_eq!(session.describe_current().name, "E");
        assert_eq!(session.steps(), 2);
    }

    #[rstest]
    #[case::no_start(0, Role::Start, 0)]
    #[case::two_ends(1, Role::End, 2)]
    fn new_requires_unique_roles(
        graph: Graph,
        #[case] index: usize,
        #[case] role: Role,
        #[case] found: usize,
    ) {
        let mut graph = graph;
        let replacement = if index == 0 { Role::Mid } else { Role::End };
        graph
            .node_at_mut(index)
            .expect("room exists")
            .set_role(replacement);
        assert_eq!(
            Session::new(graph).expect_err("roles are wrong"),
            SessionError::RoleCount { role, found }
        );
    }
}
