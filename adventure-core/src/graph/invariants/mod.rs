//! Structural invariant checks for the room graph.
//!
//! The checkers are surfaced via [`Graph::invariants`] so the builder's
//! post-condition, the property suites and the CLI can all assert graph health
//! without reimplementing traversal logic.

mod degree_bounds;
mod reachability;
mod roles;
mod symmetry;

use thiserror::Error;

use super::{Graph, Role};

use self::{
    degree_bounds::check_degree_bounds,
    reachability::check_reachability,
    roles::{check_role_cardinality, check_room_count},
    symmetry::check_symmetry,
};

/// Enumerates the structural invariants every generated graph satisfies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GraphInvariant {
    /// The graph holds exactly [`super::GRAPH_SIZE`] rooms.
    RoomCount,
    /// Exactly one start room and exactly one end room.
    RoleCardinality,
    /// Every room has between [`super::MIN_DEGREE`] and
    /// [`super::MAX_DEGREE`] neighbours.
    DegreeBounds,
    /// Every listed neighbour exists and lists the room back.
    Symmetry,
    /// Every room is reachable from the start room.
    Reachability,
}

impl GraphInvariant {
    /// Returns all invariants in the order they should be evaluated.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::RoomCount,
            Self::RoleCardinality,
            Self::DegreeBounds,
            Self::Symmetry,
            Self::Reachability,
        ]
    }
}

/// Reports an invariant violation surfaced by [`GraphInvariantChecker`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GraphInvariantViolation {
    /// The graph holds the wrong number of rooms.
    #[error("graph holds {count} room(s), expected {expected}")]
    RoomCount {
        /// Rooms present.
        count: usize,
        /// Rooms required.
        expected: usize,
    },
    /// A role that must be unique is missing or repeated.
    #[error("expected exactly one {role} room, found {count}")]
    RoleCount {
        /// Role whose count is wrong.
        role: Role,
        /// Rooms holding that role.
        count: usize,
    },
    /// A room has too few or too many neighbours.
    #[error("room `{room}` has {degree} connection(s), outside {min}..={max}")]
    DegreeBounds {
        /// Offending room.
        room: String,
        /// Neighbours counted.
        degree: usize,
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// A room lists a neighbour that is not in the graph.
    #[error("room `{origin}` lists unknown neighbour `{target}`")]
    UnknownNeighbour {
        /// Room holding the dangling reference.
        origin: String,
        /// Name that does not resolve.
        target: String,
    },
    /// A link is present in one direction only.
    #[error("edge `{origin}`->`{target}` is missing the reverse link")]
    MissingBacklink {
        /// Room exposing the one-way link.
        origin: String,
        /// Room lacking the reverse link.
        target: String,
    },
    /// Reachability cannot be evaluated without a start room.
    #[error("graph has no start room to traverse from")]
    MissingStart,
    /// A room cannot be reached from the start room.
    #[error("room `{room}` is unreachable from the start room")]
    UnreachableRoom {
        /// Unreachable room.
        room: String,
    },
}

/// Helper returned by [`Graph::invariants`] to run structural checks.
#[derive(Clone, Copy, Debug)]
pub struct GraphInvariantChecker<'graph> {
    graph: &'graph Graph,
}

impl<'graph> GraphInvariantChecker<'graph> {
    pub(super) fn new(graph: &'graph Graph) -> Self {
        Self { graph }
    }

    /// Runs all invariants, returning the first violation encountered.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check_all(&self) -> Result<(), GraphInvariantViolation> {
        self.check_many(GraphInvariant::all())
    }

    /// Runs a custom subset of invariants in the provided order.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
    ) -> Result<(), GraphInvariantViolation> {
        self.run_with_mode(invariants, &mut EvaluationMode::FailFast)
    }

    /// Runs a single invariant.
    ///
    /// # Errors
    /// Returns the first [`GraphInvariantViolation`] found.
    pub fn check(&self, invariant: GraphInvariant) -> Result<(), GraphInvariantViolation> {
        self.check_many([invariant])
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<GraphInvariantViolation> {
        self.collect_many(GraphInvariant::all())
    }

    /// Executes the selected invariants and returns every violation discovered.
    #[must_use]
    pub fn collect_many(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
    ) -> Vec<GraphInvariantViolation> {
        let mut violations = Vec::new();
        let mut mode = EvaluationMode::Collect(&mut violations);
        // Collect mode records instead of failing, so this is always `Ok`.
        let _ = self.run_with_mode(invariants, &mut mode);
        violations
    }

    fn run_with_mode(
        &self,
        invariants: impl IntoIterator<Item = GraphInvariant>,
        mode: &mut EvaluationMode<'_>,
    ) -> Result<(), GraphInvariantViolation> {
        for invariant in invariants {
            dispatch(self.graph, invariant, mode)?;
        }
        Ok(())
    }
}

fn dispatch(
    graph: &Graph,
    invariant: GraphInvariant,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    match invariant {
        GraphInvariant::RoomCount => check_room_count(graph, mode),
        GraphInvariant::RoleCardinality => check_role_cardinality(graph, mode),
        GraphInvariant::DegreeBounds => check_degree_bounds(graph, mode),
        GraphInvariant::Symmetry => check_symmetry(graph, mode),
        GraphInvariant::Reachability => check_reachability(graph, mode),
    }
}

pub(super) enum EvaluationMode<'a> {
    FailFast,
    Collect(&'a mut Vec<GraphInvariantViolation>),
}

impl EvaluationMode<'_> {
    fn record(&mut self, violation: GraphInvariantViolation) -> Result<(), GraphInvariantViolation> {
        match self {
            Self::FailFast => Err(violation),
            Self::Collect(sink) => {
                sink.push(violation);
                Ok(())
            }
        }
    }
}
