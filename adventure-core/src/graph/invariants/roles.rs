//! Room-count and role-cardinality invariants.

use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::{GRAPH_SIZE, Graph, Role};

pub(super) fn check_room_count(
    graph: &Graph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    if graph.len() == GRAPH_SIZE {
        return Ok(());
    }
    mode.record(GraphInvariantViolation::RoomCount {
        count: graph.len(),
        expected: GRAPH_SIZE,
    })
}

/// Requires exactly one start room and exactly one end room. A single room
/// cannot hold both roles, so this also guarantees they are distinct.
pub(super) fn check_role_cardinality(
    graph: &Graph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for role in [Role::Start, Role::End] {
        let count = graph.rooms_with_role(role).count();
        if count != 1 {
            mode.record(GraphInvariantViolation::RoleCount { role, count })?;
        }
    }
    Ok(())
}
