//! Symmetric-link invariant enforcement for the room graph.
//!
//! Every listed neighbour must resolve to a room that lists the origin back.

use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::Graph;

pub(super) fn check_symmetry(
    graph: &Graph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for node in graph.nodes() {
        for target in node.neighbours() {
            let violation = match graph.node(target) {
                None => GraphInvariantViolation::UnknownNeighbour {
                    origin: node.name().to_owned(),
                    target: target.clone(),
                },
                Some(peer) if !peer.is_linked_to(node.name()) => {
                    GraphInvariantViolation::MissingBacklink {
                        origin: node.name().to_owned(),
                        target: target.clone(),
                    }
                }
                Some(_) => continue,
            };
            mode.record(violation)?;
        }
    }
    Ok(())
}
