//! Degree-bound invariant enforcement for the room graph.

use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::{Graph, MAX_DEGREE, MIN_DEGREE};

pub(super) fn check_degree_bounds(
    graph: &Graph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    for node in graph.nodes() {
        let degree = node.degree();
        if !(MIN_DEGREE..=MAX_DEGREE).contains(&degree) {
            mode.record(GraphInvariantViolation::DegreeBounds {
                room: node.name().to_owned(),
                degree,
                min: MIN_DEGREE,
                max: MAX_DEGREE,
            })?;
        }
    }
    Ok(())
}
