//! Reachability invariant enforcement for the room graph.
//!
//! Walks the graph breadth-first from the start room and reports every room
//! the walk never visits. Edge construction only enforces a minimum degree, so
//! connectedness is checked here rather than assumed.

use std::collections::VecDeque;

use super::{EvaluationMode, GraphInvariantViolation};
use crate::graph::{Graph, Role};

pub(super) fn check_reachability(
    graph: &Graph,
    mode: &mut EvaluationMode<'_>,
) -> Result<(), GraphInvariantViolation> {
    if graph.is_empty() {
        return Ok(());
    }
    let Some(start) = graph
        .nodes()
        .iter()
        .position(|node| node.role() == Role::Start)
    else {
        return mode.record(GraphInvariantViolation::MissingStart);
    };

    let visited = breadth_first(graph, start);
    for (node, seen) in graph.nodes().iter().zip(visited) {
        if !seen {
            mode.record(GraphInvariantViolation::UnreachableRoom {
                room: node.name().to_owned(),
            })?;
        }
    }
    Ok(())
}

/// Returns one flag per room marking whether it is reachable from `start`.
/// Dangling neighbour names are skipped; the symmetry check reports them.
fn breadth_first(graph: &Graph, start: usize) -> Vec<bool> {
    let mut visited = vec![false; graph.len()];
    let mut queue = VecDeque::from([start]);
    if let Some(flag) = visited.get_mut(start) {
        *flag = true;
    }

    while let Some(current) = queue.pop_front() {
        let Some(node) = graph.node_at(current) else {
            continue;
        };
        for neighbour in node.neighbours() {
            let Some(next) = graph.position(neighbour) else {
                continue;
            };
            if let Some(flag) = visited.get_mut(next) {
                if !*flag {
                    *flag = true;
                    queue.push_back(next);
                }
            }
        }
    }
    visited
}
