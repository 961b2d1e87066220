//! Room graph model shared by the builder, the record codec and the
//! traversal engine.
//!
//! A [`Graph`] owns its rooms outright. Rooms refer to each other by name, and
//! the graph is handed from one stage to the next by value so no two stages
//! ever mutate it concurrently.

mod invariants;
mod node;

use std::collections::HashSet;

pub use self::{
    invariants::{GraphInvariant, GraphInvariantChecker, GraphInvariantViolation},
    node::{Node, Role},
};

pub(crate) use self::node::LinkRejection;

/// Number of rooms in every generated graph.
pub const GRAPH_SIZE: usize = 7;
/// Fewest neighbours a generated room may have.
pub const MIN_DEGREE: usize = 3;
/// Most neighbours any room may have.
pub const MAX_DEGREE: usize = 6;

/// An undirected graph of uniquely named rooms.
///
/// # Examples
/// ```
/// use adventure_core::{Catalog, GraphBuilder, Role};
///
/// let graph = GraphBuilder::new()
///     .with_rng_seed(11)
///     .build(&Catalog::default())
///     .expect("default catalog builds");
/// assert_eq!(graph.len(), 7);
/// assert_eq!(graph.rooms_with_role(Role::Start).count(), 1);
/// assert!(graph.invariants().check_all().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the graph holds no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Rooms in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Looks a room up by exact name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.name() == name)
    }

    /// Position of the named room in [`Graph::nodes`].
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|node| node.name() == name)
    }

    /// Rooms holding `role`.
    pub fn rooms_with_role(&self, role: Role) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |node| node.role() == role)
    }

    /// Number of undirected edges, counting each symmetric pair once.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        let endpoints: usize = self.nodes.iter().map(Node::degree).sum();
        endpoints / 2
    }

    /// Returns whether every room has at least `minimum` neighbours.
    #[must_use]
    pub fn meets_min_degree(&self, minimum: usize) -> bool {
        self.nodes.iter().all(|node| node.degree() >= minimum)
    }

    /// Compares two graphs by room names, roles and neighbour sets.
    ///
    /// Room order, neighbour order and record labels are ignored.
    #[must_use]
    pub fn structurally_eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.nodes.iter().all(|node| {
            other.node(node.name()).is_some_and(|peer| {
                node.role() == peer.role() && neighbour_set(node) == neighbour_set(peer)
            })
        })
    }

    /// Returns the structural invariant checker for this graph.
    #[must_use]
    pub fn invariants(&self) -> GraphInvariantChecker<'_> {
        GraphInvariantChecker::new(self)
    }

    pub(crate) fn node_at(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub(crate) fn node_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_mut(index)
    }

    /// Appends `node`, handing it back if the name is already taken.
    pub(crate) fn insert(&mut self, node: Node) -> Result<(), Node> {
        if self.node(node.name()).is_some() {
            return Err(node);
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Links the rooms at `a` and `b` in both directions, or neither.
    pub(crate) fn link(&mut self, a: usize, b: usize) -> Result<(), LinkRejection> {
        let (Some(source), Some(target)) = (self.nodes.get(a), self.nodes.get(b)) else {
            return Err(LinkRejection::MissingRoom);
        };
        source.check_link(target.name())?;
        target.check_link(source.name())?;
        let source_name = source.name().to_owned();
        let target_name = target.name().to_owned();

        if let Some(node) = self.nodes.get_mut(a) {
            node.push_neighbour(&target_name)?;
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.push_neighbour(&source_name)?;
        }
        Ok(())
    }
}

fn neighbour_set(node: &Node) -> HashSet<&str> {
    node.neighbours().iter().map(String::as_str).collect()
}
