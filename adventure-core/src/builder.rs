//! Random room-graph construction.
//!
//! The builder draws [`GRAPH_SIZE`] distinct rooms from a [`Catalog`], assigns
//! the start and end roles, then adds random symmetric links in full passes
//! until every room reaches [`MIN_DEGREE`]. Each retry loop carries a
//! configurable ceiling so a pathological random stream ends in an error
//! instead of spinning forever.

use std::collections::HashSet;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::{Span, debug, field, instrument};

use crate::{
    catalog::Catalog,
    error::{BuildError, DrawStage},
    graph::{GRAPH_SIZE, Graph, GraphInvariant, MIN_DEGREE, Node, Role},
};

const DEFAULT_MAX_DRAWS: usize = 10_000;
const DEFAULT_MAX_PASSES: usize = 10_000;

/// Counters describing how a graph was built.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BuildStats {
    /// Seed the RNG was initialised with. Passing it back through
    /// [`GraphBuilder::with_rng_seed`] reproduces the graph.
    pub seed: u64,
    /// Random draws spent selecting rooms and roles.
    pub draws: usize,
    /// Full edge passes run before every room reached the minimum degree.
    pub passes: usize,
}

/// Configures and runs room-graph construction.
///
/// # Examples
/// ```
/// use adventure_core::{Catalog, GraphBuilder};
///
/// let builder = GraphBuilder::new().with_rng_seed(42);
/// let (first, stats) = builder.build_with_stats(&Catalog::default())?;
/// let second = builder.build(&Catalog::default())?;
/// assert!(first.structurally_eq(&second));
/// assert_eq!(stats.seed, 42);
/// assert!(stats.passes >= 1);
/// # Ok::<(), adventure_core::BuildError>(())
/// ```
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    rng_seed: Option<u64>,
    max_draws: usize,
    max_passes: usize,
    check_connectivity: bool,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self {
            rng_seed: None,
            max_draws: DEFAULT_MAX_DRAWS,
            max_passes: DEFAULT_MAX_PASSES,
            check_connectivity: true,
        }
    }
}

impl GraphBuilder {
    /// Creates a builder with an entropy-seeded RNG and default ceilings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the RNG so construction is deterministic.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Caps the random draws each selection loop may spend.
    #[must_use]
    pub fn with_max_draws(mut self, max_draws: usize) -> Self {
        self.max_draws = max_draws;
        self
    }

    /// Caps the full edge passes construction may run.
    #[must_use]
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Enables or disables the post-construction reachability check.
    #[must_use]
    pub fn with_connectivity_check(mut self, enabled: bool) -> Self {
        self.check_connectivity = enabled;
        self
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Returns the per-loop draw ceiling.
    #[must_use]
    pub fn max_draws(&self) -> usize {
        self.max_draws
    }

    /// Returns the edge pass ceiling.
    #[must_use]
    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Builds a graph from `catalog`.
    ///
    /// # Errors
    /// See [`GraphBuilder::build_with_stats`].
    pub fn build(&self, catalog: &Catalog) -> Result<Graph, BuildError> {
        self.build_with_stats(catalog).map(|(graph, _)| graph)
    }

    /// Builds a graph from `catalog` and reports how construction went.
    ///
    /// # Errors
    /// Returns [`BuildError::InvalidParameter`] for a zero ceiling,
    /// [`BuildError::CatalogTooSmall`] when the catalog cannot supply enough
    /// rooms, [`BuildError::SelectionExhausted`] or
    /// [`BuildError::EdgePassesExhausted`] when a retry loop hits its ceiling,
    /// and [`BuildError::InvariantViolation`] when the finished graph fails
    /// its structural checks.
    #[instrument(
        name = "builder.build",
        err,
        skip(self, catalog),
        fields(
            catalog_len = catalog.len(),
            seed = field::Empty,
            passes = field::Empty,
            edges = field::Empty,
        ),
    )]
    pub fn build_with_stats(&self, catalog: &Catalog) -> Result<(Graph, BuildStats), BuildError> {
        self.validate(catalog)?;
        let seed = self.rng_seed.unwrap_or_else(rand::random);
        let span = Span::current();
        span.record("seed", seed);

        let mut rng = SmallRng::seed_from_u64(seed);
        let (mut graph, mut draws) = self.select_rooms(catalog, &mut rng)?;
        draws += self.assign_roles(&mut graph, &mut rng)?;
        let passes = self.connect_rooms(&mut graph, &mut rng)?;

        self.verify(&graph)?;
        span.record("passes", passes);
        span.record("edges", graph.edge_count());
        debug!(draws, passes, "graph construction completed");

        Ok((
            graph,
            BuildStats {
                seed,
                draws,
                passes,
            },
        ))
    }

    fn validate(&self, catalog: &Catalog) -> Result<(), BuildError> {
        if self.max_draws == 0 {
            return Err(BuildError::InvalidParameter {
                parameter: "max_draws",
            });
        }
        if self.max_passes == 0 {
            return Err(BuildError::InvalidParameter {
                parameter: "max_passes",
            });
        }
        if catalog.len() < GRAPH_SIZE {
            return Err(BuildError::CatalogTooSmall {
                entries: catalog.len(),
                required: GRAPH_SIZE,
            });
        }
        Ok(())
    }

    /// Samples [`GRAPH_SIZE`] catalog entries without replacement by redrawing
    /// whenever an already chosen index comes up.
    fn select_rooms(
        &self,
        catalog: &Catalog,
        rng: &mut SmallRng,
    ) -> Result<(Graph, usize), BuildError> {
        let mut chosen = HashSet::with_capacity(GRAPH_SIZE);
        let mut graph = Graph::default();
        let mut draws = 0;

        while graph.len() < GRAPH_SIZE {
            if draws == self.max_draws {
                return Err(BuildError::SelectionExhausted {
                    stage: DrawStage::Rooms,
                    draws,
                });
            }
            draws += 1;
            let index = rng.gen_range(0..catalog.len());
            if !chosen.insert(index) {
                continue;
            }
            let Some(entry) = catalog.get(index) else {
                continue;
            };
            // Catalog names are unique, so insertion cannot collide.
            let _ = graph.insert(Node::new(entry.name(), entry.label(), Role::Mid));
        }
        Ok((graph, draws))
    }

    /// Picks the start room, then redraws the end room until it differs.
    fn assign_roles(&self, graph: &mut Graph, rng: &mut SmallRng) -> Result<usize, BuildError> {
        let start = rng.gen_range(0..GRAPH_SIZE);
        let mut end = start;
        let mut draws = 1;

        while end == start {
            if draws == self.max_draws {
                return Err(BuildError::SelectionExhausted {
                    stage: DrawStage::EndRoom,
                    draws,
                });
            }
            draws += 1;
            end = rng.gen_range(0..GRAPH_SIZE);
        }

        for (index, role) in [(start, Role::Start), (end, Role::End)] {
            if let Some(node) = graph.node_at_mut(index) {
                node.set_role(role);
            }
        }
        Ok(draws)
    }

    /// Runs full passes of one random link attempt per room until every room
    /// has at least [`MIN_DEGREE`] neighbours. Returns the passes taken.
    fn connect_rooms(&self, graph: &mut Graph, rng: &mut SmallRng) -> Result<usize, BuildError> {
        let mut passes = 0;
        while !graph.meets_min_degree(MIN_DEGREE) {
            if passes == self.max_passes {
                return Err(BuildError::EdgePassesExhausted { passes });
            }
            passes += 1;
            for source in 0..GRAPH_SIZE {
                let target = rng.gen_range(0..GRAPH_SIZE);
                // Self links, repeats and full rooms are skipped; the next pass
                // tries again.
                let _ = graph.link(source, target);
            }
        }
        Ok(passes)
    }

    fn verify(&self, graph: &Graph) -> Result<(), BuildError> {
        let checker = graph.invariants();
        if self.check_connectivity {
            checker.check_all()?;
        } else {
            checker.check_many(
                GraphInvariant::all()
                    .into_iter()
                    .filter(|invariant| *invariant != GraphInvariant::Reachability),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MAX_DEGREE;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(7)]
    #[case(0xDEAD_BEEF)]
    fn seeded_build_satisfies_every_invariant(#[case] seed: u64) {
        let graph = GraphBuilder::new()
            .with_rng_seed(seed)
            .build(&Catalog::default())
            .expect("default catalog builds");
        graph.invariants().check_all().expect("graph is valid");
        for node in graph.nodes() {
            assert!((MIN_DEGREE..=MAX_DEGREE).contains(&node.degree()));
        }
    }

    #[test]
    fn same_seed_reproduces_connection_order() {
        let builder = GraphBuilder::new().with_rng_seed(99);
        let first = builder.build(&Catalog::default()).expect("build");
        let second = builder.build(&Catalog::default()).expect("build");
        let order = |graph: &Graph| -> Vec<(String, Vec<String>)> {
            graph
                .nodes()
                .iter()
                .map(|node| (node.name().to_owned(), node.neighbours().to_vec()))
                .collect()
        };
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn exact_catalog_uses_every_entry() {
        let catalog = Catalog::new([
            ("A", "a"),
            ("B", "b"),
            ("C", "c"),
            ("D", "d"),
            ("E", "e"),
            ("F", "f"),
            ("G", "g"),
        ])
        .expect("catalog is valid");
        let graph = GraphBuilder::new()
            .with_rng_seed(3)
            .build(&catalog)
            .expect("seven rooms build");
        let mut names: Vec<&str> = graph.nodes().iter().map(Node::name).collect();
        names.sort_unstable();
        assert_eq!(names, ["A", "B", "C", "D", "E", "F", "G"]);
    }

    #[rstest]
    #[case::draws(GraphBuilder::new().with_max_draws(0), "max_draws")]
    #[case::passes(GraphBuilder::new().with_max_passes(0), "max_passes")]
    fn zero_ceilings_are_rejected(
        #[case] builder: GraphBuilder,
        #[case] parameter: &'static str,
    ) {
        let err = builder
            .build(&Catalog::default())
            .expect_err("zero ceilings are invalid");
        assert_eq!(err, BuildError::InvalidParameter { parameter });
    }

    #[test]
    fn draw_ceiling_surfaces_as_error() {
        // Seven distinct rooms need at least seven draws.
        let err = GraphBuilder::new()
            .with_rng_seed(1)
            .with_max_draws(6)
            .build(&Catalog::default())
            .expect_err("six draws cannot select seven rooms");
        assert_eq!(
            err,
            BuildError::SelectionExhausted {
                stage: DrawStage::Rooms,
                draws: 6,
            }
        );
    }

    #[test]
    fn pass_ceiling_surfaces_as_error() {
        // One pass adds at most seven edges, short of the ~11 the minimum
        // degree requires.
        let err = GraphBuilder::new()
            .with_rng_seed(5)
            .with_max_passes(1)
            .build(&Catalog::default())
            .expect_err("one pass cannot reach degree three everywhere");
        assert_eq!(err, BuildError::EdgePassesExhausted { passes: 1 });
    }
}
