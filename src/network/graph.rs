//! Binary constraint network built on petgraph.

use crate::error::{CspError, Result};
use crate::model::{ConstraintId, SetId, VarId, VcSet};
use log::debug;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::fmt;

/// Graph view of a [`VcSet`]: variables are vertices, constraints are
/// edges.
///
/// Each constraint becomes one undirected edge between the vertices of the
/// first and the last variable it references (a self-loop for unary
/// constraints). Vertex `i` is the variable with handle index `i`.
///
/// The network stores handles only. It remembers the identity and size of
/// the set it was built from; [`validate`](Self::validate) rejects any
/// other set, or the same set after variables or constraints were added.
///
/// # Examples
///
/// ```
/// use u_csp::model::VcSet;
/// use u_csp::network::BinaryNetwork;
///
/// let mut set = VcSet::new();
/// set.add_bounded_variable("A", 0i64, 0, 3, 1).unwrap();
/// set.add_bounded_variable("B", 0i64, 0, 3, 1).unwrap();
/// set.add_constraint("lt", "A<B", &["A", "B"], |s, ids| {
///     Ok(s.value::<i64>(&ids[0])? < s.value::<i64>(&ids[1])?)
/// })
/// .unwrap();
///
/// let network = BinaryNetwork::build(&set);
/// assert_eq!(network.vertex_count(), 2);
/// assert_eq!(network.edge_count(), 1);
/// assert!(network.validate(&set).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryNetwork {
    graph: UnGraph<VarId, ConstraintId>,
    source: SetId,
    num_variables: usize,
    num_constraints: usize,
}

impl BinaryNetwork {
    /// Builds the network for the current contents of `set`.
    pub fn build(set: &VcSet) -> Self {
        let mut graph = UnGraph::with_capacity(set.num_variables(), set.num_constraints());
        for handle in set.handles() {
            graph.add_node(handle);
        }
        for (i, constraint) in set.constraints().iter().enumerate() {
            let (first, last) = constraint.endpoints();
            graph.add_edge(
                NodeIndex::new(first.index()),
                NodeIndex::new(last.index()),
                ConstraintId(i),
            );
        }
        debug!(
            "built network: {} vertices, {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        Self {
            graph,
            source: set.set_id(),
            num_variables: set.num_variables(),
            num_constraints: set.num_constraints(),
        }
    }

    /// Fails with [`CspError::NetworkMismatch`] unless `set` is the
    /// unmodified source of this network.
    pub fn validate(&self, set: &VcSet) -> Result<()> {
        if set.set_id() != self.source
            || set.num_variables() != self.num_variables
            || set.num_constraints() != self.num_constraints
        {
            return Err(CspError::NetworkMismatch);
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Variables in vertex order.
    pub fn vertices(&self) -> impl Iterator<Item = VarId> + '_ {
        self.graph.node_indices().map(|n| self.graph[n])
    }

    /// `(first, last, constraint)` for every edge.
    pub fn edges(&self) -> impl Iterator<Item = (VarId, VarId, ConstraintId)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (self.graph[e.source()], self.graph[e.target()], *e.weight()))
    }

    fn node(&self, var: VarId) -> Option<NodeIndex> {
        let n = NodeIndex::new(var.index());
        (n.index() < self.graph.node_count()).then_some(n)
    }

    /// Distinct variables sharing an edge with `var`.
    pub fn neighbors(&self, var: VarId) -> Vec<VarId> {
        let Some(n) = self.node(var) else {
            return Vec::new();
        };
        let mut out: Vec<VarId> = self.graph.neighbors(n).map(|m| self.graph[m]).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Number of edges incident to `var`.
    pub fn degree(&self, var: VarId) -> usize {
        self.node(var).map_or(0, |n| self.graph.edges(n).count())
    }

    /// Number of connected components.
    pub fn component_count(&self) -> usize {
        connected_components(&self.graph)
    }

    /// Vertices whose variable is free, in vertex order.
    pub fn free_vertices(&self, set: &VcSet) -> Vec<VarId> {
        self.vertices()
            .filter(|&v| set.get(v).is_some_and(|var| var.is_free()))
            .collect()
    }

    /// Evaluates the constraint of every edge.
    pub fn check(&self, set: &VcSet) -> Result<bool> {
        for edge in self.graph.edge_references() {
            if !set.constraint_at(*edge.weight()).check(set)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Evaluates only edges whose endpoints are both labeled.
    ///
    /// Interior variables of n-ary constraints must be labeled as well,
    /// otherwise the constraint would read a stale value.
    pub fn check_labeled(&self, set: &VcSet, labeled: &[bool]) -> Result<bool> {
        let is_labeled = |n: NodeIndex| labeled.get(n.index()).copied().unwrap_or(false);
        for edge in self.graph.edge_references() {
            if !is_labeled(edge.source()) || !is_labeled(edge.target()) {
                continue;
            }
            let constraint = set.constraint_at(*edge.weight());
            if constraint.is_ready(labeled) && !constraint.check(set)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Textual listing of vertices and edges with the set's ids.
    pub fn display<'a>(&'a self, set: &'a VcSet) -> NetworkDisplay<'a> {
        NetworkDisplay { network: self, set }
    }
}

/// Helper returned by [`BinaryNetwork::display`].
pub struct NetworkDisplay<'a> {
    network: &'a BinaryNetwork,
    set: &'a VcSet,
}

impl fmt::Display for NetworkDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |v: VarId| self.set.get(v).map_or("?", |var| var.id());
        writeln!(f, "Vertices:")?;
        for v in self.network.vertices() {
            writeln!(f, "  {} (degree {})", name(v), self.network.degree(v))?;
        }
        writeln!(f, "Edges:")?;
        for (a, b, c) in self.network.edges() {
            let constraint = self.set.constraints().get(c.index());
            writeln!(
                f,
                "  {} -- {} : {}",
                name(a),
                name(b),
                constraint.map_or("?", |c| c.expression())
            )?;
        }
        Ok(())
    }
}
