//! Goto static graph representation for route planning algorithms.
//!
//! Nodes and edges can be identified by a unique id, going from `0` to `n-1` and `m-1` respectively, where `n` is the number of nodes and `m` the number of directed arcs.
//! We store the graph as an adjacency array using three collections: `first_out`, `head` and `weight`.
//! `head` and `weight` have each `m` elements.
//! `first_out` has `n+1` elements.
//! The first element of `first_out` is always 0 and the last one `m`.
//! `first_out[x]` contains the id of the first edge that is an outgoing edge of node `x`.
//! Thus, `head[first_out[x]..first_out[x+1]]` contains all neighbors of `x`.

use super::*;
use crate::io::*;

/// Container struct for the three collections of a graph.
/// Generic over the types of the three data collections.
/// Anything that can be dereferenced to a slice works.
/// Both owned (`Vec<T>`, `Box<[T]>`) and shared (`Rc<[T]>`, `Arc<[T]>`) or borrowed (slices) data is possible.
#[derive(Debug, Clone)]
pub struct FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]>,
{
    // index of first edge of each node +1 entry in the end
    first_out: FirstOutContainer,
    // the node ids to which each edge points
    head: HeadContainer,
    // the cost of each edge
    weight: WeightContainer,
}

pub type OwnedGraph = FirstOutGraph<Vec<EdgeId>, Vec<NodeId>, Vec<EdgeCost>>;

impl<FirstOutContainer, HeadContainer, WeightContainer> FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]>,
{
    /// Borrow a slice of the first_out data
    pub fn first_out(&self) -> &[EdgeId] {
        self.first_out.as_ref()
    }
    /// Borrow a slice of the head data
    pub fn head(&self) -> &[NodeId] {
        self.head.as_ref()
    }
    /// Borrow a slice of the weight data
    pub fn weight(&self) -> &[EdgeCost] {
        self.weight.as_ref()
    }

    /// Create a new `FirstOutGraph` from the three containers.
    pub fn new(first_out: FirstOutContainer, head: HeadContainer, weight: WeightContainer) -> FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer> {
        assert!(first_out.as_ref().len() < NodeId::MAX as usize);
        assert!(head.as_ref().len() < EdgeId::MAX as usize);
        assert_eq!(*first_out.as_ref().first().unwrap(), 0);
        assert_eq!(*first_out.as_ref().last().unwrap() as usize, head.as_ref().len());
        assert_eq!(weight.as_ref().len(), head.as_ref().len());

        FirstOutGraph { first_out, head, weight }
    }

    /// Decompose the graph into its three separate data containers
    pub fn decompose(self) -> (FirstOutContainer, HeadContainer, WeightContainer) {
        (self.first_out, self.head, self.weight)
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]> + AsMut<[EdgeCost]>,
{
    /// Overwrite the cost of an edge.
    pub fn set_cost(&mut self, edge_id: EdgeId, cost: EdgeCost) {
        self.weight.as_mut()[edge_id as usize] = cost;
    }
}

impl OwnedGraph {
    /// Build an owned graph from per-node adjacency lists.
    pub fn from_adjacency_lists(adjacency_lists: Vec<Vec<Link>>) -> OwnedGraph {
        // create first_out array by doing a prefix sum over the adjacency list sizes
        let first_out = {
            let degrees = adjacency_lists.iter().map(|neighbors| neighbors.len() as EdgeId);
            degrees_to_first_out(degrees).collect()
        };

        // append all adjacency lists and split the pairs into two separate vectors
        let (head, weight) = adjacency_lists
            .into_iter()
            .flat_map(|neighbors| neighbors.into_iter().map(|Link { node, cost }| (node, cost)))
            .unzip();

        OwnedGraph::new(first_out, head, weight)
    }

    /// Build an owned graph from the four raw input arrays.
    /// `capacity` is the size of the energy store the energy deltas are validated against.
    pub fn from_raw(capacity: EnergyUnits, first_out: Vec<EdgeId>, head: Vec<NodeId>, time: Vec<Weight>, energy: Vec<EnergyUnits>) -> OwnedGraph {
        let weight = edge_costs(capacity, &time, &energy);
        OwnedGraph::new(first_out, head, weight)
    }
}

impl<G: for<'a> LinkIterGraph<'a>> BuildReversed<G> for OwnedGraph {
    fn reversed(graph: &G) -> Self {
        // vector of adjacency lists for the reverse graph
        let mut reversed: Vec<Vec<Link>> = (0..graph.num_nodes()).map(|_| Vec::<Link>::new()).collect();

        // iterate over all edges and insert them in the reversed structure
        for node in 0..(graph.num_nodes() as NodeId) {
            for Link { node: neighbor, cost } in graph.neighbor_iter(node) {
                reversed[neighbor as usize].push(Link { node, cost });
            }
        }

        OwnedGraph::from_adjacency_lists(reversed)
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> Graph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]>,
{
    fn num_nodes(&self) -> usize {
        self.first_out().len() - 1
    }

    fn num_arcs(&self) -> usize {
        self.head().len()
    }

    fn degree(&self, node: NodeId) -> usize {
        let node = node as usize;
        (self.first_out()[node + 1] - self.first_out()[node]) as usize
    }
}

impl<'a, FirstOutContainer, HeadContainer, WeightContainer> LinkIterGraph<'a> for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]>,
{
    #[allow(clippy::type_complexity)]
    type Iter = std::iter::Map<std::iter::Zip<std::slice::Iter<'a, NodeId>, std::slice::Iter<'a, EdgeCost>>, fn((&NodeId, &EdgeCost)) -> Link>;

    #[inline]
    fn neighbor_iter(&'a self, node: NodeId) -> Self::Iter {
        let range = self.neighbor_edge_indices_usize(node);
        self.head()[range.clone()]
            .iter()
            .zip(self.weight()[range].iter())
            .map(|(&neighbor, &cost)| Link { node: neighbor, cost })
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> RandomLinkAccessGraph for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]>,
{
    #[inline]
    fn link(&self, edge_id: EdgeId) -> Link {
        Link {
            node: self.head()[edge_id as usize],
            cost: self.weight()[edge_id as usize],
        }
    }

    fn edge_index(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        let first_out = self.first_out()[from as usize];
        let range = self.neighbor_edge_indices_usize(from);
        self.head()[range].iter().position(|&head| head == to).map(|pos| pos as EdgeId + first_out)
    }

    #[inline]
    fn neighbor_edge_indices(&self, node: NodeId) -> Range<EdgeId> {
        (self.first_out()[node as usize] as EdgeId)..(self.first_out()[(node + 1) as usize] as EdgeId)
    }
}

impl<FirstOutContainer, HeadContainer, WeightContainer> Deconstruct for FirstOutGraph<FirstOutContainer, HeadContainer, WeightContainer>
where
    FirstOutContainer: AsRef<[EdgeId]>,
    HeadContainer: AsRef<[NodeId]>,
    WeightContainer: AsRef<[EdgeCost]>,
{
    fn store_each(&self, store: &dyn Fn(&str, &dyn Store) -> std::io::Result<()>) -> std::io::Result<()> {
        store("first_out", &self.first_out())?;
        store("head", &self.head())?;
        store("weights", &self.weight())?;
        Ok(())
    }
}

impl Reconstruct for OwnedGraph {
    fn reconstruct_with(loader: Loader) -> std::io::Result<Self> {
        Ok(OwnedGraph::new(loader.load("first_out")?, loader.load("head")?, loader.load("weights")?))
    }
}

/// Build a first_out array from an iterator of degrees
pub fn degrees_to_first_out<I: Iterator<Item = EdgeId>>(degrees: I) -> impl Iterator<Item = EdgeId> {
    std::iter::once(0).chain(degrees.scan(0, |state, degree| {
        *state += degree;
        Some(*state)
    }))
}
