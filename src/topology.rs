use std::collections::HashSet;

use petgraph::{graphmap::DiGraphMap, Direction};

use crate::relationship::Relationship;

/// Directed AS-level graph built from normalized relationship records.
///
/// Customer edges point from the customer to its provider, peerings are
/// stored as one edge in each direction. There is at most one label per
/// ordered `(from, to)` pair: writing the same pair again replaces the label.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    pub graph: DiGraphMap<u32, Relationship>,
}

impl Topology {
    pub fn new() -> Self {
        Topology {
            graph: DiGraphMap::new(),
        }
    }

    pub fn from_edges(edges: Vec<(u32, u32, Relationship)>) -> Self {
        let mut topo = Topology::new();
        for (asn1, asn2, rel) in edges {
            topo.add_edge(asn1, asn2, rel);
        }
        topo
    }

    /// Insert a directed edge, creating both endpoints if needed. Returns the
    /// label previously stored for this ordered pair, if any.
    pub fn add_edge(&mut self, from: u32, to: u32, rel: Relationship) -> Option<Relationship> {
        self.graph.add_edge(from, to, rel)
    }

    /// Fold `other` into `self`. Nodes and edges are unioned; where both graphs
    /// carry the same ordered pair, the label from `other` wins.
    pub fn merge(&mut self, other: Topology) {
        for asn in other.graph.nodes() {
            self.graph.add_node(asn);
        }
        for (from, to, rel) in other.graph.all_edges() {
            self.graph.add_edge(from, to, *rel);
        }
    }

    /// Reduce partial graphs in iteration order, later partials overwriting
    /// earlier ones on conflicting pairs.
    pub fn merge_all(partials: impl IntoIterator<Item = Topology>) -> Topology {
        let mut partials = partials.into_iter();
        let mut merged = partials.next().unwrap_or_default();
        for partial in partials {
            merged.merge(partial);
        }
        merged
    }

    pub fn contains(&self, asn: u32) -> bool {
        self.graph.contains_node(asn)
    }

    pub fn relationship(&self, from: u32, to: u32) -> Option<Relationship> {
        self.graph.edge_weight(from, to).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn all_asns(&self) -> HashSet<u32> {
        self.graph.nodes().collect()
    }

    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, Relationship)> + '_ {
        self.graph
            .all_edges()
            .map(|(from, to, rel)| (from, to, *rel))
    }

    fn outgoing(&self, asn: u32, rel: Relationship) -> impl Iterator<Item = u32> + '_ {
        self.graph
            .neighbors_directed(asn, Direction::Outgoing)
            .filter(move |&to| self.relationship(asn, to) == Some(rel))
    }

    fn incoming(&self, asn: u32, rel: Relationship) -> impl Iterator<Item = u32> + '_ {
        self.graph
            .neighbors_directed(asn, Direction::Incoming)
            .filter(move |&from| self.relationship(from, asn) == Some(rel))
    }

    pub fn providers_of(&self, asn: u32) -> Option<HashSet<u32>> {
        if !self.contains(asn) {
            return None;
        }
        Some(self.outgoing(asn, Relationship::Customer).collect())
    }

    pub fn customers_of(&self, asn: u32) -> Option<HashSet<u32>> {
        if !self.contains(asn) {
            return None;
        }
        Some(self.incoming(asn, Relationship::Customer).collect())
    }

    pub fn peers_of(&self, asn: u32) -> Option<HashSet<u32>> {
        if !self.contains(asn) {
            return None;
        }
        // peerings are stored in both directions, but a later conflicting
        // write may have left only one of them
        Some(
            self.outgoing(asn, Relationship::Peer)
                .chain(self.incoming(asn, Relationship::Peer))
                .collect(),
        )
    }
}
