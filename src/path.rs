//! Unweighted shortest AS paths over a built [`Topology`].
//!
//! Edges are followed in their stored direction and every hop costs one;
//! relationship labels do not constrain the walk, so the paths found are plain
//! reachability paths and not valley-free routes.

use std::collections::{HashMap, VecDeque};

use petgraph::Direction;
use tracing::{debug, info, warn};

use crate::{as_set::AsSet, topology::Topology};

/// Breadth-first search tree rooted at one source AS.
#[derive(Debug, Clone)]
pub struct BfsTree {
    source: u32,
    parent: HashMap<u32, u32>,
}

impl BfsTree {
    pub fn source(&self) -> u32 {
        self.source
    }

    pub fn reaches(&self, target: u32) -> bool {
        target == self.source || self.parent.contains_key(&target)
    }

    /// One shortest path from the source to `target`, both ends included.
    pub fn path_to(&self, target: u32) -> Option<Vec<u32>> {
        if !self.reaches(target) {
            return None;
        }

        let mut path = vec![target];
        let mut current = target;
        while current != self.source {
            current = *self.parent.get(&current)?;
            path.push(current);
        }
        path.reverse();
        Some(path)
    }
}

impl Topology {
    /// Search outwards from `source`. Returns `None` if the AS is not in the
    /// graph.
    pub fn bfs(&self, source: u32) -> Option<BfsTree> {
        if !self.contains(source) {
            return None;
        }

        let mut parent = HashMap::new();
        let mut queue = VecDeque::from([source]);

        while let Some(asn) = queue.pop_front() {
            for next in self.graph.neighbors_directed(asn, Direction::Outgoing) {
                if next == source || parent.contains_key(&next) {
                    continue;
                }
                parent.insert(next, asn);
                queue.push_back(next);
            }
        }

        Some(BfsTree { source, parent })
    }

    pub fn shortest_path(&self, source: u32, target: u32) -> Option<Vec<u32>> {
        if !self.contains(target) {
            return None;
        }
        self.bfs(source)?.path_to(target)
    }
}

/// A path found between a source AS and a target AS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsPath {
    pub source: u32,
    pub target: u32,
    pub hops: Vec<u32>,
}

/// A source/target pair for which no path was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDiagnostic {
    /// The source AS is not in the graph; none of its pairs were queried.
    SourceMissing(u32),
    TargetMissing { source: u32, target: u32 },
    NoPath { source: u32, target: u32 },
}

#[derive(Debug, Clone, Default)]
pub struct PathReport {
    pub paths: Vec<AsPath>,
    pub diagnostics: Vec<PathDiagnostic>,
}

/// Find a shortest path for every `(source, target)` pair, in set order.
///
/// One BFS is run per source and shared by all of its targets. Pairs with an
/// endpoint outside the graph, or with no directed path, are recorded as
/// diagnostics and do not stop the search.
pub fn find_paths(topo: &Topology, sources: &AsSet, targets: &AsSet) -> PathReport {
    let mut report = PathReport::default();

    for source in sources.iter() {
        let tree = match topo.bfs(source) {
            Some(tree) => tree,
            None => {
                warn!(source, "source AS is not in the graph");
                report.diagnostics.push(PathDiagnostic::SourceMissing(source));
                continue;
            }
        };

        for target in targets.iter() {
            if !topo.contains(target) {
                warn!(source, target, "target AS is not in the graph");
                report
                    .diagnostics
                    .push(PathDiagnostic::TargetMissing { source, target });
                continue;
            }

            match tree.path_to(target) {
                Some(hops) => {
                    debug!(source, target, ?hops, "found path");
                    report.paths.push(AsPath {
                        source,
                        target,
                        hops,
                    });
                }
                None => {
                    debug!(source, target, "no path");
                    report
                        .diagnostics
                        .push(PathDiagnostic::NoPath { source, target });
                }
            }
        }
    }

    info!(
        paths = report.paths.len(),
        skipped = report.diagnostics.len(),
        "path search finished"
    );
    report
}
