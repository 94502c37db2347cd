//! Parallel construction of a [`Topology`] from a partitioned dataset.
//!
//! Every partition is turned into its own partial graph on a rayon pool; once
//! all of them are done the partials are merged on the calling thread in the
//! order the partitions were read.

use std::{io, time::Instant};

use rayon::{
    iter::{ParallelBridge, ParallelIterator},
    ThreadPoolBuilder,
};
use tracing::{debug, info};

use crate::{
    config::BuildConfig,
    error::TopologyError,
    partition::{Dataset, Partition, Partitions},
    relationship::{parse_record, SkipReason},
    topology::Topology,
};

/// Build a partial graph from one partition. Lines that do not parse are
/// dropped.
pub fn build_partition(partition: &Partition) -> Topology {
    let mut topo = Topology::new();
    let mut skipped = 0usize;

    for line in partition {
        match parse_record(line) {
            Ok(record) => {
                for (from, to, rel) in record.edges() {
                    topo.add_edge(from, to, rel);
                }
            }
            Err(SkipReason::Comment) => {}
            Err(reason) => {
                skipped += 1;
                debug!(?reason, line = line.trim_end(), "skipping malformed record");
            }
        }
    }

    if skipped > 0 {
        debug!(skipped, "dropped malformed records in partition");
    }
    topo
}

/// Scatter `partitions` over a worker pool and gather the merged graph.
///
/// Fails if the stream breaks part way through; a panic in a worker is
/// resumed on the calling thread.
pub fn build_topology<I>(partitions: I, config: &BuildConfig) -> Result<Topology, TopologyError>
where
    I: Iterator<Item = io::Result<Partition>> + Send,
{
    let mut pool = ThreadPoolBuilder::new().thread_name(|i| format!("as-topology-{}", i));
    if config.workers > 0 {
        pool = pool.num_threads(config.workers);
    }
    let pool = pool.build()?;

    let start = Instant::now();
    let mut partials: Vec<(usize, Topology)> = pool.install(|| {
        partitions
            .enumerate()
            .par_bridge()
            .map(|(index, partition)| partition.map(|p| (index, build_partition(&p))))
            .collect::<io::Result<Vec<_>>>()
    })?;
    let built = start.elapsed();

    // par_bridge hands back results in completion order
    partials.sort_unstable_by_key(|(index, _)| *index);
    let partition_count = partials.len();

    let start = Instant::now();
    let topo = Topology::merge_all(partials.into_iter().map(|(_, partial)| partial));

    info!(
        partitions = partition_count,
        workers = pool.current_num_threads(),
        nodes = topo.node_count(),
        edges = topo.edge_count(),
        build_ms = built.as_millis() as u64,
        merge_ms = start.elapsed().as_millis() as u64,
        "built topology"
    );
    Ok(topo)
}

/// Stream `dataset` from disk and build its topology.
pub fn build_dataset(dataset: &Dataset, config: &BuildConfig) -> Result<Topology, TopologyError> {
    info!(
        dataset = %dataset.path().display(),
        partition_size = config.partition_size,
        "reading relationship dataset"
    );
    let partitions = dataset.partitions(config.partition_size)?;

    build_topology(partitions, config).map_err(|e| match e {
        TopologyError::Io(source) => TopologyError::unavailable(dataset.path(), source),
        other => other,
    })
}

impl Topology {
    /// Build a topology from a CAIDA AS-relationship stream, e.g. the
    /// decompressed contents of `20231201.as-rel.txt.bz2`.
    pub fn from_caida(reader: impl io::Read + Send) -> Result<Self, TopologyError> {
        let config = BuildConfig::default();
        let partitions = Partitions::new(io::BufReader::new(reader), config.partition_size);
        build_topology(partitions, &config)
    }
}
