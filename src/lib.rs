//! as-topology builds an AS-level topology from CAIDA's AS-relationship data
//! file and finds shortest AS paths between two sets of ASes, e.g. every AS of
//! one country and every AS of another.
//!
//! The dataset is read as a stream of fixed-size partitions, each turned into
//! a partial graph on a rayon pool, and the partials are merged once all of
//! them are built. Paths are plain breadth-first shortest paths; relationship
//! labels are kept on the edges but do not constrain routing.

pub mod as_set;
pub mod builder;
pub mod config;
pub mod error;
pub mod partition;
pub mod path;
pub mod pipeline;
pub mod relationship;
pub mod report;
pub mod topology;

pub use as_set::AsSet;
pub use builder::{build_dataset, build_partition, build_topology};
pub use config::{BuildConfig, Config};
pub use error::TopologyError;
pub use partition::{Dataset, Partitions};
pub use path::{find_paths, AsPath, BfsTree, PathDiagnostic, PathReport};
pub use relationship::{parse_record, Relationship, SkipReason};
pub use topology::Topology;
