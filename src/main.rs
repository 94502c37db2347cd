use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use as_topology::{build_dataset, pipeline, Config, Dataset, Topology};

#[derive(Parser)]
#[command(name = "as-topology", version, about = "AS-level paths from CAIDA AS-relationship data")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find shortest AS paths from every source AS to every target AS
    Paths(PathsArgs),
    /// Print node and edge counts of the built topology
    Stats(BuildArgs),
    /// List providers, customers and peers of one AS
    Neighbors {
        #[arg(long)]
        asn: u32,
        #[command(flatten)]
        build: BuildArgs,
    },
}

#[derive(Args)]
struct BuildArgs {
    /// CAIDA AS-relationship file (.bz2 or plain text)
    #[arg(long)]
    dataset: Option<PathBuf>,
    #[arg(long)]
    partition_size: Option<usize>,
    /// Worker threads, 0 for one per CPU
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Args)]
struct PathsArgs {
    #[command(flatten)]
    build: BuildArgs,
    /// File with one source AS number per line
    #[arg(long)]
    source: Option<PathBuf>,
    /// File with one target AS number per line
    #[arg(long)]
    target: Option<PathBuf>,
    /// Country name of the source set, used in the annotated report
    #[arg(long)]
    source_label: Option<String>,
    /// Country name of the target set, used in the annotated report
    #[arg(long)]
    target_label: Option<String>,
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[arg(long)]
    annotated_output: Option<PathBuf>,
}

impl BuildArgs {
    fn apply(self, config: &mut Config) {
        if let Some(dataset) = self.dataset {
            config.build.dataset = dataset;
        }
        if let Some(size) = self.partition_size {
            config.build.partition_size = size;
        }
        if let Some(workers) = self.workers {
            config.build.workers = workers;
        }
    }
}

impl PathsArgs {
    fn apply(self, config: &mut Config) {
        self.build.apply(config);
        let query = &mut config.query;
        if let Some(path) = self.source {
            query.source.path = path;
        }
        if let Some(path) = self.target {
            query.target.path = path;
        }
        if self.source_label.is_some() {
            query.source.label = self.source_label;
        }
        if self.target_label.is_some() {
            query.target.label = self.target_label;
        }
        if let Some(path) = self.output {
            config.output.paths = path;
        }
        if self.annotated_output.is_some() {
            config.output.annotated = self.annotated_output;
        }
    }
}

fn build(config: &Config) -> Result<Topology> {
    config.validate()?;
    let dataset = Dataset::new(&config.build.dataset);
    build_dataset(&dataset, &config.build)
        .with_context(|| format!("building topology from {}", dataset.path().display()))
}

fn sorted(asns: Option<std::collections::HashSet<u32>>) -> Vec<u32> {
    let mut asns: Vec<u32> = asns.unwrap_or_default().into_iter().collect();
    asns.sort_unstable();
    asns
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Paths(args) => {
            args.apply(&mut config);
            let summary = pipeline::run(&config)?;
            info!(
                nodes = summary.nodes,
                edges = summary.edges,
                paths = summary.paths,
                skipped_pairs = summary.diagnostics,
                "done"
            );
        }
        Command::Stats(args) => {
            args.apply(&mut config);
            let topo = build(&config)?;
            println!("Number of ases: {}", topo.node_count());
            println!("Number of edges: {}", topo.edge_count());
        }
        Command::Neighbors { asn, build: args } => {
            args.apply(&mut config);
            let topo = build(&config)?;
            if !topo.contains(asn) {
                anyhow::bail!("AS{} is not in the topology", asn);
            }
            println!("providers: {:?}", sorted(topo.providers_of(asn)));
            println!("customers: {:?}", sorted(topo.customers_of(asn)));
            println!("peers: {:?}", sorted(topo.peers_of(asn)));
        }
    }

    Ok(())
}
