//! One full run: dataset → topology → paths between two AS sets → reports.

use std::{fs::File, io::BufWriter, path::Path};

use tracing::info;

use crate::{
    as_set::AsSet,
    builder::build_dataset,
    config::Config,
    error::TopologyError,
    partition::Dataset,
    path::find_paths,
    report::{write_annotated, write_paths, LabeledSets},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub nodes: usize,
    pub edges: usize,
    pub paths: usize,
    pub diagnostics: usize,
}

/// Run the whole pipeline described by `config`.
///
/// Only an unreadable dataset, an invalid config or a failed report write stop
/// the run. Missing AS sets and unreachable pairs just shrink the report.
pub fn run(config: &Config) -> Result<RunSummary, TopologyError> {
    config.validate()?;

    let topo = build_dataset(&Dataset::new(&config.build.dataset), &config.build)?;

    let source = &config.query.source;
    let target = &config.query.target;
    let sources = AsSet::load_or_empty(&source.path);
    let targets = AsSet::load_or_empty(&target.path);
    info!(
        sources = sources.len(),
        targets = targets.len(),
        "finding AS paths"
    );

    let report = find_paths(&topo, &sources, &targets);

    write_report(&config.output.paths, |file| write_paths(file, &report.paths))?;
    info!(
        path = %config.output.paths.display(),
        paths = report.paths.len(),
        "saved AS paths"
    );

    if let Some(annotated) = &config.output.annotated {
        let mut resolver = LabeledSets::new();
        if let Some(label) = &source.label {
            resolver = resolver.with(label, &sources);
        }
        if let Some(label) = &target.label {
            resolver = resolver.with(label, &targets);
        }
        write_report(annotated, |file| {
            write_annotated(file, &report.paths, &resolver)
        })?;
        info!(path = %annotated.display(), "saved AS paths with countries");
    }

    Ok(RunSummary {
        nodes: topo.node_count(),
        edges: topo.edge_count(),
        paths: report.paths.len(),
        diagnostics: report.diagnostics.len(),
    })
}

fn write_report<F>(path: &Path, write: F) -> Result<(), TopologyError>
where
    F: FnOnce(BufWriter<File>) -> std::io::Result<()>,
{
    let file = File::create(path)?;
    write(BufWriter::new(file))?;
    Ok(())
}
