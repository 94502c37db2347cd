use std::{
    collections::HashSet,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use as_topology::{
    build_dataset, find_paths, pipeline, AsSet, BuildConfig, Config, Dataset, PathDiagnostic,
    Relationship, TopologyError,
};
use bzip2::{write::BzEncoder, Compression};

const DATASET: &str = "# source:topology|BGP\n100|200|-1\n300|400|0\n500|600|1\n";

fn write_bz2(path: &Path, content: &str) {
    let mut encoder = BzEncoder::new(File::create(path).unwrap(), Compression::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.build.dataset = dir.join("20250301.as-rel.txt.bz2");
    config.build.partition_size = 2;
    config.build.workers = 2;
    config.query.source.path = dir.join("as_pl.txt");
    config.query.source.label = Some("Poland".to_string());
    config.query.target.path = dir.join("as_tw.txt");
    config.query.target.label = Some("Taiwan".to_string());
    config.output.paths = dir.join("as_paths.txt");
    config.output.annotated = Some(dir.join("as_paths_with_countries.txt"));
    config
}

fn setup() -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_bz2(&config.build.dataset, DATASET);
    fs::write(&config.query.source.path, "AS100\nAS400\n\nAS100\n").unwrap();
    fs::write(&config.query.target.path, "AS200\nAS300\nAS500\n").unwrap();
    (dir, config)
}

#[test]
fn test_graph_from_compressed_dataset() {
    let (_dir, config) = setup();
    let topo = build_dataset(&Dataset::new(&config.build.dataset), &config.build).unwrap();

    let edges: HashSet<_> = topo.edges().collect();
    assert_eq!(
        edges,
        [
            (100, 200, Relationship::Customer),
            (300, 400, Relationship::Peer),
            (400, 300, Relationship::Peer),
            (600, 500, Relationship::Customer),
        ]
        .into()
    );
}

#[test]
fn test_paths_between_sets() {
    let (_dir, config) = setup();
    let topo = build_dataset(&Dataset::new(&config.build.dataset), &config.build).unwrap();
    let sources = AsSet::load_or_empty(&config.query.source.path);
    let targets = AsSet::load_or_empty(&config.query.target.path);

    let report = find_paths(&topo, &sources, &targets);

    let found: Vec<_> = report
        .paths
        .iter()
        .map(|p| (p.source, p.target, p.hops.clone()))
        .collect();
    assert_eq!(
        found,
        vec![(100, 200, vec![100, 200]), (400, 300, vec![400, 300])]
    );
    assert_eq!(
        report.diagnostics,
        vec![
            PathDiagnostic::NoPath {
                source: 100,
                target: 300
            },
            PathDiagnostic::NoPath {
                source: 100,
                target: 500
            },
            PathDiagnostic::NoPath {
                source: 400,
                target: 200
            },
            PathDiagnostic::NoPath {
                source: 400,
                target: 500
            },
        ]
    );
}

#[test]
fn test_run_writes_reports() {
    let (_dir, config) = setup();

    let summary = pipeline::run(&config).unwrap();

    assert_eq!(summary.nodes, 6);
    assert_eq!(summary.edges, 4);
    assert_eq!(summary.paths, 2);
    assert_eq!(summary.diagnostics, 4);
    assert_eq!(
        fs::read_to_string(&config.output.paths).unwrap(),
        "100 -> 200: 100 -> 200\n400 -> 300: 400 -> 300\n"
    );
    assert_eq!(
        fs::read_to_string(config.output.annotated.as_ref().unwrap()).unwrap(),
        "100 -> 200: AS100 (Poland) -> AS200 (Taiwan)\n400 -> 300: AS400 (Poland) -> AS300 (Taiwan)\n"
    );
}

#[test]
fn test_run_with_missing_sets_and_unknown_ases() {
    let (dir, mut config) = setup();
    config.query.source.path = dir.path().join("as_de.txt");
    fs::write(&config.query.target.path, "AS999\nAS200\n").unwrap();

    let summary = pipeline::run(&config).unwrap();

    assert_eq!(summary.paths, 0);
    assert_eq!(summary.diagnostics, 0);
    assert_eq!(fs::read_to_string(&config.output.paths).unwrap(), "");

    config.query.source.path = dir.path().join("as_pl.txt");
    let summary = pipeline::run(&config).unwrap();

    // 100 -> 200 found; 999 missing for both sources; 400 -> 200 unreachable
    assert_eq!(summary.paths, 1);
    assert_eq!(summary.diagnostics, 3);
}

#[test]
fn test_run_without_dataset_fails() {
    let (dir, mut config) = setup();
    config.build.dataset = dir.path().join("missing.as-rel.txt.bz2");

    let err = pipeline::run(&config).unwrap_err();

    assert!(matches!(err, TopologyError::DatasetUnavailable { .. }));
    assert!(!config.output.paths.exists());
}

#[test]
fn test_corrupt_stream_aborts_build() {
    let (_dir, mut config) = setup();
    config.build.partition_size = 1;
    config.build.workers = 4;
    // a valid first stream followed by bytes that are not bzip2 at all
    let mut encoder = BzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(DATASET.as_bytes()).unwrap();
    let mut bytes = encoder.finish().unwrap();
    bytes.extend_from_slice(b"100|200|-1\nnot a bzip2 stream\n");
    fs::write(&config.build.dataset, bytes).unwrap();

    let dataset = Dataset::new(&config.build.dataset);
    assert!(matches!(
        build_dataset(&dataset, &config.build),
        Err(TopologyError::DatasetUnavailable { .. })
    ));

    let err = pipeline::run(&config).unwrap_err();

    assert!(matches!(err, TopologyError::DatasetUnavailable { .. }));
    assert!(!config.output.paths.exists());
    assert!(!config.output.annotated.as_ref().unwrap().exists());
}

#[test]
fn test_plain_text_dataset_matches_compressed() {
    let (dir, config) = setup();
    let plain: PathBuf = dir.path().join("20250301.as-rel.txt");
    fs::write(&plain, DATASET).unwrap();

    let build = BuildConfig {
        partition_size: 1,
        workers: 3,
        ..config.build.clone()
    };
    let from_plain = build_dataset(&Dataset::new(&plain), &build).unwrap();
    let from_bz2 = build_dataset(&Dataset::new(&config.build.dataset), &config.build).unwrap();

    assert_eq!(
        from_plain.edges().collect::<HashSet<_>>(),
        from_bz2.edges().collect::<HashSet<_>>()
    );
}
