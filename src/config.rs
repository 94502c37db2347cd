//! Run configuration, loaded from TOML.
//!
//! ```toml
//! [build]
//! dataset = "20250301.as-rel.txt.bz2"
//! partition_size = 10000
//! workers = 0            # 0 = one per CPU
//!
//! [query.source]
//! path = "as_pl.txt"
//! label = "Poland"
//!
//! [query.target]
//! path = "as_tw.txt"
//! label = "Taiwan"
//!
//! [output]
//! paths = "as_paths.txt"
//! annotated = "as_paths_with_countries.txt"
//! ```

use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::{error::TopologyError, partition::DEFAULT_PARTITION_SIZE};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub build: BuildConfig,
    pub query: QueryConfig,
    pub output: OutputConfig,
}

/// How the relationship dataset is read and built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// CAIDA AS-relationship file, `.bz2` or plain text
    pub dataset: PathBuf,

    /// Lines handed to a single worker task
    pub partition_size: usize,

    /// Worker threads (0 = auto-detect)
    pub workers: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            dataset: PathBuf::from("as-rel.txt.bz2"),
            partition_size: DEFAULT_PARTITION_SIZE,
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub source: AsSetSource,
    pub target: AsSetSource,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            source: AsSetSource::new("source_as.txt"),
            target: AsSetSource::new("target_as.txt"),
        }
    }
}

/// A file of AS numbers, optionally tagged with the country it stands for.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AsSetSource {
    pub path: PathBuf,
    #[serde(default)]
    pub label: Option<String>,
}

impl AsSetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AsSetSource {
            path: path.into(),
            label: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub paths: PathBuf,
    /// Also write the paths with every hop tagged by country
    pub annotated: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            paths: PathBuf::from("as_paths.txt"),
            annotated: None,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TopologyError::Config(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Config::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, TopologyError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.build.partition_size == 0 {
            return Err(TopologyError::Config(
                "build.partition_size must be at least 1".to_string(),
            ));
        }
        if self.output.annotated.as_ref() == Some(&self.output.paths) {
            return Err(TopologyError::Config(
                "output.annotated must differ from output.paths".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.build.partition_size, 10_000);
        assert_eq!(config.build.workers, 0);
        assert_eq!(config.output.annotated, None);
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
[build]
dataset = "20250301.as-rel.txt.bz2"
workers = 4

[query.source]
path = "as_pl.txt"
label = "Poland"
"#,
        )
        .unwrap();

        assert_eq!(config.build.dataset, PathBuf::from("20250301.as-rel.txt.bz2"));
        assert_eq!(config.build.partition_size, 10_000);
        assert_eq!(config.build.workers, 4);
        assert_eq!(config.query.source.label.as_deref(), Some("Poland"));
        assert_eq!(config.query.target.path, PathBuf::from("target_as.txt"));
    }

    #[test]
    fn test_invalid() {
        assert!(matches!(
            Config::from_toml("[build]\npartition_size = 0\n"),
            Err(TopologyError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("[build]\npartition_size = \"many\"\n"),
            Err(TopologyError::ConfigParse(_))
        ));
        assert!(matches!(
            Config::from_toml("[output]\npaths = \"a.txt\"\nannotated = \"a.txt\"\n"),
            Err(TopologyError::Config(_))
        ));
    }
}
