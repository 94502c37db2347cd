//! Streaming a relationship dataset as fixed-size groups of lines.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use bzip2::read::MultiBzDecoder;

use crate::error::TopologyError;

/// Lines per partition when nothing else is configured.
pub const DEFAULT_PARTITION_SIZE: usize = 10_000;

/// A contiguous slice of dataset lines, processed independently of the others.
pub type Partition = Vec<String>;

/// A relationship file on disk, either bzip2-compressed (`.bz2`) or plain text.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
}

impl Dataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Dataset { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_compressed(&self) -> bool {
        self.path
            .extension()
            .map_or(false, |ext| ext.eq_ignore_ascii_case("bz2"))
    }

    /// Open the file and start a fresh partition stream from its first line.
    pub fn partitions(
        &self,
        size: usize,
    ) -> Result<Partitions<Box<dyn BufRead + Send>>, TopologyError> {
        if size == 0 {
            return Err(TopologyError::Config(
                "partition size must be at least 1".to_string(),
            ));
        }

        let file = File::open(&self.path).map_err(|e| TopologyError::unavailable(&self.path, e))?;

        let reader: Box<dyn BufRead + Send> = if self.is_compressed() {
            // snapshots written by parallel compressors are several concatenated streams
            Box::new(BufReader::new(MultiBzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Partitions::new(reader, size))
    }
}

/// Iterator over consecutive partitions of a line-oriented reader. Only the
/// partition being filled is held in memory.
pub struct Partitions<R> {
    reader: R,
    size: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> Partitions<R> {
    pub fn new(reader: R, size: usize) -> Self {
        Partitions {
            reader,
            size: size.max(1),
            buf: Vec::new(),
            done: false,
        }
    }

    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        // invalid UTF-8 is left to the record parser to reject
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

impl<R: BufRead> Iterator for Partitions<R> {
    type Item = io::Result<Partition>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut partition = Vec::with_capacity(self.size);
        while partition.len() < self.size {
            match self.next_line() {
                Ok(Some(line)) => partition.push(line),
                Ok(None) => {
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        if partition.is_empty() {
            None
        } else {
            Some(Ok(partition))
        }
    }
}
