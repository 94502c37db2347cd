use std::{
    collections::HashSet,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use tracing::{info, warn};

/// Ordered set of AS numbers, e.g. every AS registered in one country.
/// Duplicates in the input are dropped, keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AsSet {
    order: Vec<u32>,
    members: HashSet<u32>,
}

impl AsSet {
    pub fn new() -> Self {
        AsSet::default()
    }

    pub fn insert(&mut self, asn: u32) -> bool {
        if self.members.insert(asn) {
            self.order.push(asn);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, asn: u32) -> bool {
        self.members.contains(&asn)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.order.iter().copied()
    }

    /// Read one AS number per line. An `AS` prefix in any case is accepted,
    /// blank lines are ignored and anything else that is not a number is
    /// skipped.
    pub fn from_reader(mut reader: impl BufRead) -> std::io::Result<Self> {
        let mut set = AsSet::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            // a line of invalid UTF-8 is reported like any other bad entry
            let line = String::from_utf8_lossy(&buf);
            let entry = line.trim();
            if entry.is_empty() {
                continue;
            }
            match parse_asn(entry) {
                Some(asn) => {
                    set.insert(asn);
                }
                None => warn!(entry, "ignoring invalid AS number"),
            }
        }
        Ok(set)
    }

    /// Load a set from a file. A missing or unreadable file gives an empty
    /// set so the run still completes.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let set = File::open(path).and_then(|file| AsSet::from_reader(BufReader::new(file)));

        match set {
            Ok(set) => {
                info!(path = %path.display(), ases = set.len(), "loaded AS set");
                set
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "AS set unavailable, using an empty set");
                AsSet::new()
            }
        }
    }
}

fn parse_asn(entry: &str) -> Option<u32> {
    let digits = match entry.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("as") => &entry[2..],
        _ => entry,
    };
    digits.trim().parse().ok()
}

impl FromIterator<u32> for AsSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        let mut set = AsSet::new();
        for asn in iter {
            set.insert(asn);
        }
        set
    }
}
