use std::{
    fmt,
    io::{self, Write},
};

use crate::{as_set::AsSet, path::AsPath};

/// Country name used when no resolver knows an AS.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

impl fmt::Display for AsPath {
    /// `SOURCE -> TARGET: n1 -> n2 -> ... -> nk`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: ", self.source, self.target)?;
        write_hops(f, &self.hops, |f, asn| write!(f, "{}", asn))
    }
}

fn write_hops<W, F>(out: &mut W, hops: &[u32], mut hop: F) -> fmt::Result
where
    W: fmt::Write,
    F: FnMut(&mut W, u32) -> fmt::Result,
{
    for (i, asn) in hops.iter().enumerate() {
        if i > 0 {
            out.write_str(" -> ")?;
        }
        hop(out, *asn)?;
    }
    Ok(())
}

/// Maps an AS number to the country it is registered in.
pub trait CountryResolver {
    fn country_of(&self, asn: u32) -> Option<String>;
}

/// Resolves countries from the labeled AS sets a query was run with. The
/// first set containing the AS wins.
#[derive(Debug, Default)]
pub struct LabeledSets<'a> {
    sets: Vec<(&'a str, &'a AsSet)>,
}

impl<'a> LabeledSets<'a> {
    pub fn new() -> Self {
        LabeledSets { sets: Vec::new() }
    }

    pub fn with(mut self, label: &'a str, set: &'a AsSet) -> Self {
        self.sets.push((label, set));
        self
    }
}

impl CountryResolver for LabeledSets<'_> {
    fn country_of(&self, asn: u32) -> Option<String> {
        self.sets
            .iter()
            .find(|(_, set)| set.contains(asn))
            .map(|(label, _)| label.to_string())
    }
}

/// A path rendered with every hop tagged by its country:
/// `SOURCE -> TARGET: AS<n1> (<country>) -> ... -> AS<nk> (<country>)`
pub struct Annotated<'a, R> {
    path: &'a AsPath,
    resolver: &'a R,
}

pub fn annotate<'a, R: CountryResolver>(path: &'a AsPath, resolver: &'a R) -> Annotated<'a, R> {
    Annotated { path, resolver }
}

impl<R: CountryResolver> fmt::Display for Annotated<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}: ", self.path.source, self.path.target)?;
        write_hops(f, &self.path.hops, |f, asn| {
            let country = self
                .resolver
                .country_of(asn)
                .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());
            write!(f, "AS{} ({})", asn, country)
        })
    }
}

pub fn write_paths<W: Write>(mut writer: W, paths: &[AsPath]) -> io::Result<()> {
    for path in paths {
        writeln!(writer, "{}", path)?;
    }
    writer.flush()
}

pub fn write_annotated<W: Write, R: CountryResolver>(
    mut writer: W,
    paths: &[AsPath],
    resolver: &R,
) -> io::Result<()> {
    for path in paths {
        writeln!(writer, "{}", annotate(path, resolver))?;
    }
    writer.flush()
}
