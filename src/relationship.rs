//! Parsing of single CAIDA AS-relationship records.
//!
//! A record line looks like `asn1|asn2|code` where `code` is `-1` (asn1 is a
//! customer of asn2), `0` (peers) or `1` (asn1 is a provider of asn2). Records
//! are normalized so that customer edges always point from the customer to the
//! provider and peerings become one edge in each direction.

/// Label of a normalized directed edge.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum Relationship {
    /// `from` is a customer of `to`.
    Customer,
    /// `from` and `to` peer with each other.
    Peer,
}

/// Why a line did not produce any edge.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SkipReason {
    Comment,
    FieldCount(usize),
    NotNumeric,
    UnknownRelationship(i32),
}

/// A record after normalization.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Normalized {
    Customer { customer: u32, provider: u32 },
    Peer(u32, u32),
}

impl Normalized {
    /// The directed edges implied by this record: one for a customer
    /// relationship, two for a peering.
    pub fn edges(&self) -> impl Iterator<Item = (u32, u32, Relationship)> {
        let (first, second) = match *self {
            Normalized::Customer { customer, provider } => {
                ((customer, provider, Relationship::Customer), None)
            }
            Normalized::Peer(a, b) => (
                (a, b, Relationship::Peer),
                Some((b, a, Relationship::Peer)),
            ),
        };

        std::iter::once(first).chain(second)
    }
}

pub const COMMENT_MARKER: char = '#';
pub const FIELD_DELIMITER: char = '|';

pub fn parse_record(line: &str) -> Result<Normalized, SkipReason> {
    let line = line.trim();
    if line.starts_with(COMMENT_MARKER) {
        return Err(SkipReason::Comment);
    }

    let fields = line.split(FIELD_DELIMITER).collect::<Vec<&str>>();
    if fields.len() != 3 {
        return Err(SkipReason::FieldCount(fields.len()));
    }

    let asn1 = fields[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| SkipReason::NotNumeric)?;
    let asn2 = fields[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| SkipReason::NotNumeric)?;
    let code = fields[2]
        .trim()
        .parse::<i32>()
        .map_err(|_| SkipReason::NotNumeric)?;

    match code {
        // asn1 is a customer of asn2
        -1 => Ok(Normalized::Customer {
            customer: asn1,
            provider: asn2,
        }),

        0 => Ok(Normalized::Peer(asn1, asn2)),

        // asn1 is a provider of asn2
        1 => Ok(Normalized::Customer {
            customer: asn2,
            provider: asn1,
        }),

        other => Err(SkipReason::UnknownRelationship(other)),
    }
}
