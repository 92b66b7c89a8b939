//! The ROA pipeline: from config database to the final entry set.
//!
//! [`RoaSet::generate`] runs the whole batch: it reads the ASN registry
//! and the node table, resolves the route directories of the requested
//! address families, validates each candidate set for illegal overlaps
//! and projects the survivors onto the configured max-prefix-length
//! policy. Any failure along the way aborts the run with an error
//! naming the offending input.

use std::{error, fmt};
use std::path::Path;
use crate::node::{NodeDirError, NodeTable};
use crate::overlap::{self, OverlapError};
use crate::registry::{AsnDirError, AsnRegistry};
use crate::resources::addr::{AddressFamily, Prefix};
use crate::resources::asn::Asn;
use crate::route::{self, RouteCandidate, RouteDirError};


//------------ Policy --------------------------------------------------------

/// The max-prefix-length policy applied after validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Policy {
    /// The largest announced IPv4 prefix length, host routes excepted.
    pub max_len4: u8,

    /// The largest announced IPv6 prefix length.
    pub max_len6: u8,
}

impl Default for Policy {
    fn default() -> Self {
        Policy { max_len4: 29, max_len6: 64 }
    }
}


//------------ RoaEntry ------------------------------------------------------

/// One final ROA statement.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoaEntry {
    /// The AS number authorized to originate the prefix.
    pub asn: Asn,

    /// The authorized prefix.
    pub prefix: Prefix,

    /// The longest prefix length the authorization extends to.
    pub max_length: u8,
}


//------------ RoaSet --------------------------------------------------------

/// The validated, policy-projected set of ROA entries.
///
/// Entries appear IPv4 first, then IPv6, each family ordered ascending
/// by AS number.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RoaSet {
    entries: Vec<RoaEntry>,
}

impl RoaSet {
    /// Generates the ROA set from a config database.
    ///
    /// `base` is the root of the database holding the `asn/`, `node/`
    /// and route directories. `families` selects which route
    /// directories to process; they are handled in the order given.
    pub fn generate(
        base: &Path,
        families: &[AddressFamily],
        policy: Policy,
    ) -> Result<Self, GenerateError> {
        let registry = AsnRegistry::from_dir(&base.join("asn"))?;
        let nodes = NodeTable::from_dir(&base.join("node"))?;

        let mut entries = Vec::new();
        for &family in families {
            let dir = match family {
                AddressFamily::Ipv4 => base.join("route"),
                AddressFamily::Ipv6 => base.join("route6"),
            };
            let candidates = route::resolve_dir(
                &dir, family, &registry, &nodes
            )?;
            overlap::check(&candidates)?;
            entries.extend(
                candidates.into_iter().filter_map(|candidate| {
                    project(candidate, policy)
                })
            );
        }
        log::info!("generated {} ROA entries", entries.len());
        Ok(RoaSet { entries })
    }

    /// Returns the entries in output order.
    pub fn entries(&self) -> &[RoaEntry] {
        &self.entries
    }

    /// Returns the number of entries in the set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}


//------------ project -------------------------------------------------------

/// Applies the max-prefix-length policy to one validated candidate.
///
/// IPv4 candidates are kept if their length does not exceed the
/// configured maximum, with /32 host routes always retained and
/// annotated with max length 32. IPv6 candidates are kept if their
/// length does not exceed the IPv6 maximum; there is no host route
/// exception.
fn project(candidate: RouteCandidate, policy: Policy) -> Option<RoaEntry> {
    let len = candidate.prefix.len();
    let max_length = match candidate.prefix.family() {
        AddressFamily::Ipv4 => {
            if len == 32 {
                32
            }
            else if len <= policy.max_len4 {
                policy.max_len4
            }
            else {
                return None
            }
        }
        AddressFamily::Ipv6 => {
            if len <= policy.max_len6 {
                policy.max_len6
            }
            else {
                return None
            }
        }
    };
    Some(RoaEntry {
        asn: candidate.asn,
        prefix: candidate.prefix,
        max_length,
    })
}


//============ Errors ========================================================

//------------ GenerateError -------------------------------------------------

/// Generating the ROA set has failed.
///
/// Every variant carries the full diagnostic of the failing stage,
/// including the offending file or entry pair.
#[derive(Debug)]
pub enum GenerateError {
    /// The ASN registry could not be built.
    Registry(AsnDirError),

    /// The node table could not be built.
    Nodes(NodeDirError),

    /// A route directory could not be resolved.
    Routes(RouteDirError),

    /// A candidate set contained an illegal overlap.
    Overlap(OverlapError),
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GenerateError::Registry(err) => err.fmt(f),
            GenerateError::Nodes(err) => err.fmt(f),
            GenerateError::Routes(err) => err.fmt(f),
            GenerateError::Overlap(err) => err.fmt(f),
        }
    }
}

impl error::Error for GenerateError { }

impl From<AsnDirError> for GenerateError {
    fn from(err: AsnDirError) -> Self {
        GenerateError::Registry(err)
    }
}

impl From<NodeDirError> for GenerateError {
    fn from(err: NodeDirError) -> Self {
        GenerateError::Nodes(err)
    }
}

impl From<RouteDirError> for GenerateError {
    fn from(err: RouteDirError) -> Self {
        GenerateError::Routes(err)
    }
}

impl From<OverlapError> for GenerateError {
    fn from(err: OverlapError) -> Self {
        GenerateError::Overlap(err)
    }
}


//============ Tests =========================================================
