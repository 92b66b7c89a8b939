//! Resolving route files into ROA candidates.
//!
//! Each file in a route directory announces one prefix. The prefix is
//! encoded in the file name with `/` replaced by `,` so it survives as a
//! file name; the content is a config record whose `type` field selects
//! how the origin AS number is determined:
//!
//! * `lo` and `subnet` routes name their origin directly in the `as`
//!   field;
//! * tunnel routes (any type starting with `tun`) resolve their origin
//!   through the node table via the `upstream` field and must also name
//!   a known `downstream` node;
//! * `ptp` routes are point-to-point links and contribute no ROA entry.
//!
//! Whatever way the origin was found, it must be a member of the ASN
//! registry. An optional `supernet` field names a less-specific prefix
//! expected elsewhere in the set, licensing an overlap that would
//! otherwise be rejected.

use std::{error, fmt, fs, io};
use std::path::{Path, PathBuf};
use crate::node::NodeTable;
use crate::record::{Record, RecordError};
use crate::registry::AsnRegistry;
use crate::resources::addr::{AddressFamily, ParsePrefixError, Prefix};
use crate::resources::asn::Asn;


//------------ RouteType -----------------------------------------------------

/// The dispatch classes of the `type` field of a route record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RouteType {
    /// A loopback or subnet route carrying its origin in the `as` field.
    Direct,

    /// A tunnel route resolving its origin through the node table.
    ///
    /// This covers all type values starting with `tun`, e.g. `tunnel`
    /// or `tun6`.
    Tunnel,

    /// A point-to-point link. Contributes no ROA entry.
    PointToPoint,
}

impl RouteType {
    /// Classifies the value of a `type` field.
    ///
    /// The value arrives lower-cased from the record parser. An
    /// unrecognized value is an error that fails the whole run.
    pub fn classify(value: &str) -> Result<Self, EntryError> {
        match value {
            "lo" | "subnet" => Ok(RouteType::Direct),
            "ptp" => Ok(RouteType::PointToPoint),
            _ if value.starts_with("tun") => Ok(RouteType::Tunnel),
            _ => Err(EntryError::UnknownType(value.into())),
        }
    }
}


//------------ RouteRecord ---------------------------------------------------

/// The typed view of a route config record.
///
/// Holds the keys the resolver understands with explicit optionality.
/// Which of the optional fields must actually be present depends on the
/// route type and is enforced during resolution.
#[derive(Clone, Debug)]
pub struct RouteRecord {
    /// The dispatch class of the route.
    pub route_type: RouteType,

    /// The origin AS number from the `as` field.
    pub origin: Option<Asn>,

    /// The node name from the `upstream` field.
    pub upstream: Option<String>,

    /// The node name from the `downstream` field.
    pub downstream: Option<String>,

    /// The raw value of the `supernet` field.
    ///
    /// Kept as a string here since parsing it needs the address family
    /// of the route directory. An empty value counts as absent.
    pub supernet: Option<String>,
}

impl RouteRecord {
    /// Creates the typed view from a parsed record.
    pub fn from_record(record: &Record) -> Result<Self, EntryError> {
        Ok(RouteRecord {
            route_type: RouteType::classify(record.require("type")?)?,
            origin: match record.get("as") {
                Some(_) => Some(record.require_asn("as")?),
                None => None,
            },
            upstream: record.get("upstream").map(Into::into),
            downstream: record.get("downstream").map(Into::into),
            supernet: record.get_non_empty("supernet").map(Into::into),
        })
    }
}


//------------ RouteCandidate ------------------------------------------------

/// One accepted route file, ready for overlap validation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RouteCandidate {
    /// The origin AS number. Always a member of the ASN registry.
    pub asn: Asn,

    /// The announced prefix.
    pub prefix: Prefix,

    /// The declared containing prefix, if any.
    pub supernet: Option<Prefix>,
}

impl fmt::Display for RouteCandidate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.asn, self.prefix)
    }
}


//------------ resolve_entry -------------------------------------------------

/// Resolves a single route file into a candidate.
///
/// `name` is the plain file name carrying the prefix with `/` encoded
/// as `,`; `content` is the raw file content. Returns `Ok(None)` for
/// route types that legitimately contribute no entry.
pub fn resolve_entry(
    name: &str,
    content: &str,
    family: AddressFamily,
    registry: &AsnRegistry,
    nodes: &NodeTable,
) -> Result<Option<RouteCandidate>, EntryError> {
    let record = Record::parse(content)?;
    let record = RouteRecord::from_record(&record)?;

    let asn = match record.route_type {
        RouteType::Direct => {
            record.origin.ok_or_else(|| {
                EntryError::Record(RecordError::MissingField("as".into()))
            })?
        }
        RouteType::Tunnel => {
            // The far end of the tunnel must be a known node. Its AS
            // number is not otherwise used; ASN 0 is as good as any.
            let downstream = record.downstream.as_deref().ok_or_else(|| {
                EntryError::Record(
                    RecordError::MissingField("downstream".into())
                )
            })?;
            if !nodes.contains(downstream) {
                return Err(EntryError::UnknownNode(
                    "downstream", downstream.into()
                ))
            }
            let upstream = record.upstream.as_deref().ok_or_else(|| {
                EntryError::Record(
                    RecordError::MissingField("upstream".into())
                )
            })?;
            nodes.get(upstream).ok_or_else(|| {
                EntryError::UnknownNode("upstream", upstream.into())
            })?
        }
        RouteType::PointToPoint => return Ok(None),
    };

    if !registry.contains(asn) {
        return Err(EntryError::UnauthorizedAsn(asn))
    }

    let prefix_str = name.replace(',', "/");
    let prefix = family.parse_prefix(&prefix_str).map_err(|err| {
        EntryError::BadPrefix(prefix_str, err)
    })?;
    let supernet = match record.supernet {
        Some(value) => {
            Some(family.parse_prefix(&value).map_err(|err| {
                EntryError::BadSupernet(value, err)
            })?)
        }
        None => None,
    };

    Ok(Some(RouteCandidate { asn, prefix, supernet }))
}


//------------ resolve_dir ---------------------------------------------------

/// Resolves all route files of one directory.
///
/// Only regular files are considered. The returned candidates are
/// sorted ascending by AS number; candidates with equal AS numbers keep
/// their relative directory iteration order, which is unspecified and
/// only reproducible within a single run.
pub fn resolve_dir(
    path: &Path,
    family: AddressFamily,
    registry: &AsnRegistry,
    nodes: &NodeTable,
) -> Result<Vec<RouteCandidate>, RouteDirError> {
    let mut candidates = Vec::new();
    let dir = fs::read_dir(path).map_err(|err| {
        RouteDirError::Io(path.into(), err)
    })?;
    for entry in dir {
        let entry = entry.map_err(|err| {
            RouteDirError::Io(path.into(), err)
        })?;
        let file_type = entry.file_type().map_err(|err| {
            RouteDirError::Io(entry.path(), err)
        })?;
        if !file_type.is_file() {
            continue
        }
        let name = match entry.file_name().to_str() {
            Some(name) => name.to_owned(),
            None => return Err(RouteDirError::FileName(entry.path())),
        };
        let content = fs::read_to_string(entry.path()).map_err(|err| {
            RouteDirError::Io(entry.path(), err)
        })?;
        let candidate = resolve_entry(
            &name, &content, family, registry, nodes
        ).map_err(|err| RouteDirError::File(entry.path(), err))?;
        if let Some(candidate) = candidate {
            candidates.push(candidate);
        }
    }
    candidates.sort_by_key(|candidate| candidate.asn);
    log::debug!(
        "resolved {} {} route candidates from '{}'",
        candidates.len(), family, path.display()
    );
    Ok(candidates)
}


//============ Errors ========================================================

//------------ EntryError ----------------------------------------------------

/// Resolving one route file has failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryError {
    /// The config record was unusable.
    Record(RecordError),

    /// The `type` field held an unrecognized value.
    UnknownType(String),

    /// The origin AS number is not in the ASN registry.
    UnauthorizedAsn(Asn),

    /// An `upstream` or `downstream` field named an unknown node.
    UnknownNode(&'static str, String),

    /// The file name did not encode a valid exact prefix.
    BadPrefix(String, ParsePrefixError),

    /// The `supernet` field did not hold a valid exact prefix.
    BadSupernet(String, ParsePrefixError),
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntryError::Record(err) => err.fmt(f),
            EntryError::UnknownType(value) => {
                write!(f, "unknown route type '{}'", value)
            }
            EntryError::UnauthorizedAsn(asn) => {
                write!(f, "{} is not in the ASN registry", asn)
            }
            EntryError::UnknownNode(field, name) => {
                write!(f, "{} node '{}' is not known", field, name)
            }
            EntryError::BadPrefix(value, err) => {
                write!(f, "invalid prefix '{}': {}", value, err)
            }
            EntryError::BadSupernet(value, err) => {
                write!(f, "invalid supernet '{}': {}", value, err)
            }
        }
    }
}

impl error::Error for EntryError { }

impl From<RecordError> for EntryError {
    fn from(err: RecordError) -> Self {
        EntryError::Record(err)
    }
}


//------------ RouteDirError -------------------------------------------------

/// Resolving a route directory has failed.
#[derive(Debug)]
pub enum RouteDirError {
    /// Reading the directory or a file failed.
    Io(PathBuf, io::Error),

    /// A file name is not valid UTF-8.
    FileName(PathBuf),

    /// A route file could not be resolved.
    File(PathBuf, EntryError),
}

impl fmt::Display for RouteDirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteDirError::Io(path, err) => {
                write!(f, "failed to read '{}': {}", path.display(), err)
            }
            RouteDirError::FileName(path) => {
                write!(f, "invalid route file name '{}'", path.display())
            }
            RouteDirError::File(path, err) => {
                write!(f, "route file '{}': {}", path.display(), err)
            }
        }
    }
}

impl error::Error for RouteDirError { }


//============ Tests =========================================================
