//! Resolving node names to their owning AS numbers.
//!
//! Each file in the `node/` directory describes one network node. The
//! file name, lower-cased, is the canonical node name; the content is a
//! config record whose `asn` field names the node's owning AS number.
//! Tunnel routes refer to nodes by these names.

use std::{error, fmt, fs, io};
use std::collections::HashMap;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use crate::record::{Record, RecordError};
use crate::resources::asn::Asn;


//------------ NodeTable -----------------------------------------------------

/// The mapping from node name to owning AS number.
///
/// Built once from the node directory and immutable thereafter. Several
/// nodes may share an AS number; node names are unique by virtue of
/// being file names.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct NodeTable {
    nodes: HashMap<String, Asn>,
}

impl NodeTable {
    /// Builds the node table from the files in the node directory.
    ///
    /// Only regular files are considered. Each is parsed as a config
    /// record; a missing or unparsable `asn` field fails the whole run,
    /// naming the offending file.
    pub fn from_dir(path: &Path) -> Result<Self, NodeDirError> {
        let mut nodes = HashMap::new();
        let dir = fs::read_dir(path).map_err(|err| {
            NodeDirError::Io(path.into(), err)
        })?;
        for entry in dir {
            let entry = entry.map_err(|err| {
                NodeDirError::Io(path.into(), err)
            })?;
            let file_type = entry.file_type().map_err(|err| {
                NodeDirError::Io(entry.path(), err)
            })?;
            if !file_type.is_file() {
                continue
            }
            let name = match entry.file_name().to_str() {
                Some(name) => name.to_lowercase(),
                None => return Err(NodeDirError::FileName(entry.path())),
            };
            let content = fs::read_to_string(entry.path()).map_err(|err| {
                NodeDirError::Io(entry.path(), err)
            })?;
            let asn = Record::parse(&content).and_then(|record| {
                record.require_asn("asn")
            }).map_err(|err| NodeDirError::File(entry.path(), err))?;
            nodes.insert(name, asn);
        }
        log::debug!("node table holds {} nodes", nodes.len());
        Ok(NodeTable { nodes })
    }

    /// Returns the AS number of the named node.
    pub fn get(&self, name: &str) -> Option<Asn> {
        self.nodes.get(name).copied()
    }

    /// Returns whether the table knows the named node.
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Returns the number of nodes in the table.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}


//--- FromIterator

impl FromIterator<(String, Asn)> for NodeTable {
    fn from_iter<T: IntoIterator<Item = (String, Asn)>>(iter: T) -> Self {
        NodeTable { nodes: iter.into_iter().collect() }
    }
}


//============ Errors ========================================================

//------------ NodeDirError --------------------------------------------------

/// Building the node table has failed.
#[derive(Debug)]
pub enum NodeDirError {
    /// Reading the directory or a file failed.
    Io(PathBuf, io::Error),

    /// A file name is not valid UTF-8.
    FileName(PathBuf),

    /// A node config record could not be used.
    File(PathBuf, RecordError),
}

impl fmt::Display for NodeDirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeDirError::Io(path, err) => {
                write!(f, "failed to read '{}': {}", path.display(), err)
            }
            NodeDirError::FileName(path) => {
                write!(f, "invalid node file name '{}'", path.display())
            }
            NodeDirError::File(path, err) => {
                write!(f, "node file '{}': {}", path.display(), err)
            }
        }
    }
}

impl error::Error for NodeDirError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("NodeA"), "asn=AS64512\n").unwrap();
        fs::write(
            dir.path().join("nodeb"),
            "# second node\nasn=64513\nlabel=\"b\"\n"
        ).unwrap();
        fs::create_dir(dir.path().join("ignored")).unwrap();

        let table = NodeTable::from_dir(dir.path()).unwrap();
        assert_eq!(table.len(), 2);
        // File names are lower-cased.
        assert_eq!(table.get("nodea"), Some(Asn::from_u32(64512)));
        assert_eq!(table.get("nodeb"), Some(Asn::from_u32(64513)));
        assert_eq!(table.get("NodeA"), None);
        assert!(!table.contains("nodec"));
    }

    #[test]
    fn shared_asn_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "asn=AS64512\n").unwrap();
        fs::write(dir.path().join("b"), "asn=AS64512\n").unwrap();

        let table = NodeTable::from_dir(dir.path()).unwrap();
        assert_eq!(table.get("a"), table.get("b"));
    }

    #[test]
    fn missing_asn_field() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "label=x\n").unwrap();

        match NodeTable::from_dir(dir.path()) {
            Err(NodeDirError::File(path, RecordError::MissingField(key))) => {
                assert_eq!(path, dir.path().join("a"));
                assert_eq!(key, "asn");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn bad_asn_field() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "asn=notanumber\n").unwrap();

        assert!(matches!(
            NodeTable::from_dir(dir.path()),
            Err(NodeDirError::File(_, RecordError::InvalidAsn(..)))
        ));
    }
}
