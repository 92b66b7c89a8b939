//! The registry of authorized AS numbers.
//!
//! The `asn/` directory of the config database contains one file per
//! authorized AS number. Only the file names matter; the content is
//! never read. A file name must be the case-insensitive literal `AS`
//! followed by a decimal number and nothing else.

use std::{error, fmt, fs, io};
use std::collections::HashSet;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use crate::resources::asn::Asn;


//------------ AsnRegistry ---------------------------------------------------

/// The set of AS numbers the config database may originate routes for.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AsnRegistry {
    asns: HashSet<Asn>,
}

impl AsnRegistry {
    /// Builds the registry from the file names in the ASN directory.
    ///
    /// Only regular files are considered. A file whose name does not
    /// follow the `AS<number>` grammar fails the whole run, naming the
    /// offending path.
    pub fn from_dir(path: &Path) -> Result<Self, AsnDirError> {
        let mut asns = HashSet::new();
        let dir = fs::read_dir(path).map_err(|err| {
            AsnDirError::Io(path.into(), err)
        })?;
        for entry in dir {
            let entry = entry.map_err(|err| {
                AsnDirError::Io(path.into(), err)
            })?;
            let file_type = entry.file_type().map_err(|err| {
                AsnDirError::Io(entry.path(), err)
            })?;
            if !file_type.is_file() {
                continue
            }
            let asn = entry.file_name().to_str().and_then(
                parse_file_name
            ).ok_or_else(|| AsnDirError::FileName(entry.path()))?;
            asns.insert(asn);
        }
        log::debug!("ASN registry holds {} ASNs", asns.len());
        Ok(AsnRegistry { asns })
    }

    /// Returns whether the registry contains the given AS number.
    pub fn contains(&self, asn: Asn) -> bool {
        self.asns.contains(&asn)
    }

    /// Returns the number of AS numbers in the registry.
    pub fn len(&self) -> usize {
        self.asns.len()
    }

    /// Returns whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.asns.is_empty()
    }
}


//--- FromIterator

impl FromIterator<Asn> for AsnRegistry {
    fn from_iter<T: IntoIterator<Item = Asn>>(iter: T) -> Self {
        AsnRegistry { asns: iter.into_iter().collect() }
    }
}


//------------ parse_file_name -----------------------------------------------

/// Parses an ASN directory file name.
///
/// The grammar is strict: a case-insensitive `AS` followed by one or
/// more decimal digits and nothing else. Trailing characters after the
/// digits are rejected.
fn parse_file_name(name: &str) -> Option<Asn> {
    // Compare the prefix as bytes: a name starting with a multibyte
    // character makes 2 an illegal slice index.
    if name.len() <= 2 || !name.as_bytes()[..2].eq_ignore_ascii_case(b"as") {
        return None
    }
    let digits = &name[2..];
    if !digits.bytes().all(|ch| ch.is_ascii_digit()) {
        return None
    }
    u32::from_str(digits).ok().map(Asn::from_u32)
}


//============ Errors ========================================================

//------------ AsnDirError ---------------------------------------------------

/// Building the ASN registry has failed.
#[derive(Debug)]
pub enum AsnDirError {
    /// Reading the directory or an entry failed.
    Io(PathBuf, io::Error),

    /// A file name does not follow the `AS<number>` grammar.
    FileName(PathBuf),
}

impl fmt::Display for AsnDirError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AsnDirError::Io(path, err) => {
                write!(f, "failed to read '{}': {}", path.display(), err)
            }
            AsnDirError::FileName(path) => {
                write!(
                    f,
                    "invalid ASN file name '{}': \
                     expected 'AS' followed by a decimal number",
                    path.display()
                )
            }
        }
    }
}

impl error::Error for AsnDirError { }


//============ Tests =========================================================
