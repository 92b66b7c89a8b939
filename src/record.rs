//! Config records in the simplified shell-variable format.
//!
//! Every file in the node and route directories carries a sequence of
//! `key=value` assignments, one per line, with `#` comments and blank
//! lines in between. [`Record::parse`] turns the raw file content into a
//! flat mapping of normalized keys to normalized values.

use std::{error, fmt};
use std::collections::HashMap;
use crate::resources::asn::{Asn, ParseAsnError};


//------------ Record --------------------------------------------------------

/// The parsed content of one config file.
///
/// A record is created per file, used to resolve that file's entry and
/// then discarded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Record {
    fields: HashMap<String, String>,
}

impl Record {
    /// Parses the raw content of a config file.
    ///
    /// Blank lines and lines whose first non-whitespace character is `#`
    /// are skipped. Every other line must carry a `key=value` assignment.
    /// The value is everything after the first `=`; further `=`
    /// characters are kept literally. Key and value are trimmed, stripped
    /// of any `"` and `'` characters and lower-cased. A line without any
    /// `=` maps the key to the empty string. A later assignment to a key
    /// overwrites an earlier one.
    pub fn parse(content: &str) -> Result<Self, RecordError> {
        let mut fields = HashMap::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue
            }
            let (key, value) = match line.find('=') {
                Some(pos) => (&line[..pos], &line[pos + 1..]),
                None => (line, ""),
            };
            let key = normalize(key);
            if key.is_empty() {
                return Err(RecordError::Malformed(line.into()))
            }
            let value = value.split('=').map(
                normalize
            ).collect::<Vec<_>>().join("=");
            fields.insert(key, value);
        }
        Ok(Record { fields })
    }

    /// Returns the value of a field if it is present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the value of a field if it is present and non-empty.
    ///
    /// Config files occasionally carry `key=` with nothing after the
    /// equals sign which consumers of optional fields treat as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Returns the value of a required field.
    pub fn require(&self, key: &str) -> Result<&str, RecordError> {
        self.get(key).ok_or_else(|| RecordError::MissingField(key.into()))
    }

    /// Returns the value of a required field parsed as an AS number.
    pub fn require_asn(&self, key: &str) -> Result<Asn, RecordError> {
        self.require(key)?.parse().map_err(|err| {
            RecordError::InvalidAsn(key.into(), err)
        })
    }
}

/// Normalizes a key or value fragment.
fn normalize(s: &str) -> String {
    let s: String = s.chars().filter(|ch| {
        !matches!(ch, '"' | '\'')
    }).collect();
    s.trim().to_lowercase()
}


//============ Errors ========================================================

//------------ RecordError ---------------------------------------------------

/// Parsing or interpreting a config record has failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RecordError {
    /// A line did not carry a usable `key=value` assignment.
    Malformed(String),

    /// A required field was absent.
    MissingField(String),

    /// A field did not hold a valid AS number.
    InvalidAsn(String, ParseAsnError),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RecordError::Malformed(line) => {
                write!(f, "malformed record line '{}'", line)
            }
            RecordError::MissingField(key) => {
                write!(f, "missing required field '{}'", key)
            }
            RecordError::InvalidAsn(key, err) => {
                write!(f, "field '{}': {}", key, err)
            }
        }
    }
}

impl error::Error for RecordError { }


//============ Tests =========================================================
