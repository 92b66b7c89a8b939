//! Rendering a ROA set.
//!
//! Two formats are supported: a line-oriented router config text and a
//! JSON document with a metadata block. Both list IPv4 entries before
//! IPv6 entries in the order the set holds them. The returned strings
//! carry no trailing newline; stdout printing adds one.

use chrono::Utc;
use serde::Serialize;
use crate::resources::addr::Prefix;
use crate::resources::asn::Asn;
use crate::roa::RoaSet;

/// How long a generated JSON document stays valid, in seconds.
const VALIDITY_PERIOD: i64 = 14 * 86400;


//------------ Text format ---------------------------------------------------

impl RoaSet {
    /// Renders the set as router config text.
    ///
    /// One `route <prefix> max <maxLength> as <asn>;` line per entry
    /// under a fixed header comment.
    pub fn to_text(&self) -> String {
        let mut res = String::from("# NeoNetwork ROA tool\n");
        let mut first = true;
        for entry in self.entries() {
            if !first {
                res.push('\n');
            }
            first = false;
            res.push_str(&format!(
                "route {} max {} as {};",
                entry.prefix, entry.max_length, entry.asn.into_u32()
            ));
        }
        res
    }
}


//------------ JSON format ---------------------------------------------------

/// The JSON document wrapping the ROA list.
#[derive(Serialize)]
struct Document {
    metadata: Metadata,
    roas: Vec<JsonEntry>,
}

/// The metadata block of the JSON document.
#[derive(Serialize)]
struct Metadata {
    /// The number of ROA entries in the document.
    counts: usize,

    /// The generation time in Unix seconds.
    generated: i64,

    /// The time in Unix seconds until which the document is valid.
    valid: i64,
}

/// One ROA entry as it appears in the JSON document.
#[derive(Serialize)]
struct JsonEntry {
    #[serde(serialize_with = "Asn::serialize_as_str")]
    asn: Asn,
    prefix: Prefix,
    #[serde(rename = "maxLength")]
    max_length: u8,
}

impl RoaSet {
    /// Renders the set as a pretty-printed JSON document.
    ///
    /// The document is valid for fourteen days from generation.
    pub fn to_json(&self) -> String {
        self.to_json_at(Utc::now().timestamp())
    }

    /// Renders the JSON document for a given generation time.
    pub fn to_json_at(&self, generated: i64) -> String {
        let document = Document {
            metadata: Metadata {
                counts: self.len(),
                generated,
                valid: generated + VALIDITY_PERIOD,
            },
            roas: self.entries().iter().map(|entry| {
                JsonEntry {
                    asn: entry.asn,
                    prefix: entry.prefix,
                    max_length: entry.max_length,
                }
            }).collect(),
        };
        serde_json::to_string_pretty(&document).expect(
            "serialization failed"
        )
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use std::fs;
    use crate::resources::addr::AddressFamily;
    use crate::roa::{Policy, RoaSet};

    fn sample_set() -> RoaSet {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("asn")).unwrap();
        fs::create_dir(dir.path().join("node")).unwrap();
        fs::create_dir(dir.path().join("route")).unwrap();
        fs::create_dir(dir.path().join("route6")).unwrap();
        fs::File::create(dir.path().join("asn").join("AS64512")).unwrap();
        fs::write(
            dir.path().join("route").join("10.0.0.0,24"),
            "type=subnet\nas=AS64512\n"
        ).unwrap();
        fs::write(
            dir.path().join("route6").join("2001:db8::,48"),
            "type=subnet\nas=AS64512\n"
        ).unwrap();
        RoaSet::generate(
            dir.path(),
            &[AddressFamily::Ipv4, AddressFamily::Ipv6],
            Policy::default(),
        ).unwrap()
    }

    #[test]
    fn text() {
        assert_eq!(
            sample_set().to_text(),
            "# NeoNetwork ROA tool\n\
             route 10.0.0.0/24 max 29 as 64512;\n\
             route 2001:db8::/48 max 64 as 64512;"
        );
    }

    #[test]
    fn empty_text() {
        assert_eq!(RoaSet::default().to_text(), "# NeoNetwork ROA tool\n");
    }

    #[test]
    fn json() {
        let json = sample_set().to_json_at(1_700_000_000);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["metadata"]["counts"], 2);
        assert_eq!(value["metadata"]["generated"], 1_700_000_000);
        assert_eq!(value["metadata"]["valid"], 1_700_000_000 + 1_209_600);

        let roas = value["roas"].as_array().unwrap();
        assert_eq!(roas.len(), 2);
        assert_eq!(roas[0]["asn"], "AS64512");
        assert_eq!(roas[0]["prefix"], "10.0.0.0/24");
        assert_eq!(roas[0]["maxLength"], 29);
        assert_eq!(roas[1]["asn"], "AS64512");
        assert_eq!(roas[1]["prefix"], "2001:db8::/48");
        assert_eq!(roas[1]["maxLength"], 64);
    }
}
