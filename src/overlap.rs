//! Checking a candidate set for illegal prefix overlaps.
//!
//! Two prefixes overlap if one covers the other; for CIDR prefixes any
//! overlap is a containment. An overlap is only allowed when the more
//! specific of the two candidates explicitly declared the less specific
//! prefix in its `supernet` field, and then only for strict containment.
//! Identical prefixes are always a violation, no matter who announced
//! them.
//!
//! The check is a plain O(n²) pass over all pairs. Config directories
//! hold at most a few hundred entries, so a prefix trie would not buy
//! anything here.

use std::{error, fmt};
use crate::route::RouteCandidate;


//------------ check ---------------------------------------------------------

/// Checks all unordered candidate pairs for illegal overlaps.
///
/// The first offending pair fails the whole run; both entries are named
/// in the error.
pub fn check(candidates: &[RouteCandidate]) -> Result<(), OverlapError> {
    for (pos, first) in candidates.iter().enumerate() {
        for second in &candidates[pos + 1..] {
            // net1 is the one with the shorter or equal prefix length.
            let (net1, net2) = if first.prefix.len() <= second.prefix.len() {
                (first, second)
            }
            else {
                (second, first)
            };
            if !net1.prefix.covers(net2.prefix) {
                continue
            }
            if net1.prefix != net2.prefix
                && net2.supernet == Some(net1.prefix)
            {
                // Strict containment declared up front. This is allowed.
                continue
            }
            return Err(OverlapError::new(net1.clone(), net2.clone()))
        }
    }
    Ok(())
}


//============ Errors ========================================================

//------------ OverlapError --------------------------------------------------

/// Two candidates overlap without a licensing supernet declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OverlapError {
    /// The less specific candidate of the pair.
    net1: RouteCandidate,

    /// The more specific candidate of the pair.
    net2: RouteCandidate,
}

impl OverlapError {
    fn new(net1: RouteCandidate, net2: RouteCandidate) -> Self {
        OverlapError { net1, net2 }
    }

    /// Returns the less specific candidate of the offending pair.
    pub fn net1(&self) -> &RouteCandidate {
        &self.net1
    }

    /// Returns the more specific candidate of the offending pair.
    pub fn net2(&self) -> &RouteCandidate {
        &self.net2
    }
}

impl fmt::Display for OverlapError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f, "illegal overlap: entry {} overlaps entry {}",
            self.net2, self.net1
        )
    }
}

impl error::Error for OverlapError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use crate::resources::addr::{AddressFamily, Prefix};
    use crate::resources::asn::Asn;

    fn candidate(
        asn: u32, prefix: &str, supernet: Option<&str>
    ) -> RouteCandidate {
        let family = if prefix.contains(':') {
            AddressFamily::Ipv6
        }
        else {
            AddressFamily::Ipv4
        };
        RouteCandidate {
            asn: Asn::from_u32(asn),
            prefix: family.parse_prefix(prefix).unwrap(),
            supernet: supernet.map(|s| family.parse_prefix(s).unwrap()),
        }
    }

    fn net1_prefix(err: &OverlapError) -> Prefix {
        err.net1().prefix
    }

    #[test]
    fn disjoint_is_fine() {
        assert_eq!(
            check(&[
                candidate(64512, "10.0.0.0/24", None),
                candidate(64512, "10.0.1.0/24", None),
                candidate(64513, "192.168.0.0/16", None),
            ]),
            Ok(())
        );
    }

    #[test]
    fn identical_prefixes_are_illegal() {
        let set = [
            candidate(64512, "10.0.0.0/24", None),
            candidate(64513, "10.0.0.0/24", None),
        ];
        assert!(check(&set).is_err());

        // A supernet declaration cannot license equality.
        let set = [
            candidate(64512, "10.0.0.0/24", None),
            candidate(64513, "10.0.0.0/24", Some("10.0.0.0/24")),
        ];
        assert!(check(&set).is_err());
    }

    #[test]
    fn containment_needs_declaration() {
        let undeclared = [
            candidate(64512, "10.0.0.0/8", None),
            candidate(64513, "10.0.0.0/16", None),
        ];
        let err = check(&undeclared).unwrap_err();
        assert_eq!(
            net1_prefix(&err),
            AddressFamily::Ipv4.parse_prefix("10.0.0.0/8").unwrap()
        );

        let declared = [
            candidate(64512, "10.0.0.0/8", None),
            candidate(64513, "10.0.0.0/16", Some("10.0.0.0/8")),
        ];
        assert_eq!(check(&declared), Ok(()));

        // Declaring some other prefix does not help.
        let wrong = [
            candidate(64512, "10.0.0.0/8", None),
            candidate(64513, "10.0.0.0/16", Some("10.1.0.0/16")),
        ];
        assert!(check(&wrong).is_err());
    }

    #[test]
    fn declaration_direction_matters() {
        // The supernet must be declared on the more specific entry.
        let set = [
            candidate(64512, "10.0.0.0/8", Some("10.0.0.0/16")),
            candidate(64513, "10.0.0.0/16", None),
        ];
        assert!(check(&set).is_err());
    }

    #[test]
    fn ipv6_containment() {
        let set = [
            candidate(64512, "2001:db8::/32", None),
            candidate(64513, "2001:db8:10::/48", Some("2001:db8::/32")),
        ];
        assert_eq!(check(&set), Ok(()));

        let set = [
            candidate(64512, "2001:db8::/32", None),
            candidate(64513, "2001:db8:10::/48", None),
        ];
        assert!(check(&set).is_err());
    }

    #[test]
    fn order_of_pair_does_not_matter() {
        // The more specific entry may come first in the set.
        let set = [
            candidate(64512, "10.0.0.0/16", None),
            candidate(64513, "10.0.0.0/8", None),
        ];
        let err = check(&set).unwrap_err();
        assert_eq!(
            net1_prefix(&err),
            AddressFamily::Ipv4.parse_prefix("10.0.0.0/8").unwrap()
        );
    }
}
