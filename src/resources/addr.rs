//! IP address prefixes.

use std::{error, fmt};
use std::net::{AddrParseError, IpAddr, Ipv4Addr, Ipv6Addr};
use std::num::ParseIntError;
use std::str::FromStr;


//------------ AddressFamily -------------------------------------------------

/// The address family of a prefix or a route directory.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Returns the longest allowed prefix length for the family.
    pub fn max_prefix_len(self) -> u8 {
        match self {
            AddressFamily::Ipv4 => 32,
            AddressFamily::Ipv6 => 128,
        }
    }

    /// Parses a string into an exact prefix of this family.
    ///
    /// The string must be in `<addr>/<len>` notation with the address
    /// belonging to this family. Host bits beyond the prefix length must
    /// be zero; a non-zero host portion is an error, not silently masked.
    pub fn parse_prefix(self, s: &str) -> Result<Prefix, ParsePrefixError> {
        if s.is_empty() {
            return Err(ParsePrefixError::Empty)
        }
        let slash = s.find('/').ok_or(ParsePrefixError::MissingLen)?;
        let addr = match self {
            AddressFamily::Ipv4 => {
                IpAddr::from(
                    Ipv4Addr::from_str(&s[..slash]).map_err(
                        ParsePrefixError::InvalidAddr
                    )?
                )
            }
            AddressFamily::Ipv6 => {
                IpAddr::from(
                    Ipv6Addr::from_str(&s[..slash]).map_err(
                        ParsePrefixError::InvalidAddr
                    )?
                )
            }
        };
        let len = u8::from_str(&s[slash + 1..]).map_err(
            ParsePrefixError::InvalidLen
        )?;
        Prefix::new(addr, len).map_err(ParsePrefixError::InvalidPrefix)
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("IPv4"),
            AddressFamily::Ipv6 => f.write_str("IPv6"),
        }
    }
}


//------------ Prefix --------------------------------------------------------

/// An IP address prefix: an IP address and a prefix length.
///
/// A value of this type is always exact: construction fails if any host
/// bits beyond the prefix length are set. Two prefixes of different
/// address families are never equal and never cover each other.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Prefix {
    /// The network address of the prefix.
    addr: IpAddr,

    /// The prefix length.
    len: u8,
}

impl Prefix {
    /// Creates a new prefix from an address and a length.
    ///
    /// The function returns an error if `len` is too large for the
    /// address family of `addr` or if `addr` has host bits set.
    pub fn new(addr: IpAddr, len: u8) -> Result<Self, PrefixError> {
        if len > Self::family_of(addr).max_prefix_len() {
            return Err(PrefixError::LenOverflow)
        }
        if !Self::is_host_zero(addr, len) {
            return Err(PrefixError::NonZeroHost)
        }
        Ok(Prefix { addr, len })
    }

    /// Returns the address part of the prefix.
    pub fn addr(self) -> IpAddr {
        self.addr
    }

    /// Returns the length part of the prefix.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(self) -> u8 {
        self.len
    }

    /// Returns the address family of the prefix.
    pub fn family(self) -> AddressFamily {
        Self::family_of(self.addr)
    }

    /// Returns whether the prefix is for an IPv4 address.
    pub fn is_v4(self) -> bool {
        self.addr.is_ipv4()
    }

    /// Returns whether the prefix `self` covers the prefix `other`.
    ///
    /// A prefix covers another if the other's address range is contained
    /// in or equal to its own.
    pub fn covers(self, other: Self) -> bool {
        // Differing families? Not covering.
        if self.is_v4() != other.is_v4() {
            return false
        }

        // If self is more specific than other, it can't cover it.
        if self.len > other.len {
            return false
        }

        // Equal lengths cover only if identical. This also keeps the
        // shift below away from a full-length prefix.
        if self.len == other.len {
            return self == other
        }

        // other now needs to start with the same bits as self.
        Self::bits(self.addr)
            == Self::bits(other.addr) & !(u128::MAX >> self.len)
    }

    /// Returns the address bits aligned to the top of a `u128`.
    ///
    /// IPv4 addresses land in the upper four bytes so prefix lengths
    /// count from the top for both families.
    fn bits(addr: IpAddr) -> u128 {
        match addr {
            IpAddr::V4(addr) => u128::from(u32::from(addr)) << 96,
            IpAddr::V6(addr) => u128::from(addr),
        }
    }

    /// Checks whether the host portion of the address is zero.
    fn is_host_zero(addr: IpAddr, len: u8) -> bool {
        Self::bits(addr).trailing_zeros()
            >= 128u32.saturating_sub(len.into())
    }

    fn family_of(addr: IpAddr) -> AddressFamily {
        match addr {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }
}


//--- FromStr and Display

impl FromStr for Prefix {
    type Err = ParsePrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParsePrefixError::Empty)
        }
        let slash = s.find('/').ok_or(ParsePrefixError::MissingLen)?;
        let addr = IpAddr::from_str(&s[..slash]).map_err(
            ParsePrefixError::InvalidAddr
        )?;
        let len = u8::from_str(&s[slash + 1..]).map_err(
            ParsePrefixError::InvalidLen
        )?;
        Prefix::new(addr, len).map_err(ParsePrefixError::InvalidPrefix)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}


//--- Serialize

impl serde::Serialize for Prefix {
    fn serialize<S: serde::Serializer>(
        &self, serializer: S
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}


//============ Errors ========================================================

//------------ PrefixError ---------------------------------------------------

/// Creating a prefix has failed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PrefixError {
    /// The prefix length is longer than allowed for the address family.
    LenOverflow,

    /// The host portion of the address has non-zero bits set.
    NonZeroHost,
}

impl PrefixError {
    /// Returns a static error message.
    pub fn static_description(self) -> &'static str {
        match self {
            PrefixError::LenOverflow => "prefix length too large",
            PrefixError::NonZeroHost => "non-zero host portion",
        }
    }
}

impl fmt::Display for PrefixError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.static_description())
    }
}

impl error::Error for PrefixError { }


//------------ ParsePrefixError ----------------------------------------------

/// Creating an IP address prefix from a string has failed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParsePrefixError {
    /// The value parsed was empty.
    Empty,

    /// The length portion after a slash was missing.
    MissingLen,

    /// The address portion is invalid.
    InvalidAddr(AddrParseError),

    /// The length portion is invalid.
    InvalidLen(ParseIntError),

    /// The combined prefix is invalid.
    InvalidPrefix(PrefixError),
}

impl fmt::Display for ParsePrefixError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParsePrefixError::Empty => f.write_str("empty string"),
            ParsePrefixError::MissingLen => {
                f.write_str("missing length portion")
            }
            ParsePrefixError::InvalidAddr(err) => {
                write!(f, "invalid address: {}", err)
            }
            ParsePrefixError::InvalidLen(err) => {
                write!(f, "invalid length: {}", err)
            }
            ParsePrefixError::InvalidPrefix(err) => err.fmt(f),
        }
    }
}

impl error::Error for ParsePrefixError { }


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn v4(s: &str) -> Prefix {
        AddressFamily::Ipv4.parse_prefix(s).unwrap()
    }

    fn v6(s: &str) -> Prefix {
        AddressFamily::Ipv6.parse_prefix(s).unwrap()
    }

    #[test]
    fn family_parse_prefix() {
        assert_eq!(
            v4("10.0.0.0/24").addr(),
            IpAddr::from_str("10.0.0.0").unwrap()
        );
        assert_eq!(v4("10.0.0.0/24").len(), 24);
        assert_eq!(v4("0.0.0.0/0").len(), 0);
        assert_eq!(v6("2001:db8::/32").len(), 32);
        assert_eq!(v6("::/0").len(), 0);

        // The wrong family is an invalid address, not a fallback.
        assert!(matches!(
            AddressFamily::Ipv4.parse_prefix("2001:db8::/32"),
            Err(ParsePrefixError::InvalidAddr(_))
        ));
        assert!(matches!(
            AddressFamily::Ipv6.parse_prefix("10.0.0.0/8"),
            Err(ParsePrefixError::InvalidAddr(_))
        ));

        assert_eq!(
            AddressFamily::Ipv4.parse_prefix("10.0.0.0"),
            Err(ParsePrefixError::MissingLen)
        );
        assert_eq!(
            AddressFamily::Ipv4.parse_prefix(""),
            Err(ParsePrefixError::Empty)
        );
        assert!(matches!(
            AddressFamily::Ipv4.parse_prefix("10.0.0.0/"),
            Err(ParsePrefixError::InvalidLen(_))
        ));
    }

    #[test]
    fn exactness() {
        assert!(matches!(
            AddressFamily::Ipv4.parse_prefix("10.0.0.1/24"),
            Err(ParsePrefixError::InvalidPrefix(PrefixError::NonZeroHost))
        ));
        assert!(matches!(
            AddressFamily::Ipv6.parse_prefix("2001:db8::1/64"),
            Err(ParsePrefixError::InvalidPrefix(PrefixError::NonZeroHost))
        ));
        assert!(matches!(
            AddressFamily::Ipv4.parse_prefix("10.0.0.0/33"),
            Err(ParsePrefixError::InvalidPrefix(PrefixError::LenOverflow))
        ));
        assert!(matches!(
            AddressFamily::Ipv6.parse_prefix("::/129"),
            Err(ParsePrefixError::InvalidPrefix(PrefixError::LenOverflow))
        ));

        // Host routes are fine.
        assert_eq!(v4("192.0.2.1/32").len(), 32);
        assert_eq!(v6("2001:db8::1/128").len(), 128);
    }

    #[test]
    fn covers() {
        assert!(v4("0.0.0.0/0").covers(v4("192.168.10.0/24")));
        assert!(v6("::/0").covers(v6("2001:db8:10::/48")));

        assert!(v4("10.0.0.0/8").covers(v4("10.0.0.0/16")));
        assert!(!v4("10.0.0.0/16").covers(v4("10.0.0.0/8")));
        assert!(v6("2001:db8::/32").covers(v6("2001:db8:10::/48")));
        assert!(!v6("2001:db8:10::/48").covers(v6("2001:db8::/32")));

        // Equal prefixes cover each other.
        assert!(v4("10.0.0.0/24").covers(v4("10.0.0.0/24")));
        assert!(v4("192.0.2.1/32").covers(v4("192.0.2.1/32")));
        assert!(!v4("192.0.2.1/32").covers(v4("192.0.2.2/32")));
        assert!(v6("2001:db8::1/128").covers(v6("2001:db8::1/128")));
        assert!(!v6("2001:db8::1/128").covers(v6("2001:db8::2/128")));

        // Disjoint.
        assert!(!v4("10.0.0.0/24").covers(v4("10.0.1.0/24")));

        // Never across families.
        assert!(!v4("0.0.0.0/0").covers(v6("::/0")));
        assert!(!v6("::/0").covers(v4("0.0.0.0/0")));
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", v4("10.0.0.0/24")), "10.0.0.0/24");
        assert_eq!(
            format!("{}", v6("2001:db8::/32")), "2001:db8::/32"
        );
        assert_eq!(
            serde_json::to_string(&v4("10.0.0.0/24")).unwrap(),
            "\"10.0.0.0/24\""
        );
    }
}
