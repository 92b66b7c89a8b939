//! AS numbers.

use std::{error, fmt};
use std::str::FromStr;


//------------ Asn -----------------------------------------------------------

/// An AS number (ASN).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Asn(u32);

impl Asn {
    /// Creates an AS number from a `u32`.
    pub fn from_u32(value: u32) -> Self {
        Asn(value)
    }

    /// Converts an AS number into a `u32`.
    pub fn into_u32(self) -> u32 {
        self.0
    }

    /// Serializes an AS number as a string with an `AS` prefix.
    ///
    /// This is intended for use with Serde's field attributes, i.e.,
    /// `#[serde(serialize_with = "Asn::serialize_as_str")]`.
    pub fn serialize_as_str<S: serde::Serializer>(
        &self, serializer: S
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("AS{}", self.0))
    }
}


//--- From

impl From<u32> for Asn {
    fn from(id: u32) -> Self {
        Asn(id)
    }
}

impl From<Asn> for u32 {
    fn from(id: Asn) -> Self {
        id.0
    }
}


//--- FromStr

impl FromStr for Asn {
    type Err = ParseAsnError;

    /// Parses an AS number from a string.
    ///
    /// The string may or may not have a case-insensitive `"AS"` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Compare the prefix as bytes: the input may start with a
        // multibyte character, which makes 2 an illegal slice index.
        let s = if s.len() > 2
            && s.as_bytes()[..2].eq_ignore_ascii_case(b"as")
        {
            &s[2..]
        } else {
            s
        };

        u32::from_str(s).map(Asn).map_err(|_| ParseAsnError)
    }
}


//--- Display

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}


//============ Error Types ===================================================

//------------ ParseAsnError ------------------------------------------------

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParseAsnError;

impl fmt::Display for ParseAsnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("invalid AS number")
    }
}

impl error::Error for ParseAsnError {}


//============ Tests =========================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asn() {
        assert_eq!(Asn::from_u32(1234), Asn(1234));
        assert_eq!(Asn(1234).into_u32(), 1234);

        assert_eq!(Asn::from(1234_u32), Asn(1234));
        assert_eq!(u32::from(Asn(1234)), 1234_u32);

        assert_eq!(format!("{}", Asn(1234)).as_str(), "AS1234");

        assert_eq!("0".parse::<Asn>(), Ok(Asn(0)));
        assert_eq!("AS1234".parse::<Asn>(), Ok(Asn(1234)));
        assert_eq!("as1234".parse::<Asn>(), Ok(Asn(1234)));
        assert_eq!("As1234".parse::<Asn>(), Ok(Asn(1234)));
        assert_eq!("1234".parse::<Asn>(), Ok(Asn(1234)));

        assert_eq!("".parse::<Asn>(), Err(ParseAsnError));
        assert_eq!("as".parse::<Asn>(), Err(ParseAsnError));
        assert_eq!("-1234".parse::<Asn>(), Err(ParseAsnError));
        assert_eq!("4294967296".parse::<Asn>(), Err(ParseAsnError));
    }

    #[test]
    fn asn_from_multibyte_str() {
        // Must be a parse error, not a slice panic.
        assert_eq!("中5".parse::<Asn>(), Err(ParseAsnError));
        assert_eq!("中中中".parse::<Asn>(), Err(ParseAsnError));
        assert_eq!("ä1".parse::<Asn>(), Err(ParseAsnError));
    }

    #[test]
    fn serialize_as_str() {
        #[derive(serde::Serialize)]
        struct Wrapper(
            #[serde(serialize_with = "Asn::serialize_as_str")]
            Asn,
        );

        assert_eq!(
            serde_json::to_string(&Wrapper(Asn(65000))).unwrap(),
            "\"AS65000\""
        );
    }
}
