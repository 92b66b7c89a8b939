//! Address and AS number resources.
//!
//! This module contains the basic types the rest of the crate deals in:
//! AS numbers in [`asn`] and address prefixes in [`addr`].

pub mod addr;
pub mod asn;
