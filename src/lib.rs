//! Generating ROAs from the NeoNetwork config database.
//!
//! The NeoNetwork registry is a directory tree of small shell-variable
//! style config files: one file per authorized AS number, one per node,
//! and one per announced route. This crate turns such a tree into a set
//! of _Route Origin Authorizations_ (ROAs) – statements that a given AS
//! is allowed to originate a given address prefix up to a maximum prefix
//! length – rendered either as router config text or as a JSON document.
//!
//! Processing is a single synchronous batch: the registry of authorized
//! ASNs is read from the `asn/` directory, the node table from `node/`,
//! routes from `route/` and `route6/`. Any parse or validation failure
//! aborts the whole run naming the offending input; no partial output is
//! ever produced.
//!
//! The entry point is [`roa::RoaSet::generate`].

pub mod node;
pub mod output;
pub mod overlap;
pub mod record;
pub mod registry;
pub mod resources;
pub mod roa;
pub mod route;
