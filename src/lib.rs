//! stockscreen: read-only screening over per-symbol financial metric records.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], command-line entry in [`cli`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
