//! Core domain types and logic.

pub mod alias;
pub mod condition;
pub mod condition_eval;
pub mod condition_parser;
pub mod config_validation;
pub mod error;
pub mod filter;
pub mod query;
pub mod record;
pub mod store;
pub mod value;
