//! CoreBank Common Types
//!
//! This crate contains the types shared across the CoreBank ledger:
//! account and transfer identifiers and the error taxonomy.

pub mod error;
pub mod identifiers;

pub use error::*;
pub use identifiers::*;
