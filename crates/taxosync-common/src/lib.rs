//! Taxosync Common Library
//!
//! Shared logging setup used by the taxosync workspace members.

pub mod logging;
