//! Core framework: errors, typed parameters, algorithm ids, and the
//! provider boundary.

pub mod algid;
pub mod error;
pub mod params;
pub mod provider;
