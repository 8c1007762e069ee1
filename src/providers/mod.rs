//! Built-in providers.

pub mod software;
