//! CLI command implementations.

pub mod boxing;
pub mod common;
pub mod flatten;
pub mod version;
