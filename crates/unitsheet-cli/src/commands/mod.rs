//! CLI command implementations.

pub mod annotate;
pub mod extract;
pub mod score;
pub mod status;
pub mod suggest;
pub mod validate;
