//! CLI command implementations.

pub mod canon;
pub mod common;
pub mod gates;
pub mod grade;
pub mod propagate;
pub mod version;
