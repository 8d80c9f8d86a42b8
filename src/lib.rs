//! Drops rows of the Pima diabetes records into a 2D physics playground as
//! chains of jointed, per-feature scaled bodies, and drives a camera and a
//! handful of touch tools over them.

pub mod build;
pub mod data;
pub mod engine;
pub mod error;
pub mod gesture;
pub mod render;
pub mod session;
pub mod sim;

pub use error::{ChartError, Result};
