//! Transformation module.
//!
//! This module handles CSV rows to routing table conversion:
//! - Row: Data line to routing entry
//! - Builder: Digital / analog partitioning
//! - Pipeline: Main conversion pipeline

pub mod builder;
pub mod pipeline;
pub mod row;

pub use builder::{Placement, TableBuilder, DEFAULT_TIME_FORMAT};
pub use pipeline::*;
pub use row::RowTransformer;
