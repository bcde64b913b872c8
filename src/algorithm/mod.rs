//! Algorithms for trial data-quality monitoring
//!
//! This module contains per-patient scoring and the aggregations built on
//! the scored table.

pub mod aggregation;
pub mod scoring;
