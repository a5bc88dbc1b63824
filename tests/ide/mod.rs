//! IDE feature tests
//!
//! Tests for:
//! - Go to definition (variables, values, unsupported nodes)
//! - AnalysisHost snapshots and concurrent access

pub mod tests_analysis;
pub mod tests_goto;
