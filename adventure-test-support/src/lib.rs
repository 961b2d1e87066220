//! Test helpers shared by the adventure crates: trace capture, the
//! property-test run profile, and canned room datasets.

pub mod ci;
pub mod datasets;
pub mod trace;
