//! Offline statistics harness: policy-only races over randomized checkpoint
//! tables, tallied into per-limit crab risk.

mod config;
mod error;
mod report;
mod simulator;

pub use config::*;
pub use error::*;
pub use report::*;
pub use simulator::*;
