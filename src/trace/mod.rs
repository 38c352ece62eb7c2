//! Trace Module
//!
//! Call counting, input/output history recording, and replay of recorded
//! operation histories.

mod instrument;
mod replay;

pub use instrument::{
    call_count, instrument, CacheStoreOp, CallCounted, CallHistory, StoreOp,
};
pub use replay::ReplayLog;

/// Suffix of the list key holding recorded inputs for an operation.
pub const INPUTS_SUFFIX: &str = ":inputs";

/// Suffix of the list key holding recorded outputs for an operation.
pub const OUTPUTS_SUFFIX: &str = ":outputs";
