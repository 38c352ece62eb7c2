//! Cache Module
//!
//! Random-key payload storage and TTL-based result memoization.

mod random_key;
mod result;
mod value;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use random_key::RandomKeyCache;
pub use result::{CachedResult, ExpiringResultCache};
pub use value::Value;
