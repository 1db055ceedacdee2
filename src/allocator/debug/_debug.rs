//! [`Counting`], [`Null`]
//!
//! Allocators for verifying leak freedom and failure propagation.

#[cfg(doc)] use crate::*;

mod counting;       pub use counting::Counting;
mod null;           pub use null::Null;
