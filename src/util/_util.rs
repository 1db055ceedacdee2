//! Internal helpers shared by allocators, the facade, and tests

pub mod bytes;
pub mod nn;
pub mod slice;
