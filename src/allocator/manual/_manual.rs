//! [`Manual`]
//!
//! Portable fallback: over-allocate from any unaligned base allocator, then align within the block.
//!
//! ```text
//! base                                aligned (returned)
//! │                                   │
//! ▼                                   ▼
//! ┌───────────────────┬───────────────┬─────────────────────────┬──────┐
//! │ padding           │ Header        │ size bytes              │ slop │
//! └───────────────────┴───────────────┴─────────────────────────┴──────┘
//!                      { base, base size }
//! ```

#[cfg(doc)] use crate::*;

mod manual;             pub use manual::Manual;
