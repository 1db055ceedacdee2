#![cfg(feature = "alloc")]
//! [`Global`]

#[cfg(doc)] use crate::*;

mod global;         pub use global::Global;
