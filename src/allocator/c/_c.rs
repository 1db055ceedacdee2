#![cfg(all(feature = "c", any(unix, windows)))]
//! [`Malloc`]
//!
//! | Rust                              | C                     |
//! | ----------------------------------| ----------------------|
//! | [`thin::Alloc::alloc_uninit`]     | [`malloc`]            |
//! | [`thin::Alloc::alloc_zeroed`]     | [`calloc`]            |
//! | [`thin::Free::free`]              | [`free`]              |
//!
//! [`malloc`]: https://en.cppreference.com/w/c/memory/malloc
//! [`calloc`]: https://en.cppreference.com/w/c/memory/calloc
//! [`free`]:   https://en.cppreference.com/w/c/memory/free

#[cfg(doc)] use crate::*;

mod malloc;         pub use malloc::Malloc;
