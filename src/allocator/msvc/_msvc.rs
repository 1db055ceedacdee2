#![cfg(all(windows, any(target_env = "msvc", target_env = "gnu"), feature = "msvc"))]
//! [`AlignedMalloc`]
//!
//! | Rust                              | C (Release CRT)       | ~~Debug CRT~~ (N/A)       |
//! | ----------------------------------| ----------------------| --------------------------|
//! | [`fat::Alloc::alloc_uninit`]      | [`_aligned_malloc`]   | `_aligned_malloc_dbg`     |
//! | [`fat::Alloc::alloc_zeroed`]      | [`_aligned_recalloc`] | `_aligned_recalloc_dbg`   |
//! | [`fat::Free::free`]               | [`_aligned_free`]     | `_aligned_free_dbg`       |
//! | [`thin::Free::free`]              | [`_aligned_free`]     | `_aligned_free_dbg`       |
//!
//! [`_aligned_malloc`]:    https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-malloc
//! [`_aligned_recalloc`]:  https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-recalloc
//! [`_aligned_free`]:      https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-free

#[cfg(doc)] use crate::*;

mod aligned_malloc;     pub use aligned_malloc::*;
