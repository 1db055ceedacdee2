#![cfg(all(any(target_os = "linux", target_os = "android", target_os = "solaris", target_os = "illumos"), feature = "c"))]
//! [`Memalign`]
//!
//! | Rust                              | C                                 |
//! | ----------------------------------| ----------------------------------|
//! | [`fat::Alloc::alloc_uninit`]      | <code>[memalign]\(align, size\)</code>
//! | [`fat::Alloc::alloc_zeroed`]      | <code>[memalign]\(align, size\)</code> + `memset`
//! | [`fat::Free::free`]               | <code>[free]\(ptr\)</code>
//! | [`thin::Free::free`]              | <code>[free]\(ptr\)</code>
//!
//! [memalign]: https://man7.org/linux/man-pages/man3/memalign.3.html
//! [free]:     https://man7.org/linux/man-pages/man3/free.3.html

#[cfg(doc)] use crate::*;

mod memalign;           pub use memalign::Memalign;
