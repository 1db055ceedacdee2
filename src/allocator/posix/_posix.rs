#![cfg(all(unix, feature = "c"))]
//! [`PosixMemalign`]
//!
//! | Rust                              | C                                                 |
//! | ----------------------------------| --------------------------------------------------|
//! | [`fat::Alloc::alloc_uninit`]      | <code>[posix_memalign]\(&amp;ptr, align, size\)</code>
//! | [`fat::Alloc::alloc_zeroed`]      | <code>[posix_memalign]\(&amp;ptr, align, size\)</code> + `memset`
//! | [`fat::Free::free`]               | <code>[free]\(ptr\)</code>
//! | [`thin::Free::free`]              | <code>[free]\(ptr\)</code>
//!
//! [posix_memalign]:   https://pubs.opengroup.org/onlinepubs/9699919799/functions/posix_memalign.html
//! [free]:             https://pubs.opengroup.org/onlinepubs/9699919799/functions/free.html

#[cfg(doc)] use crate::*;

mod posix_memalign;     pub use posix_memalign::PosixMemalign;
