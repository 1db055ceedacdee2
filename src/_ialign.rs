#![doc = include_str!("../Readme.md")]
#![no_std]

#![forbid(unreachable_patterns)] // often indicates e.g. a typoed "constant" in a match statement
#![forbid(unsafe_op_in_unsafe_fn)]
#![deny(non_snake_case)] // often indicates e.g. a typoed "constant" in a match statement
#![warn(clippy::undocumented_unsafe_blocks)]
#![allow(clippy::let_unit_value)] // very common for const assertions
#![cfg_attr(not(feature = "default"), allow(dead_code, unused_imports))] // suppress noisy "dead code" warnings in non-default build configs

#[cfg(any(feature = "alloc", doc, test))] extern crate alloc;
#[cfg(any(feature = "std",   doc, test))] extern crate std;

type AllocNN    = core::ptr::NonNull<core::mem::MaybeUninit<u8>>;
type AllocNN0   = core::ptr::NonNull<u8>;


#[macro_use] mod _macros;
#[doc(hidden)] pub mod _impls;

pub use align::alignment::*;
#[doc(hidden)] pub use align::constants::*;
mod align {
    pub mod alignment;
    pub mod constants;
}

#[path = "allocator/_allocator.rs"      ] pub mod allocator; pub use allocator::BACKEND;
#[path = "traits/_traits.rs"            ] pub mod traits; #[doc(hidden)] pub use traits::*;
#[path = "util/_util.rs"                ] mod util;

mod aligned_allocator;  pub use aligned_allocator::AlignedAllocator;
mod buf;                pub use buf::ABuf;
pub mod facade;         pub use facade::{Facade, allocate_aligned, try_allocate_aligned, free_aligned};

#[doc(hidden)] pub mod bug;
pub mod error;
