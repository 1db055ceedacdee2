//! Macro implementation details.  These are supposed to be `#[doc(hidden)]` from view and not used directly.

pub mod prelude {
    pub use crate::{self as ialign, Alignment, meta::Meta as _, meta, thin, fat};

    pub use core::prelude::rust_2021::*;
    pub use core::{assert, assert_eq, assert_ne, debug_assert, debug_assert_eq, debug_assert_ne};
    pub use core::primitive::*;

    pub use core::alloc::Layout;
    pub use core::mem::MaybeUninit;
    pub use core::ptr::{NonNull, null_mut};
    pub use crate::error::ExcessiveAlignmentRequestedError;
}

/// Implement [`ialign`](crate) traits in terms of other traits
#[macro_export] macro_rules! impls {
    () => {};



    // unsafe impl ialign::fat::{...} for {...} => ialign::thin::{...};

    ( unsafe impl $([$($gdef:tt)*])? $(::)? ialign::fat::Alloc for $ty:ty $(where [$($where:tt)*])? => $(::)? ialign::thin::Alloc; $($tt:tt)* ) => {
        unsafe impl $(<$($gdef)*>)? $crate::fat::Alloc for $ty $(where $($where)*)? {
            fn alloc_uninit(&self, layout: ::core::alloc::Layout) -> ::core::result::Result<::core::ptr::NonNull<::core::mem::MaybeUninit<::core::primitive::u8>>, Self::Error> {
                use $crate::_impls::prelude::*;
                ExcessiveAlignmentRequestedError::check(layout, Self::MAX_ALIGN)?;
                $crate::thin::Alloc::alloc_uninit(self, layout.size())
            }
            fn alloc_zeroed(&self, layout: ::core::alloc::Layout) -> ::core::result::Result<::core::ptr::NonNull<::core::primitive::u8>, Self::Error> {
                use $crate::_impls::prelude::*;
                ExcessiveAlignmentRequestedError::check(layout, Self::MAX_ALIGN)?;
                $crate::thin::Alloc::alloc_zeroed(self, layout.size())
            }
        }
        $crate::impls!($($tt)*);
    };

    ( unsafe impl $([$($gdef:tt)*])? $(::)? ialign::fat::Free for $ty:ty $(where [$($where:tt)*])? => $(::)? ialign::thin::Free; $($tt:tt)* ) => {
        unsafe impl $(<$($gdef)*>)? $crate::fat::Free for $ty $(where $($where)*)? {
            unsafe fn free(&self, ptr: ::core::ptr::NonNull<::core::mem::MaybeUninit<::core::primitive::u8>>, layout: ::core::alloc::Layout) {
                use $crate::_impls::prelude::*;
                if layout.align() > Self::MAX_ALIGN.as_usize() { $crate::bug::ub::invalid_free_align_for_allocator(layout.align()) }
                unsafe { $crate::thin::Free::free(self, ptr) }
            }
        }
        $crate::impls!($($tt)*);
    };
}
