use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::mem::MaybeUninit;
use core::ptr::{NonNull, null_mut};

/// > This function sets `errno` to `ENOMEM` if the memory allocation failed or if the requested size was greater than `_HEAP_MAXREQ`.
/// >
/// > <https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-malloc>
///
/// ```cpp
/// // Maximum heap request the heap manager will attempt
/// #ifdef _WIN64
///     #define _HEAP_MAXREQ 0xFFFFFFFFFFFFFFE0
/// #else
///     #define _HEAP_MAXREQ 0xFFFFFFE0
/// #endif
/// ```
///
/// `C:\Program Files (x86)\Windows Kits\10\Include\10.0.22621.0\ucrt\malloc.h`
const _HEAP_MAXREQ : usize = usize::MAX & !0x1F;



/// [`_aligned_malloc`] / [`_aligned_recalloc`] / [`_aligned_free`]
///
/// | Rust                              | C (Release CRT)       |
/// | ----------------------------------| ----------------------|
/// | [`fat::Alloc::alloc_uninit`]      | [`_aligned_malloc`]   |
/// | [`fat::Alloc::alloc_zeroed`]      | [`_aligned_recalloc`] |
/// | [`fat::Free::free`]               | [`_aligned_free`]     |
/// | [`thin::Free::free`]              | [`_aligned_free`]     |
///
/// Zero sized layouts are rejected rather than forwarded: they would trip the CRT's invalid parameter handler.
///
/// [`_aligned_malloc`]:    https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-malloc
/// [`_aligned_recalloc`]:  https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-recalloc
/// [`_aligned_free`]:      https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/aligned-free
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct AlignedMalloc;

impl Meta for AlignedMalloc {
    type Error                      = ();
    const MIN_ALIGN     : Alignment = Alignment::of::<*const ()>(); // the CRT rounds smaller requests up
    const MAX_ALIGN     : Alignment = Alignment::MAX;
    const MAX_SIZE      : usize     = _HEAP_MAXREQ;
    const ZST_SUPPORTED : bool      = false;
}

// SAFETY: ✔️ `_aligned_malloc` and `_aligned_recalloc` allocations are intercompatible, and honor the requested power of two alignment
unsafe impl fat::Alloc for AlignedMalloc {
    #[track_caller] fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        if layout.size() == 0 || layout.size() > Self::MAX_SIZE { return Err(()) }
        // SAFETY: ✔️ `layout.align()` is a power of two, and `layout.size()` is nonzero
        let alloc = unsafe { _aligned_malloc(layout.size(), layout.align()) };
        NonNull::new(alloc.cast()).ok_or(())
    }

    #[track_caller] fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        if layout.size() == 0 || layout.size() > Self::MAX_SIZE { return Err(()) }
        // SAFETY: ✔️ `layout.align()` is a power of two, and `layout.size()` is nonzero
        // SAFETY: ✔️ `_aligned_recalloc` of null allocates fresh zeroed memory
        let alloc = unsafe { _aligned_recalloc(null_mut(), 1, layout.size(), layout.align()) };
        NonNull::new(alloc.cast()).ok_or(())
    }
}

// SAFETY: ✔️ `_aligned_free` releases `_aligned_malloc` / `_aligned_recalloc` allocations and accepts null
unsafe impl thin::Free for AlignedMalloc {
    #[track_caller] unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) {
        // SAFETY: ✔️ `ptr` is null or belongs to `self` per fn preconditions
        unsafe { _aligned_free(ptr.cast()) }
    }
}

#[no_implicit_prelude] mod cleanroom {
    use super::{impls, AlignedMalloc};

    impls! {
        unsafe impl ialign::fat::Free       for AlignedMalloc => ialign::thin::Free;
    }
}



use ffi::*;
mod ffi {
    use libc::*;

    extern "C" {
        // C:\Program Files (x86)\Windows Kits\10\Include\10.0.22621.0\ucrt\corecrt_malloc.h
        pub fn _aligned_free(block: *mut c_void);
        pub fn _aligned_malloc(size: size_t, alignment: size_t) -> *mut c_void;
        pub fn _aligned_recalloc(block: *mut c_void, count: size_t, size: size_t, alignment: size_t) -> *mut c_void;
    }
}



#[test] fn fat_alignment()          { fat::test::alignment(AlignedMalloc) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(AlignedMalloc) }
#[test] fn fat_thin_free()          { fat::test::thin_free_compatible(AlignedMalloc) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(AlignedMalloc) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_conservative(AlignedMalloc) }
