use crate::*;

use winapi::um::heapapi::{HeapAlloc, HeapFree, GetProcessHeap};
use winapi::um::winnt::HEAP_ZERO_MEMORY;

use core::mem::MaybeUninit;
use core::ptr::NonNull;



/// [`HeapAlloc`] / [`HeapFree`] on <code>[GetProcessHeap]\(\)</code>
///
/// | Rust                                      | C                     |
/// | ------------------------------------------| ----------------------|
/// | [`thin::Alloc::alloc_uninit`]             | <code>[HeapAlloc]\([GetProcessHeap]\(\), 0, size\)</code>
/// | [`thin::Alloc::alloc_zeroed`]             | <code>[HeapAlloc]\([GetProcessHeap]\(\), HEAP_ZERO_MEMORY, size\)</code>
/// | [`thin::Free::free`]                      | <code>[HeapFree]\([GetProcessHeap]\(\), 0, ptr\)</code>
///
/// [`GetProcessHeap`]: https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-getprocessheap
/// [`HeapAlloc`]:      https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapalloc
/// [`HeapFree`]:       https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapfree
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct ProcessHeap;

impl meta::Meta for ProcessHeap {
    type Error = ();

    /// The alignment of memory returned by `HeapAlloc` is `MEMORY_ALLOCATION_ALIGNMENT` in WinNT.h:
    /// ```cpp
    /// #if defined(_WIN64) || defined(_M_ALPHA)
    /// #define MEMORY_ALLOCATION_ALIGNMENT 16
    /// #else
    /// #define MEMORY_ALLOCATION_ALIGNMENT 8
    /// #endif
    /// ```
    ///
    /// <https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapalloc#remarks>
    const MAX_ALIGN : Alignment = super::MEMORY_ALLOCATION_ALIGNMENT;
    const MAX_SIZE  : usize     = usize::MAX/2;
    const ZST_SUPPORTED : bool  = true;
}

// SAFETY: ✔️ all thin::* impls intercompatible with each other
unsafe impl thin::Alloc for ProcessHeap {
    fn alloc_uninit(&self, size: usize) -> Result<AllocNN, Self::Error> {
        // SAFETY: ⚠️ `GetProcessHeap()` is valid for the lifetime of the process, as any code closing it presumably invokes undefined behavior by third party injected DLLs.
        // SAFETY: ✔️ thread safe - we don't use HEAP_NO_SERIALIZE.
        // SAFETY: ✔️ this "should" be safe for all `size`.  Unsoundness is #[test]ed for at the end of this file.
        let alloc = unsafe { HeapAlloc(GetProcessHeap(), 0, size) };
        NonNull::new(alloc.cast()).ok_or(())
    }

    fn alloc_zeroed(&self, size: usize) -> Result<AllocNN0, Self::Error> {
        // SAFETY: ⚠️ `GetProcessHeap()` is valid for the lifetime of the process
        // SAFETY: ✔️ thread safe - we don't use HEAP_NO_SERIALIZE.
        // SAFETY: ✔️ HeapAlloc zeros memory when we use HEAP_ZERO_MEMORY
        let alloc = unsafe { HeapAlloc(GetProcessHeap(), HEAP_ZERO_MEMORY, size) };
        NonNull::new(alloc.cast()).ok_or(())
    }
}

// SAFETY: ✔️ all thin::* impls intercompatible with each other
unsafe impl thin::Free for ProcessHeap {
    unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) {
        // "This pointer can be NULL."
        // https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapfree#parameters
        //
        // SAFETY: ✔️ thread safe - we don't use HEAP_NO_SERIALIZE.
        // SAFETY: ✔️ `ptr` is either `nullptr` (safe, tested), or belongs to `self` per thin::Free::free_nullable's documented safety preconditions - and thus was allocated with `HeapAlloc`
        if unsafe { HeapFree(GetProcessHeap(), 0, ptr.cast()) } == 0 && cfg!(debug_assertions) { bug::ub::invalid_ptr_for_allocator(ptr) }
    }
}



#[no_implicit_prelude] mod cleanroom {
    use super::{impls, ProcessHeap};

    impls! {
        unsafe impl ialign::fat::Alloc      for ProcessHeap => ialign::thin::Alloc;
        unsafe impl ialign::fat::Free       for ProcessHeap => ialign::thin::Free;
    }
}



#[test] fn thin_alignment()         { thin::test::alignment(ProcessHeap) }
#[test] fn thin_edge_case_sizes()   { thin::test::edge_case_sizes(ProcessHeap) }
#[test] fn thin_nullable()          { thin::test::nullable(ProcessHeap) }
#[test] fn thin_zeroed()            { thin::test::zeroed_alloc(ProcessHeap) }
#[test] fn thin_zst_support()       { thin::test::zst_supported_conservative(ProcessHeap) }

#[test] fn fat_alignment()          { fat::test::alignment(ProcessHeap) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(ProcessHeap) }
#[test] fn fat_thin_free()          { fat::test::thin_free_compatible(ProcessHeap) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(ProcessHeap) }
