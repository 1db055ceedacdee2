use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::mem::{MaybeUninit, size_of};
use core::ptr::NonNull;



/// [`memalign`] / [`free`]
///
/// The obsolete (but universally available on Android and SunOS) predecessor of `posix_memalign`.
/// Alignments smaller than `sizeof(void*)` are raised to that.
///
/// [`memalign`]:   https://man7.org/linux/man-pages/man3/memalign.3.html
/// [`free`]:       https://man7.org/linux/man-pages/man3/free.3.html
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Memalign;

impl Meta for Memalign {
    type Error                      = ();
    const MIN_ALIGN     : Alignment = Alignment::of::<*mut ()>();
    const MAX_ALIGN     : Alignment = Alignment::MAX;
    const MAX_SIZE      : usize     = usize::MAX;
    const ZST_SUPPORTED : bool      = false;
}

// SAFETY: ✔️ `memalign` honors any power of two alignment, validated via `fat::test::alignment`
unsafe impl fat::Alloc for Memalign {
    #[track_caller] fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        if layout.size() == 0 { return Err(()) }
        let align = layout.align().max(size_of::<*mut ()>());
        // SAFETY: ✔️ `align` is a power of two
        let alloc = unsafe { memalign(align, layout.size()) };
        NonNull::new(alloc.cast()).ok_or(())
    }
}

// SAFETY: ✔️ `free` releases `memalign` allocations and accepts null
unsafe impl thin::Free for Memalign {
    #[track_caller] unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) {
        // SAFETY: ✔️ `ptr` is null or belongs to `self` per fn preconditions
        unsafe { free(ptr.cast()) }
    }
}

#[no_implicit_prelude] mod cleanroom {
    use super::{impls, Memalign};

    impls! {
        unsafe impl ialign::fat::Free       for Memalign => ialign::thin::Free;
    }
}



use ffi::*;
mod ffi {
    use libc::*;

    extern "C" {
        // <malloc.h> on glibc / bionic, <stdlib.h> on SunOS
        pub fn memalign(alignment: size_t, size: size_t) -> *mut c_void;
        pub fn free(ptr: *mut c_void);
    }
}



#[test] fn fat_alignment()          { fat::test::alignment(Memalign) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(Memalign) }
#[test] fn fat_thin_free()          { fat::test::thin_free_compatible(Memalign) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(Memalign) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_conservative(Memalign) }
