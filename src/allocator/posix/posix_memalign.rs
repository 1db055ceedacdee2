use crate::*;
use crate::meta::*;
use crate::error::ExcessiveAlignmentRequestedError;

use libc::*;

use core::alloc::Layout;
use core::mem::{MaybeUninit, size_of};
use core::ptr::{NonNull, null_mut};



/// [`posix_memalign`] / [`free`]
///
/// POSIX requires `align` to be a multiple of `sizeof(void*)`: smaller alignments are raised to that.
///
/// [`posix_memalign`]: https://pubs.opengroup.org/onlinepubs/9699919799/functions/posix_memalign.html
/// [`free`]:           https://pubs.opengroup.org/onlinepubs/9699919799/functions/free.html
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct PosixMemalign;

impl Meta for PosixMemalign {
    type Error                      = ();
    const MIN_ALIGN     : Alignment = Alignment::of::<*mut c_void>();

    /// | Platform  | Value     |
    /// | ----------| ----------|
    /// | macOS     | 2 GiB (larger requests "succeed" with insufficiently aligned memory on some releases)
    /// | Elsewhere | [`Alignment::MAX`]
    const MAX_ALIGN     : Alignment = MAX_ALIGN;
    const MAX_SIZE      : usize     = usize::MAX;
    const ZST_SUPPORTED : bool      = false;
}

#[cfg(    target_vendor = "apple" )] const MAX_ALIGN : Alignment = ALIGN_2_GiB;
#[cfg(not(target_vendor = "apple"))] const MAX_ALIGN : Alignment = Alignment::MAX;

// SAFETY: ✔️ `posix_memalign` honors any power of two multiple of `sizeof(void*)`, validated via `fat::test::alignment`
unsafe impl fat::Alloc for PosixMemalign {
    #[track_caller] fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        if layout.size() == 0 { return Err(()) } // may be null, or may be a unique pointer, depending on the libc
        ExcessiveAlignmentRequestedError::check(layout, Self::MAX_ALIGN)?;
        let align = layout.align().max(size_of::<*mut c_void>());
        let mut alloc = null_mut();
        // SAFETY: ✔️ `align` is a power of two multiple of `sizeof(void*)`, and `alloc` is a valid out parameter
        let err = unsafe { posix_memalign(&mut alloc, align, layout.size()) };
        if err != 0 { return Err(()) }
        NonNull::new(alloc.cast()).ok_or(())
    }
}

// SAFETY: ✔️ `free` releases `posix_memalign` allocations and accepts null
unsafe impl thin::Free for PosixMemalign {
    #[track_caller] unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) {
        // SAFETY: ✔️ `ptr` is null or belongs to `self` per fn preconditions
        unsafe { free(ptr.cast()) }
    }
}

#[no_implicit_prelude] mod cleanroom {
    use super::{impls, PosixMemalign};

    impls! {
        unsafe impl ialign::fat::Free       for PosixMemalign => ialign::thin::Free;
    }
}



#[test] fn fat_alignment()          { fat::test::alignment(PosixMemalign) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(PosixMemalign) }
#[test] fn fat_thin_free()          { fat::test::thin_free_compatible(PosixMemalign) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(PosixMemalign) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_conservative(PosixMemalign) }

#[test] fn small_alignments_raised() {
    for align in [1, 2, 4] {
        let layout = Layout::from_size_align(3, align).unwrap();
        let alloc = fat::Alloc::alloc_uninit(&PosixMemalign, layout).unwrap();
        assert!(PosixMemalign::MIN_ALIGN.is_aligned(alloc.as_ptr() as usize));
        // SAFETY: ✔️ `alloc` was allocated by `PosixMemalign` with `layout`
        unsafe { fat::Free::free(&PosixMemalign, alloc, layout) };
    }
}
