use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::mem::{MaybeUninit, size_of};
use core::ptr::NonNull;



/// Bookkeeping stored immediately before every address [`Manual`] hands out.
#[derive(Clone, Copy)] #[repr(C)] struct Header {
    base:   *mut MaybeUninit<u8>,
    size:   usize,
}

const HEADER        : usize     = size_of::<Header>();
const HEADER_ALIGN  : Alignment = Alignment::of::<Header>();
const _ : () = assert!(HEADER % HEADER_ALIGN.as_usize() == 0);



/// Aligned allocations carved out of an unaligned base allocator `A`.
///
/// | Rust                              | Base allocator `A`                                        |
/// | ----------------------------------| ----------------------------------------------------------|
/// | [`fat::Alloc::alloc_uninit`]      | [`fat::Alloc::alloc_uninit`] of `size + align + header - align_of::<header>()` bytes
/// | [`fat::Alloc::alloc_zeroed`]      | [`fat::Alloc::alloc_zeroed`] of the same
/// | [`fat::Free::free`]               | [`fat::Free::free`] of the block recorded in the header
/// | [`thin::Free::free`]              | [`fat::Free::free`] of the block recorded in the header
///
/// The header (the base pointer and base allocation size) sits immediately before the returned address.
/// That's enough to free by address alone, which is what <code>[free_aligned](crate::free_aligned)</code> needs.
///
/// Zero sized allocations are supported: they still reserve a header, and thus return unique addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Manual<A>(pub A);

impl<A> Manual<A> {
    /// Align allocations from `base`.
    pub const fn new(base: A) -> Self { Self(base) }

    /// The base allocation needed to satisfy `layout`, and the alignment to place the result at.
    fn base_layout(layout: Layout) -> Option<(Layout, Alignment)> {
        let align = Alignment::from(layout).max(HEADER_ALIGN);
        let size  = layout.size().checked_add(align.as_usize() - HEADER_ALIGN.as_usize())?.checked_add(HEADER)?;
        let base  = Layout::from_size_align(size, HEADER_ALIGN.as_usize()).ok()?;
        Some((base, align))
    }

    /// Write a [`Header`] into `base`, returning the first `align`ed address with room for it.
    ///
    /// ### Safety
    /// *   `base` must be a fresh, [`HEADER_ALIGN`]ed allocation of `base_size` bytes, as sized by [`Self::base_layout`] for `align`.
    unsafe fn place(base: AllocNN, base_size: usize, align: Alignment) -> AllocNN {
        let misalign    = (base.as_ptr() as usize).wrapping_add(HEADER) & (align.as_usize() - 1);
        let offset      = HEADER + if misalign == 0 { 0 } else { align.as_usize() - misalign };
        debug_assert!(offset <= base_size);

        // SAFETY: ✔️ `offset <= HEADER + align - HEADER_ALIGN`, all of which `base_layout` reserved
        let aligned = unsafe { base.as_ptr().add(offset) };
        // SAFETY: ✔️ `aligned - HEADER .. aligned` lies within `base`, and is `HEADER_ALIGN`ed as `aligned` and `HEADER` both are
        unsafe { aligned.sub(HEADER).cast::<Header>().write(Header { base: base.as_ptr(), size: base_size }) };
        // SAFETY: ✔️ offset from non-null `base` without leaving the allocation
        unsafe { NonNull::new_unchecked(aligned) }
    }

    /// Read back the base allocation behind `ptr`.
    ///
    /// ### Safety
    /// *   `ptr` must have been returned by [`Self::place`], and not yet freed.
    #[track_caller] unsafe fn base(ptr: AllocNN) -> (AllocNN, Layout) {
        let addr = ptr.as_ptr() as usize;
        if !HEADER_ALIGN.is_aligned(addr) || addr < HEADER { bug::ub::invalid_ptr_for_allocator(ptr) }

        // SAFETY: ✔️ `place` wrote a `Header` here per fn preconditions
        let header = unsafe { ptr.as_ptr().sub(HEADER).cast::<Header>().read() };
        let Some(base) = NonNull::new(header.base) else { bug::ub::corrupt_header(ptr) };

        if cfg!(debug_assertions) {
            let start = header.base as usize;
            let sane
                =   HEADER_ALIGN.is_aligned(start)
                &&  start <= addr - HEADER
                &&  addr - start <= header.size;
            if !sane { bug::ub::corrupt_header(ptr) }
        }

        let Ok(layout) = Layout::from_size_align(header.size, HEADER_ALIGN.as_usize()) else { bug::ub::corrupt_header(ptr) };
        (base, layout)
    }
}



// meta::*

impl<A: Meta> Meta for Manual<A> {
    type Error                      = ();
    const MIN_ALIGN     : Alignment = HEADER_ALIGN;
    const MAX_ALIGN     : Alignment = Alignment::MAX;
    const MAX_SIZE      : usize     = A::MAX_SIZE.saturating_sub(HEADER);
    const ZST_SUPPORTED : bool      = true;
}



// fat::*

// SAFETY: ✔️ `place` returns `align`ed addresses with at least `layout.size()` bytes remaining in the base block
unsafe impl<A: fat::Alloc + fat::Free> fat::Alloc for Manual<A> {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        let (base_layout, align) = Self::base_layout(layout).ok_or(())?;
        let base = fat::Alloc::alloc_uninit(&self.0, base_layout).map_err(|_| ())?;
        // SAFETY: ✔️ `base` was just allocated with `base_layout`
        Ok(unsafe { Self::place(base, base_layout.size(), align) })
    }

    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        let (base_layout, align) = Self::base_layout(layout).ok_or(())?;
        let base = fat::Alloc::alloc_zeroed(&self.0, base_layout).map_err(|_| ())?;
        // SAFETY: ✔️ `base` was just allocated with `base_layout`.  The header only overwrites zeroes *before* the returned address.
        Ok(unsafe { Self::place(base.cast(), base_layout.size(), align) }.cast())
    }
}

// SAFETY: ✔️ frees exactly the base block `alloc_*` allocated
unsafe impl<A: fat::Free> fat::Free for Manual<A> {
    #[track_caller] unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        if cfg!(debug_assertions) && !Alignment::from(layout).is_aligned(ptr.as_ptr() as usize) { bug::ub::misaligned_free(ptr, Alignment::from(layout)) }
        // SAFETY: ✔️ `ptr` belongs to `self` per fn preconditions
        unsafe { thin::Free::free(self, ptr) }
    }
}

// SAFETY: ✔️ frees exactly the base block `alloc_*` allocated
unsafe impl<A: fat::Free> thin::Free for Manual<A> {
    #[track_caller] unsafe fn free(&self, ptr: AllocNN) {
        // SAFETY: ✔️ `ptr` belongs to `self`, and was thus returned by `place`, per fn preconditions
        let (base, layout) = unsafe { Self::base(ptr) };
        // SAFETY: ✔️ `base` was allocated by `self.0` with `layout`
        unsafe { fat::Free::free(&self.0, base, layout) }
    }
}



#[cfg(test)] mod tests {
    use super::*;
    #[cfg(feature = "alloc")] use crate::allocator::alloc::Global;
    use crate::allocator::debug::Counting;

    #[cfg(feature = "alloc")] #[test] fn fat_alignment_global()         { fat::test::alignment(Manual(Global)) }
    #[cfg(feature = "alloc")] #[test] fn fat_edge_case_sizes_global()   { fat::test::edge_case_sizes(Manual(Global)) }
    #[cfg(feature = "alloc")] #[test] fn fat_thin_free_global()         { fat::test::thin_free_compatible(Manual(Global)) }
    #[cfg(feature = "alloc")] #[test] fn fat_zeroed_global()            { fat::test::zeroed_alloc(Manual(Global)) }
    #[cfg(feature = "alloc")] #[test] fn fat_zst_support_global()       { fat::test::zst_supported_conservative(Manual(Global)) }

    #[cfg(all(feature = "c", any(unix, windows)))] mod malloc {
        use super::*;
        use crate::allocator::c::Malloc;

        #[test] fn fat_alignment()          { fat::test::alignment(Manual(Malloc)) }
        #[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(Manual(Malloc)) }
        #[test] fn fat_thin_free()          { fat::test::thin_free_compatible(Manual(Malloc)) }
        #[test] fn fat_zeroed()             { fat::test::zeroed_alloc(Manual(Malloc)) }
        #[test] fn fat_zst_support()        { fat::test::zst_supported_conservative(Manual(Malloc)) }
    }

    #[cfg(all(windows, feature = "win32"))] mod process_heap {
        use super::*;
        use crate::allocator::win32::ProcessHeap;

        #[test] fn fat_alignment()          { fat::test::alignment(Manual(ProcessHeap)) }
        #[test] fn fat_thin_free()          { fat::test::thin_free_compatible(Manual(ProcessHeap)) }
        #[test] fn fat_zeroed()             { fat::test::zeroed_alloc(Manual(ProcessHeap)) }
    }

    #[cfg(feature = "alloc")] #[test] fn no_base_leaks() {
        let manual = Manual(Counting::new(Global));
        fat::test::alignment(&manual);
        fat::test::zeroed_alloc(&manual);
        fat::test::zst_supported_conservative(&manual);
        fat::test::thin_free_compatible(&manual);
        assert_eq!(manual.0.live(), 0);
        assert!(manual.0.total() > 0);
    }

    #[cfg(feature = "alloc")] #[test] fn large_alignments() {
        for align in [ALIGN_64_KiB, ALIGN_1_MiB, ALIGN_4_MiB] {
            let layout = Layout::from_size_align(100, align.as_usize()).unwrap();
            let alloc = fat::Alloc::alloc_uninit(&Manual(Global), layout).unwrap();
            assert!(align.is_aligned(alloc.as_ptr() as usize));
            // SAFETY: ✔️ `alloc` was allocated by `Manual(Global)` with `layout`
            unsafe { thin::Free::free(&Manual(Global), alloc) };
        }
    }

    #[test] fn base_failure_propagates() {
        let layout = Layout::from_size_align(64, 64).unwrap();
        assert!(fat::Alloc::alloc_uninit(&Manual(crate::allocator::debug::Null), layout).is_err());
        assert!(fat::Alloc::alloc_zeroed(&Manual(crate::allocator::debug::Null), layout).is_err());
    }

    #[test] fn base_layout_overflow() {
        assert!(Manual::<()>::base_layout(Layout::from_size_align(isize::MAX as usize - 63, 64).unwrap()).is_none());
        let (base, align) = Manual::<()>::base_layout(Layout::from_size_align(100, 64).unwrap()).unwrap();
        assert_eq!(align, ALIGN_64);
        assert_eq!(base.size(), 100 + 64 - HEADER_ALIGN.as_usize() + HEADER);
        assert_eq!(base.align(), HEADER_ALIGN.as_usize());
    }

    #[cfg(feature = "alloc")] #[test] #[should_panic = "bookkeeping header"] fn corrupt_header_detected() {
        let layout = Layout::from_size_align(16, 16).unwrap();
        let alloc = fat::Alloc::alloc_uninit(&Manual(Global), layout).unwrap();
        // SAFETY: ✔️ the header lies within the base allocation, immediately before `alloc`
        unsafe { alloc.as_ptr().sub(HEADER).cast::<Header>().write(Header { base: core::ptr::null_mut(), size: 0 }) };
        // SAFETY: ❌ intentionally corrupted to verify the panic (leaking the base allocation)
        unsafe { thin::Free::free(&Manual(Global), alloc) };
    }
}
