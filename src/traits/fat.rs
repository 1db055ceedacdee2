//! Rusty allocator traits operating on [`Layout`]s

use crate::*;

use core::alloc::Layout;
#[cfg(doc)] use core::ptr::NonNull;



/// Allocation functions:<br>
/// <code>[alloc_uninit](Self::alloc_uninit)(layout: [Layout]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;</code><br>
/// <code>[alloc_zeroed](Self::alloc_zeroed)(layout: [Layout]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;</code><br>
/// <br>
///
/// ## Safety
/// *   Allocations created by this trait must be compatible with any other [`fat`] traits implemented on this allocator type.
/// *   Returned allocations must obey `layout` alignment and size.
pub unsafe trait Alloc : meta::Meta {
    /// Allocate at least `layout.size()` bytes of uninitialized memory aligned to `layout.align()`.
    ///
    /// The resulting allocation can typically be freed with <code>[Free]::[free](Free::free)</code>
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error>;

    /// Allocate at least `layout.size()` bytes of zeroed memory aligned to `layout.align()`.
    ///
    /// The resulting allocation can typically be freed with <code>[Free]::[free](Free::free)</code>
    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        let alloc = self.alloc_uninit(layout)?;
        // SAFETY: ✔️ `alloc` was just allocated with `layout.size()` bytes, which `Layout` bounds to `isize::MAX`
        Ok(unsafe { util::slice::zero(alloc, layout.size()) })
    }
}

/// Deallocation function:<br>
/// <code>[free](Self::free)(ptr: [NonNull]&lt;\_&gt;, layout: [Layout])</code><br>
/// <br>
///
/// ## Safety
/// *   This trait must be able to free allocations made by any other [`fat`] traits implemented on this allocator type.
pub unsafe trait Free : meta::Meta {
    /// Deallocate an allocation, `ptr`, belonging to `self`.
    ///
    /// ### Safety
    /// *   `ptr` must belong to `self`
    /// *   `ptr` will no longer be accessible after free
    /// *   `layout` must exactly match the [`Layout`] last used to successfully allocate `ptr`
    unsafe fn free(&self, ptr: AllocNN, layout: Layout);
}



#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Alloc> Alloc for &'a A {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN,  Self::Error> { A::alloc_uninit(self, layout) }
    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> { A::alloc_zeroed(self, layout) }
}

#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Free> Free for &'a A {
    unsafe fn free(&self, ptr: AllocNN, layout: Layout) { unsafe { A::free(self, ptr, layout) } }
}



/// Testing functions to verify implementations of [`fat`] traits.
pub mod test {
    use super::*;
    use crate::meta::Meta;

    const SIZES : [usize; 10] = [1, 2, 3, 7, 16, 63, 64, 1000, 1024, 10_000];

    fn alignments<A: Meta>() -> impl Iterator<Item = Alignment> {
        (0 .. 16).filter_map(|shift| Alignment::new(1 << shift)).filter(|align| *align <= A::MAX_ALIGN)
    }

    /// Assert that every power of two alignment up to 32 KiB (and `A::MAX_ALIGN`) is honored for a spread of sizes, and that the memory is usable.
    #[track_caller] pub fn alignment<A: Alloc + Free>(allocator: A) {
        for align in alignments::<A>() {
            for size in SIZES {
                let layout = Layout::from_size_align(size, align.as_usize()).unwrap();
                let alloc = allocator.alloc_uninit(layout).unwrap_or_else(|err| panic!("alloc_uninit({layout:?}) failed: {err:?}"));
                let addr = alloc.as_ptr() as usize;
                assert!(align.is_aligned(addr), "alloc_uninit({layout:?}) = {addr:#x}, which isn't aligned to {align:?}");
                assert!(A::MIN_ALIGN.is_aligned(addr), "alloc_uninit({layout:?}) = {addr:#x}, which isn't aligned to MIN_ALIGN = {:?}", A::MIN_ALIGN);
                // SAFETY: ✔️ `alloc` was just allocated with `size` bytes
                unsafe { thin::test::fill_and_verify(alloc, size) };
                // SAFETY: ✔️ `alloc` belongs to `allocator` and was allocated with `layout`
                unsafe { allocator.free(alloc, layout) };
            }
        }
    }

    /// Assert that absurd (but `Layout`-valid) sizes fail gracefully (no crash, and anything that *does* succeed can be freed.)
    #[track_caller] pub fn edge_case_sizes<A: Alloc + Free>(allocator: A) {
        for align in alignments::<A>() {
            let max = isize::MAX as usize - (align.as_usize() - 1);
            for size in [max, max - 1, max / 2 + 1, max / 2] {
                let Ok(layout) = Layout::from_size_align(size, align.as_usize()) else { continue };
                if let Ok(alloc) = allocator.alloc_uninit(layout) {
                    // SAFETY: ✔️ `alloc` belongs to `allocator` and was allocated with `layout`
                    unsafe { allocator.free(alloc, layout) };
                }
            }
        }
    }

    /// Assert that [`Alloc::alloc_zeroed`] zeroes memory.
    #[track_caller] pub fn zeroed_alloc<A: Alloc + Free>(allocator: A) {
        for align in alignments::<A>() {
            for size in [1, 100, 4096, 100_000] {
                let layout = Layout::from_size_align(size, align.as_usize()).unwrap();
                let alloc = allocator.alloc_zeroed(layout).unwrap_or_else(|err| panic!("alloc_zeroed({layout:?}) failed: {err:?}"));
                assert!(align.is_aligned(alloc.as_ptr() as usize));
                // SAFETY: ✔️ `alloc` was just allocated and initialized with `size` bytes
                let bytes = unsafe { core::slice::from_raw_parts(alloc.as_ptr(), size) };
                assert!(bytes.iter().all(|b| *b == 0), "alloc_zeroed({layout:?}) returned nonzero memory");
                // SAFETY: ✔️ `alloc` belongs to `allocator` and was allocated with `layout`
                unsafe { allocator.free(alloc.cast(), layout) };
            }
        }
    }

    /// Assert that `A` supports zero sized allocations if [`Meta::ZST_SUPPORTED`] is set.
    #[track_caller] pub fn zst_supported_conservative<A: Alloc + Free>(allocator: A) {
        for align in alignments::<A>() {
            let layout = Layout::from_size_align(0, align.as_usize()).unwrap();
            let alloc = allocator.alloc_uninit(layout);
            if A::ZST_SUPPORTED { assert!(alloc.is_ok(), "alloc = {alloc:?}, ZST_SUPPORTED = {}", A::ZST_SUPPORTED) }
            // SAFETY: ✔️ `alloc` belongs to `allocator` and was allocated with `layout`
            if let Ok(alloc) = alloc { unsafe { allocator.free(alloc, layout) } }
        }
    }

    /// Assert that allocations made through [`fat::Alloc`](Alloc) can be released knowing nothing but their address, through [`thin::Free`].
    #[track_caller] pub fn thin_free_compatible<A: Alloc + thin::Free>(allocator: A) {
        for align in alignments::<A>() {
            for size in SIZES {
                let layout = Layout::from_size_align(size, align.as_usize()).unwrap();
                let alloc = allocator.alloc_uninit(layout).unwrap_or_else(|err| panic!("alloc_uninit({layout:?}) failed: {err:?}"));
                // SAFETY: ✔️ `alloc` belongs to `allocator`, and `thin::Free` must handle `fat::Alloc` allocations
                unsafe { thin::Free::free(&allocator, alloc) };
            }
        }
        thin::test::nullable(allocator);
    }
}
