use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::ptr::NonNull;



/// Use <code>[alloc::alloc]::{[alloc](alloc::alloc::alloc), [alloc_zeroed](alloc::alloc::alloc_zeroed), [dealloc](alloc::alloc::dealloc)}</code>
///
/// Base allocator for <code>[manual::Manual](crate::allocator::manual::Manual)&lt;[Global]&gt;</code> on targets without a C runtime.
/// Don't register a <code>[Facade](crate::Facade)&lt;[Manual](crate::allocator::manual::Manual)&lt;[Global]&gt;&gt;</code> as the `#[global_allocator]`: it would recurse into itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Global;



// meta::*

impl Meta for Global {
    type Error                  = ();
    const MAX_ALIGN : Alignment = Alignment::MAX;
    const MAX_SIZE  : usize     = usize::MAX/2;
    const ZST_SUPPORTED : bool  = true;
}



// fat::*

// SAFETY: ✔️ all `impl fat::* for Global` are compatible with each other and return allocations compatible with their alignments
unsafe impl fat::Alloc for Global {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        match layout.size() {
            0                       => Ok(util::nn::dangling(Alignment::from(layout))),
            n if n > Self::MAX_SIZE => Err(()),
            _ => {
                // SAFETY: ✔️ we just ensured `layout` has a valid (nonzero, <= isize::MAX) size
                let alloc = unsafe { alloc::alloc::alloc(layout) };
                NonNull::new(alloc.cast()).ok_or(())
            }
        }
    }

    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        match layout.size() {
            0                       => Ok(util::nn::dangling(Alignment::from(layout))),
            n if n > Self::MAX_SIZE => Err(()),
            _ => {
                // SAFETY: ✔️ we just ensured `layout` has a nonzero size
                let alloc = unsafe { alloc::alloc::alloc_zeroed(layout) };
                NonNull::new(alloc.cast()).ok_or(())
            }
        }
    }
}

// SAFETY: ✔️ all `impl fat::* for Global` are compatible with each other and return allocations compatible with their alignments
unsafe impl fat::Free for Global {
    unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        if layout.size() == 0 { return }
        // SAFETY: ✔️ `ptr` belongs to `self` and `layout` describes the allocation per [`fat::Free::free`]'s documented safety preconditions
        unsafe { alloc::alloc::dealloc(ptr.as_ptr().cast(), layout) }
    }
}



#[test] fn fat_alignment()          { fat::test::alignment(Global) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(Global) }
#[test] fn fat_zeroed()             { fat::test::zeroed_alloc(Global) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_conservative(Global) }

#[test] fn fat_zst_dangles() {
    let layout = Layout::from_size_align(0, 64).unwrap();
    let alloc = fat::Alloc::alloc_uninit(&Global, layout).unwrap();
    assert_eq!(alloc.as_ptr() as usize, 64);
    // SAFETY: ✔️ `alloc` was allocated by `Global` with `layout`
    unsafe { fat::Free::free(&Global, alloc, layout) };
}
