#![allow(unused_variables)]

use crate::*;



/// Never allocates anything, not even ZSTs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Null;

impl meta::Meta for Null {
    type Error                  = ();
    const MAX_ALIGN : Alignment = Alignment::MAX;
    const MAX_SIZE  : usize     = usize::MAX;
    const ZST_SUPPORTED : bool  = false;
}



// thin::*

// SAFETY: ✔️ always failing to allocate is a trivally safe implementation of this trait
unsafe impl thin::Alloc for Null {
    fn alloc_uninit(&self, size: usize) -> Result<AllocNN, Self::Error> { Err(()) }
    fn alloc_zeroed(&self, size: usize) -> Result<AllocNN0, Self::Error> { Err(()) }
}

// SAFETY: ✔️ this trait cannot be safely called with non-null pointers, and simply panicing in response is a reasonable response to the caller's UB
unsafe impl thin::Free for Null {
    #[track_caller] #[inline(never)] unsafe fn free(&self, ptr: AllocNN) {
        bug::ub::invalid_ptr_for_allocator(ptr)
    }
}

#[no_implicit_prelude] mod cleanroom {
    use super::{impls, Null};

    impls! {
        unsafe impl ialign::fat::Alloc      for Null => ialign::thin::Alloc;
        unsafe impl ialign::fat::Free       for Null => ialign::thin::Free;
    }
}



#[test] fn thin_edge_case_sizes()   { thin::test::edge_case_sizes(Null) }
#[test] fn thin_nullable()          { thin::test::nullable(Null) }
#[test] fn thin_zst_support()       { thin::test::zst_supported_conservative(Null) }
#[test] fn fat_edge_case_sizes()    { fat::test::edge_case_sizes(Null) }
#[test] fn fat_zst_support()        { fat::test::zst_supported_conservative(Null) }

#[test] fn always_fails() {
    for size in [0, 1, 64, 4096] {
        assert!(thin::Alloc::alloc_uninit(&Null, size).is_err());
        assert!(thin::Alloc::alloc_zeroed(&Null, size).is_err());
        let layout = core::alloc::Layout::from_size_align(size, 64).unwrap();
        assert!(fat::Alloc::alloc_uninit(&Null, layout).is_err());
    }
}

#[test] #[should_panic = "doesn't belong to this allocator"] fn free_panics() {
    let ptr = util::nn::dangling(ALIGN_64);
    // SAFETY: ❌ intentionally violates `free`'s preconditions to verify the panic
    unsafe { thin::Free::free(&Null, ptr) }
}
