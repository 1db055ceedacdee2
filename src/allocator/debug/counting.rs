use crate::*;
use crate::meta::*;

use core::alloc::Layout;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicUsize, Ordering::Relaxed};



/// Wraps another allocator, counting live and total allocations.
///
/// Counts are statistics rather than synchronization, so they use [`Relaxed`] ordering.
///
/// ```
/// use ialign::{Facade, allocator::{debug::Counting, Selected}};
///
/// let counting = Counting::new(Selected::default());
/// let facade = Facade(&counting);
/// let ptr = facade.allocate(1024, 64);
/// assert!(!ptr.is_null());
/// assert_eq!(counting.live(), 1);
/// unsafe { facade.free(ptr) };
/// assert_eq!(counting.live(), 0);
/// assert_eq!(counting.total(), 1);
/// ```
#[derive(Debug, Default)] pub struct Counting<A> {
    inner:  A,
    live:   AtomicUsize,
    total:  AtomicUsize,
}

impl<A> Counting<A> {
    /// Wrap `inner` with zeroed counters.
    pub const fn new(inner: A) -> Self { Self { inner, live: AtomicUsize::new(0), total: AtomicUsize::new(0) } }

    /// The allocator being counted.
    pub fn inner(&self) -> &A { &self.inner }

    /// Allocations made but not yet freed.
    pub fn live(&self) -> usize { self.live.load(Relaxed) }

    /// Allocations ever made.
    pub fn total(&self) -> usize { self.total.load(Relaxed) }

    fn on_alloc(&self) {
        self.live.fetch_add(1, Relaxed);
        self.total.fetch_add(1, Relaxed);
    }

    fn on_free(&self) {
        let prev = self.live.fetch_sub(1, Relaxed);
        debug_assert!(prev > 0, "bug: undefined behavior: freed more allocations than were allocated");
    }
}

impl<A: Meta> Meta for Counting<A> {
    type Error                      = A::Error;
    const MIN_ALIGN     : Alignment = A::MIN_ALIGN;
    const MAX_ALIGN     : Alignment = A::MAX_ALIGN;
    const MAX_SIZE      : usize     = A::MAX_SIZE;
    const ZST_SUPPORTED : bool      = A::ZST_SUPPORTED;
}

// SAFETY: ✔️ forwards to `A` verbatim
unsafe impl<A: fat::Alloc> fat::Alloc for Counting<A> {
    fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, Self::Error> {
        let alloc = fat::Alloc::alloc_uninit(&self.inner, layout)?;
        self.on_alloc();
        Ok(alloc)
    }

    fn alloc_zeroed(&self, layout: Layout) -> Result<AllocNN0, Self::Error> {
        let alloc = fat::Alloc::alloc_zeroed(&self.inner, layout)?;
        self.on_alloc();
        Ok(alloc)
    }
}

// SAFETY: ✔️ forwards to `A` verbatim
unsafe impl<A: fat::Free> fat::Free for Counting<A> {
    unsafe fn free(&self, ptr: AllocNN, layout: Layout) {
        self.on_free();
        // SAFETY: ✔️ `ptr` belongs to `self`, and thus `self.inner`, per fn preconditions
        unsafe { fat::Free::free(&self.inner, ptr, layout) }
    }
}

// SAFETY: ✔️ forwards to `A` verbatim
unsafe impl<A: thin::Free> thin::Free for Counting<A> {
    unsafe fn free(&self, ptr: AllocNN) {
        self.on_free();
        // SAFETY: ✔️ `ptr` belongs to `self`, and thus `self.inner`, per fn preconditions
        unsafe { thin::Free::free(&self.inner, ptr) }
    }

    unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) {
        if ptr.is_null() { return }
        self.on_free();
        // SAFETY: ✔️ `ptr` belongs to `self`, and thus `self.inner`, per fn preconditions
        unsafe { thin::Free::free_nullable(&self.inner, ptr) }
    }
}



#[cfg(feature = "alloc")] #[test] fn fat_alignment() {
    let counting = Counting::new(crate::allocator::alloc::Global);
    fat::test::alignment(&counting);
    fat::test::zeroed_alloc(&counting);
    assert_eq!(counting.live(), 0);
    assert!(counting.total() > 0);
}

#[test] fn failures_uncounted() {
    let counting = Counting::new(crate::allocator::debug::Null);
    fat::test::edge_case_sizes(&counting);
    thin::test::nullable(&counting);
    assert_eq!(counting.live(), 0);
    assert_eq!(counting.total(), 0);
}
