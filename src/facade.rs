//! [`Facade`], [`allocate_aligned`], [`try_allocate_aligned`], [`free_aligned`]

use crate::*;
use crate::allocator::Selected;
use crate::error::*;
use crate::meta::Meta;

use core::alloc::{GlobalAlloc, Layout};
use core::ffi::c_void;
use core::ptr::{NonNull, null_mut};



/// Allocate `size` bytes aligned to `alignment` using the [`Selected`] back-end.
///
/// | Input                                     | Result    |
/// | ------------------------------------------| ----------|
/// | `alignment` isn't a power of two          | null
/// | `alignment` exceeds the back-end maximum  | null
/// | `size` (rounded up) exceeds `isize::MAX`  | null
/// | out of memory                             | null
/// | `size == 0`                               | a unique, non-null address to pass to [`free_aligned`]
/// | otherwise                                 | an address divisible by `alignment`, with `size` usable bytes
///
/// Never panics, never aborts.  Use [`try_allocate_aligned`] to learn why an allocation failed.
///
/// ```
/// let ptr = ialign::allocate_aligned(1024, 64);
/// assert!(!ptr.is_null());
/// assert_eq!(ptr as usize % 64, 0);
/// unsafe { ialign::free_aligned(ptr) };
///
/// assert!(ialign::allocate_aligned(16, 3).is_null());
/// assert!(ialign::allocate_aligned(usize::MAX, 16).is_null());
/// ```
pub fn allocate_aligned(size: usize, alignment: usize) -> *mut c_void {
    Facade::<Selected>::default().allocate(size, alignment)
}

/// Allocate `size` bytes aligned to `alignment` using the [`Selected`] back-end, reporting why on failure.
///
/// ```
/// use ialign::error::AllocError;
///
/// assert_eq!(ialign::try_allocate_aligned(16, 24), Err(AllocError::InvalidAlignment { requested: 24 }));
///
/// let ptr = ialign::try_allocate_aligned(100, 4096).unwrap();
/// unsafe { ialign::free_aligned(ptr.as_ptr().cast()) };
/// ```
pub fn try_allocate_aligned(size: usize, alignment: usize) -> Result<AllocNN, AllocError> {
    Facade::<Selected>::default().try_allocate(size, alignment)
}

/// Release memory from [`allocate_aligned`] or [`try_allocate_aligned`].
///
/// ### Safety
/// *   `ptr` must be null (a no-op), or an address returned by [`allocate_aligned`] / [`try_allocate_aligned`] that hasn't been freed yet.
/// *   `ptr` will no longer be accessible after free.
pub unsafe fn free_aligned(ptr: *mut c_void) {
    // SAFETY: ✔️ same preconditions, same back-end
    unsafe { Facade::<Selected>::default().free(ptr) }
}



/// Uniform aligned allocation semantics on top of any back-end `A`.
///
/// Whatever `A` does natively, the facade:
/// *   Rejects alignments that aren't powers of two, or that exceed <code>A::[MAX_ALIGN](Meta::MAX_ALIGN)</code>.
/// *   Never asks `A` for zero bytes: zero sized requests allocate one byte, yielding a unique freeable address.
/// *   Accepts alignments below <code>A::[MIN_ALIGN](Meta::MIN_ALIGN)</code> (every back-end raises those internally.)
/// *   Verifies the address `A` returns really is aligned, releasing it and failing with [`AllocError::Misaligned`] otherwise.
///
/// `Facade<A>` also implements [`GlobalAlloc`], so e.g. <code>Facade&lt;[PosixMemalign](crate::allocator::posix::PosixMemalign)&gt;</code> can be a `#[global_allocator]`.
/// <code>Facade&lt;[Manual](crate::allocator::manual::Manual)&lt;[Global](crate::allocator::alloc::Global)&gt;&gt;</code> can't: it would recurse into itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Facade<A = Selected>(pub A);

impl<A> Facade<A> {
    /// Wrap `backend`.
    pub const fn new(backend: A) -> Self { Self(backend) }

    /// The wrapped back-end.
    pub fn backend(&self) -> &A { &self.0 }
}

impl<A: fat::Alloc + thin::Free> Facade<A> {
    /// Validate `size` and `alignment`, returning the [`Layout`] actually requested from the back-end.
    pub fn layout(size: usize, alignment: usize) -> Result<Layout, AllocError> {
        let align = Alignment::new(alignment).ok_or(AllocError::InvalidAlignment { requested: alignment })?;
        if align > A::MAX_ALIGN { return Err(ExcessiveAlignmentRequestedError { requested: align, supported: A::MAX_ALIGN }.into()) }
        let request = size.max(1);
        if request > A::MAX_SIZE { return Err(AllocError::SizeOverflow { size, align }) }
        Layout::from_size_align(request, align.as_usize()).map_err(|_| AllocError::SizeOverflow { size, align })
    }

    /// Allocate `size` uninitialized bytes aligned to `alignment`.
    pub fn try_allocate(&self, size: usize, alignment: usize) -> Result<AllocNN, AllocError> {
        let result = self.alloc_impl(size, alignment, false);
        Self::log("allocate", size, alignment, &result);
        result
    }

    /// Allocate `size` zeroed bytes aligned to `alignment`.
    pub fn try_allocate_zeroed(&self, size: usize, alignment: usize) -> Result<AllocNN0, AllocError> {
        let result = self.alloc_impl(size, alignment, true);
        Self::log("allocate_zeroed", size, alignment, &result);
        result.map(NonNull::cast)
    }

    /// Allocate `size` uninitialized bytes aligned to `alignment`, or return null.
    pub fn allocate(&self, size: usize, alignment: usize) -> *mut c_void {
        self.try_allocate(size, alignment).map_or(null_mut(), |ptr| ptr.as_ptr().cast())
    }

    /// Allocate `size` zeroed bytes aligned to `alignment`, or return null.
    pub fn allocate_zeroed(&self, size: usize, alignment: usize) -> *mut c_void {
        self.try_allocate_zeroed(size, alignment).map_or(null_mut(), |ptr| ptr.as_ptr().cast())
    }

    /// Release an allocation.
    ///
    /// ### Safety
    /// *   `ptr` must be null (a no-op), or an address allocated by this facade's back-end that hasn't been freed yet.
    /// *   `ptr` will no longer be accessible after free.
    #[track_caller] pub unsafe fn free(&self, ptr: *mut c_void) {
        if ptr.is_null() { return }
        trace!("free({ptr:p})");
        // SAFETY: ✔️ `ptr` belongs to `self.0` per fn preconditions
        unsafe { thin::Free::free_nullable(&self.0, ptr.cast()) }
    }

    fn alloc_impl(&self, size: usize, alignment: usize, zeroed: bool) -> Result<AllocNN, AllocError> {
        let layout  = Self::layout(size, alignment)?;
        let align   = Alignment::from(layout);
        let alloc   = if zeroed { fat::Alloc::alloc_zeroed(&self.0, layout).map(NonNull::cast) } else { fat::Alloc::alloc_uninit(&self.0, layout) };
        let alloc   = alloc.map_err(|_| AllocError::OutOfMemory { size, align })?;

        let address = alloc.as_ptr() as usize;
        if !align.is_aligned(address) {
            // SAFETY: ✔️ `alloc` was just allocated by `self.0`
            unsafe { thin::Free::free(&self.0, alloc) };
            return Err(AllocError::Misaligned { align, address });
        }
        Ok(alloc)
    }

    fn log(op: &str, size: usize, alignment: usize, result: &Result<AllocNN, AllocError>) {
        match result {
            Ok(ptr)     => trace!("{op}({size}, {alignment}) = {ptr:p} via {}", core::any::type_name::<A>()),
            Err(err)    => debug!("{op}({size}, {alignment}) failed via {}: {err}", core::any::type_name::<A>()),
        }
    }
}

/// Don't enable the `log` feature for a `#[global_allocator]` facade if your logger allocates.
// SAFETY: ✔️ `try_allocate*` honor `layout` (or fail), and `free` releases exactly what they allocated
unsafe impl<A: fat::Alloc + thin::Free> GlobalAlloc for Facade<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        self.try_allocate(layout.size(), layout.align()).map_or(null_mut(), |ptr| ptr.as_ptr().cast())
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        self.try_allocate_zeroed(layout.size(), layout.align()).map_or(null_mut(), |ptr| ptr.as_ptr())
    }

    unsafe fn dealloc(&self, ptr: *mut u8, _layout: Layout) {
        // SAFETY: ✔️ `ptr` was allocated by `alloc` or `alloc_zeroed` per `GlobalAlloc::dealloc`'s preconditions
        unsafe { self.free(ptr.cast()) }
    }
}



/// Testing functions to verify a [`Facade`] (and thus its back-end) honors the uniform contract.
pub mod test {
    use super::*;

    const SIZES : [usize; 9] = [0, 1, 3, 16, 63, 64, 100, 1024, 5000];

    fn alignments<A: Meta>() -> impl Iterator<Item = Alignment> {
        (0 .. 17).filter_map(|shift| Alignment::new(1 << shift)).filter(|align| *align <= A::MAX_ALIGN)
    }

    /// Assert every power of two alignment up to 64 KiB (and `A::MAX_ALIGN`) yields aligned, usable memory for a spread of sizes, zero included.
    #[track_caller] pub fn alignment<A: fat::Alloc + thin::Free>(facade: &Facade<A>) {
        for align in alignments::<A>() {
            for size in SIZES {
                let alloc = facade.try_allocate(size, align.as_usize()).unwrap_or_else(|err| panic!("try_allocate({size}, {align:?}) failed: {err}"));
                let addr = alloc.as_ptr() as usize;
                assert!(align.is_aligned(addr), "try_allocate({size}, {align:?}) = {addr:#x}, which isn't aligned");
                // SAFETY: ✔️ `alloc` was just allocated with (at least) `size` bytes
                unsafe { thin::test::fill_and_verify(alloc, size) };
                // SAFETY: ✔️ `alloc` was allocated by `facade`
                unsafe { facade.free(alloc.as_ptr().cast()) };
            }
        }
    }

    /// Assert zeroed allocations read back as zero.
    #[track_caller] pub fn zeroed<A: fat::Alloc + thin::Free>(facade: &Facade<A>) {
        for align in alignments::<A>() {
            for size in SIZES {
                let alloc = facade.try_allocate_zeroed(size, align.as_usize()).unwrap_or_else(|err| panic!("try_allocate_zeroed({size}, {align:?}) failed: {err}"));
                assert!(align.is_aligned(alloc.as_ptr() as usize));
                // SAFETY: ✔️ `alloc` was just allocated and initialized with `size` bytes
                let bytes = unsafe { core::slice::from_raw_parts(alloc.as_ptr(), size) };
                assert!(bytes.iter().all(|b| *b == 0), "try_allocate_zeroed({size}, {align:?}) returned nonzero memory");
                // SAFETY: ✔️ `alloc` was allocated by `facade`
                unsafe { facade.free(alloc.as_ptr().cast()) };
            }
        }
    }

    /// Assert zero sized allocations succeed with unique, non-null, freeable addresses.
    #[track_caller] pub fn zero_size<A: fat::Alloc + thin::Free>(facade: &Facade<A>) {
        for align in alignments::<A>() {
            let a = facade.allocate(0, align.as_usize());
            let b = facade.allocate(0, align.as_usize());
            assert!(!a.is_null() && !b.is_null(), "allocate(0, {align:?}) returned null");
            assert_ne!(a, b, "allocate(0, {align:?}) returned the same address twice");
            assert!(align.is_aligned(a as usize) && align.is_aligned(b as usize));
            // SAFETY: ✔️ `a` and `b` were allocated by `facade`
            unsafe { facade.free(a) };
            // SAFETY: ✔️ `a` and `b` were allocated by `facade`
            unsafe { facade.free(b) };
        }
    }

    /// Assert invalid requests fail with null / the appropriate [`AllocError`], without touching the back-end.
    #[track_caller] pub fn invalid<A: fat::Alloc + thin::Free>(facade: &Facade<A>) {
        for alignment in [0, 3, 24, 48, 100, usize::MAX] {
            assert!(facade.allocate(16, alignment).is_null(), "allocate(16, {alignment}) should've failed");
            assert_eq!(facade.try_allocate(16, alignment), Err(AllocError::InvalidAlignment { requested: alignment }));
        }

        for size in [usize::MAX, usize::MAX - 1, isize::MAX as usize] {
            assert!(facade.allocate(size, 16).is_null(), "allocate({size}, 16) should've failed");
            assert!(matches!(facade.try_allocate(size, 16), Err(AllocError::SizeOverflow { .. })), "allocate({size}, 16) should've overflowed");
        }

        for size in [usize::MAX / 2, usize::MAX / 16] {
            assert!(facade.allocate(size, 16).is_null(), "allocate({size}, 16) should've failed");
        }

        if let Some(excessive) = A::MAX_ALIGN.as_usize().checked_mul(2) {
            assert!(matches!(facade.try_allocate(16, excessive), Err(AllocError::ExcessiveAlignment(_))));
        }

        // SAFETY: ✔️ null is explicitly allowed
        unsafe { facade.free(null_mut()) };
    }

    /// Every test in this module.
    #[track_caller] pub fn contract<A: fat::Alloc + thin::Free>(facade: &Facade<A>) {
        alignment(facade);
        zeroed(facade);
        zero_size(facade);
        invalid(facade);
    }
}



#[cfg(test)] mod tests {
    use super::*;
    use crate::allocator::debug::{Counting, Null};

    #[test] fn contract_selected() { test::contract(&Facade::<Selected>::default()) }
    #[cfg(feature = "alloc")] #[test] fn contract_manual_global() { test::contract(&Facade(crate::allocator::manual::Manual(crate::allocator::alloc::Global))) }
    #[cfg(all(feature = "c", any(unix, windows)))] #[test] fn contract_manual_malloc() { test::contract(&Facade(crate::allocator::manual::Manual(crate::allocator::c::Malloc))) }
    #[cfg(all(feature = "c", unix))] #[test] fn contract_posix_memalign() { test::contract(&Facade(crate::allocator::posix::PosixMemalign)) }
    #[cfg(all(feature = "c", any(target_os = "linux", target_os = "android")))] #[test] fn contract_memalign() { test::contract(&Facade(crate::allocator::memalign::Memalign)) }
    #[cfg(all(windows, any(target_env = "msvc", target_env = "gnu"), feature = "msvc"))] #[test] fn contract_aligned_malloc() { test::contract(&Facade(crate::allocator::msvc::AlignedMalloc)) }

    #[test] fn allocate_1024_64() {
        let counting = Counting::new(Selected::default());
        let facade = Facade(&counting);
        let baseline = counting.live();

        let ptr = facade.allocate(1024, 64);
        assert!(!ptr.is_null());
        assert_eq!(ptr as usize % 64, 0);
        assert_eq!(counting.live(), baseline + 1);
        // SAFETY: ✔️ `ptr` was just allocated with 1024 bytes
        unsafe { thin::test::fill_and_verify(NonNull::new(ptr.cast()).unwrap(), 1024) };

        // SAFETY: ✔️ `ptr` was allocated by `facade`
        unsafe { facade.free(ptr) };
        assert_eq!(counting.live(), baseline);
    }

    #[test] fn free_functions() {
        let ptr = allocate_aligned(1024, 64);
        assert!(!ptr.is_null());
        assert_eq!(ptr as usize % 64, 0);
        // SAFETY: ✔️ `ptr` was allocated by `allocate_aligned`
        unsafe { free_aligned(ptr) };

        assert!(allocate_aligned(usize::MAX, 16).is_null());
        assert!(allocate_aligned(16, 0).is_null());
        assert_eq!(try_allocate_aligned(16, 3), Err(AllocError::InvalidAlignment { requested: 3 }));

        // SAFETY: ✔️ null is explicitly allowed
        unsafe { free_aligned(null_mut()) };
    }

    #[test] fn failing_backend() {
        let facade = Facade(Null);
        assert!(facade.allocate(1024, 64).is_null());
        assert!(facade.allocate_zeroed(1024, 64).is_null());
        assert!(facade.allocate(0, 1).is_null());
        assert_eq!(facade.try_allocate(1024, 64), Err(AllocError::OutOfMemory { size: 1024, align: ALIGN_64 }));
        test::invalid(&facade);
    }

    #[cfg(feature = "alloc")] #[test] fn misaligned_backend() {
        use crate::allocator::{alloc::Global, manual::Manual};
        use crate::meta::Meta;

        /// Returns addresses one byte past where they should be.
        struct OffByOne(Counting<Manual<Global>>);
        impl Meta for OffByOne {
            type Error = ();
            const MAX_ALIGN : Alignment = ALIGN_4096;
            const MAX_SIZE  : usize     = usize::MAX / 4;
            const ZST_SUPPORTED : bool  = false;
        }
        // SAFETY: ❌ deliberately violates the alignment requirement
        unsafe impl fat::Alloc for OffByOne {
            fn alloc_uninit(&self, layout: Layout) -> Result<AllocNN, ()> {
                let layout = Layout::from_size_align(layout.size() + 1, layout.align()).map_err(|_| ())?;
                let alloc = fat::Alloc::alloc_uninit(&self.0, layout)?;
                // SAFETY: ✔️ one byte was reserved for the offset
                Ok(unsafe { NonNull::new_unchecked(alloc.as_ptr().add(1)) })
            }
        }
        // SAFETY: ✔️ undoes the offset
        unsafe impl thin::Free for OffByOne {
            unsafe fn free(&self, ptr: AllocNN) {
                // SAFETY: ✔️ `ptr` was offset by one byte from a `self.0` allocation
                unsafe { thin::Free::free(&self.0, NonNull::new_unchecked(ptr.as_ptr().sub(1))) }
            }
        }

        let facade = Facade(OffByOne(Counting::new(Manual(Global))));
        assert!(matches!(facade.try_allocate(64, 64), Err(AllocError::Misaligned { align, .. }) if align == ALIGN_64));
        assert!(facade.allocate_zeroed(64, 64).is_null());
        assert_eq!(facade.0.0.live(), 0);
        assert_eq!(facade.0.0.total(), 2);
    }

    #[test] fn global_alloc() {
        let facade = Facade::<Selected>::default();
        for (size, align) in [(1, 1), (100, 256), (4096, 4096), (0, 8)] {
            let layout = Layout::from_size_align(size, align).unwrap();
            // SAFETY: ✔️ `GlobalAlloc` forbids zero sized layouts, but the facade accepts them anyway
            let ptr = unsafe { GlobalAlloc::alloc_zeroed(&facade, layout) };
            assert!(!ptr.is_null());
            assert_eq!(ptr as usize % align, 0);
            // SAFETY: ✔️ `ptr` was allocated with `layout` and `size` bytes were zeroed
            assert!(unsafe { core::slice::from_raw_parts(ptr, size) }.iter().all(|b| *b == 0));
            // SAFETY: ✔️ `ptr` was allocated with `layout`
            unsafe { GlobalAlloc::dealloc(&facade, ptr, layout) };
        }
    }

    #[cfg(feature = "log")] #[test] fn logs_to_ialign_target() {
        use alloc::{format, string::String, vec::Vec};
        use std::sync::Mutex;

        struct Capture(Mutex<Vec<(log::Level, String, String)>>);
        impl log::Log for Capture {
            fn enabled(&self, _: &log::Metadata) -> bool { true }
            fn log(&self, record: &log::Record) {
                let entry = (record.level(), String::from(record.target()), format!("{}", record.args()));
                self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).push(entry);
            }
            fn flush(&self) {}
        }

        static CAPTURE : Capture = Capture(Mutex::new(Vec::new()));
        log::set_logger(&CAPTURE).expect("no other test installs a logger");
        log::set_max_level(log::LevelFilter::Trace);

        let facade = Facade::<Selected>::default();
        let ptr = facade.allocate(12345, 64);
        assert!(!ptr.is_null());
        // SAFETY: ✔️ `ptr` was allocated by `facade`
        unsafe { facade.free(ptr) };
        assert!(facade.allocate(12345, 48).is_null());

        let captured = CAPTURE.0.lock().unwrap();
        let find = |level: log::Level, prefix: &str| captured.iter().any(|(l, target, msg)| *l == level && target == "ialign" && msg.starts_with(prefix));
        assert!(find(log::Level::Trace, "allocate(12345, 64) = "),          "missing success trace in {captured:?}");
        assert!(find(log::Level::Trace, &format!("free({ptr:p})")),         "missing free trace in {captured:?}");
        assert!(find(log::Level::Debug, "allocate(12345, 48) failed via "), "missing failure debug in {captured:?}");
    }

    #[test] fn threaded() {
        const THREADS : usize = 8;
        const ITERATIONS : usize = 500;

        let counting = Counting::new(Selected::default());
        let facade = Facade(&counting);
        std::thread::scope(|scope| {
            for t in 0 .. THREADS {
                let facade = &facade;
                scope.spawn(move || {
                    for i in 0 .. ITERATIONS {
                        let align = 1 << ((t + i) % 13);
                        let size = (i * 37) % 2000;
                        let ptr = facade.allocate(size, align);
                        assert!(!ptr.is_null());
                        assert_eq!(ptr as usize % align, 0);
                        // SAFETY: ✔️ `ptr` was just allocated with (at least) `size` bytes
                        unsafe { thin::test::fill_and_verify(NonNull::new(ptr.cast()).unwrap(), size) };
                        // SAFETY: ✔️ `ptr` was allocated by `facade`
                        unsafe { facade.free(ptr) };
                    }
                });
            }
        });
        assert_eq!(counting.live(), 0);
        assert_eq!(counting.total(), THREADS * ITERATIONS);
    }
}
