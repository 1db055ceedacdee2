//! [`AlignedAllocator`]

use crate::*;
use crate::allocator::Selected;
use crate::error::AllocError;

use bytemuck::Zeroable;

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::mem::size_of;
use core::ptr::NonNull;



/// Allocates arrays of `T` aligned to <code>max(ALIGN, [align_of]::&lt;T&gt;())</code> through a [`Facade`].
///
/// `ALIGN` must be a power of two (checked at compile time.)
///
/// ```
/// use ialign::AlignedAllocator;
///
/// let simd = AlignedAllocator::<f32, 64>::new();
/// let data = simd.allocate_zeroed(1000).unwrap();
/// assert_eq!(data.as_ptr() as usize % 64, 0);
/// unsafe { simd.deallocate(data, 1000) };
/// ```
///
/// ```compile_fail,E0080
/// // won't compile - 48 isn't a power of two
/// let bad = ialign::AlignedAllocator::<u8, 48>::new();
/// let _ = bad.allocate(1);
/// ```
///
/// [align_of]: core::mem::align_of
pub struct AlignedAllocator<T, const ALIGN: usize = 1, A = Selected> {
    facade:     Facade<A>,
    _phantom:   PhantomData<fn() -> T>,
}

impl<T, const ALIGN: usize, A> AlignedAllocator<T, ALIGN, A> {
    /// The alignment of every allocation.
    pub const ALIGNMENT : Alignment = {
        assert!(ALIGN.is_power_of_two(), "AlignedAllocator<T, ALIGN>: ALIGN must be a power of two");
        Alignment::constant(ALIGN).max(Alignment::of::<T>())
    };

    /// Allocate from `backend`.
    pub const fn new_in(backend: A) -> Self { Self { facade: Facade::new(backend), _phantom: PhantomData } }

    /// The alignment of every allocation.
    pub fn alignment(&self) -> Alignment { Self::ALIGNMENT }

    /// The same back-end and alignment, but for a different element type.
    pub fn rebind<U>(&self) -> AlignedAllocator<U, ALIGN, A> where A: Clone { AlignedAllocator::new_in(self.facade.0.clone()) }
}

impl<T, const ALIGN: usize, A: Default> AlignedAllocator<T, ALIGN, A> {
    /// Allocate from the default `A` (typically [`Selected`].)
    pub fn new() -> Self { Self::new_in(A::default()) }
}

impl<T, const ALIGN: usize, A: fat::Alloc + thin::Free> AlignedAllocator<T, ALIGN, A> {
    /// The largest `n` that [`allocate`](Self::allocate) could conceivably succeed for.
    pub fn max_size(&self) -> usize {
        let bytes = A::MAX_SIZE.min(isize::MAX as usize - (Self::ALIGNMENT.as_usize() - 1));
        bytes / size_of::<T>().max(1)
    }

    /// Allocate uninitialized storage for `n` values of `T`.
    ///
    /// `n == 0` (or a zero sized `T`) still allocates, returning a unique pointer that must be passed to [`deallocate`](Self::deallocate).
    pub fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let size = Self::bytes(n)?;
        Ok(self.facade.try_allocate(size, Self::ALIGNMENT.as_usize())?.cast())
    }

    /// Allocate storage for `n` values of `T`, all zeroed.
    pub fn allocate_zeroed(&self, n: usize) -> Result<NonNull<T>, AllocError> where T: Zeroable {
        let size = Self::bytes(n)?;
        Ok(self.facade.try_allocate_zeroed(size, Self::ALIGNMENT.as_usize())?.cast())
    }

    /// Release storage from [`allocate`](Self::allocate) or [`allocate_zeroed`](Self::allocate_zeroed).
    ///
    /// ### Safety
    /// *   `ptr` must have been allocated by this allocator (or an equal one) with the same `n`, and not yet deallocated.
    /// *   Any `T`s still in the storage are not dropped.
    pub unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        debug_assert!(Self::bytes(n).is_ok(), "bug: undefined behavior: `n` doesn't match any successful allocation");
        // SAFETY: ✔️ `ptr` was allocated by `self.facade` per fn preconditions
        unsafe { self.facade.free(ptr.as_ptr().cast()) }
    }

    fn bytes(n: usize) -> Result<usize, AllocError> {
        n.checked_mul(size_of::<T>()).ok_or(AllocError::SizeOverflow { size: usize::MAX, align: Self::ALIGNMENT })
    }
}

impl<T, const ALIGN: usize, A: Default> Default for AlignedAllocator<T, ALIGN, A> { fn default() -> Self { Self::new() } }
impl<T, const ALIGN: usize, A: Clone> Clone for AlignedAllocator<T, ALIGN, A> { fn clone(&self) -> Self { Self::new_in(self.facade.0.clone()) } }
impl<T, const ALIGN: usize, A: Copy> Copy for AlignedAllocator<T, ALIGN, A> {}

impl<T, const ALIGN: usize, A: Debug> Debug for AlignedAllocator<T, ALIGN, A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedAllocator")
            .field("type", &core::any::type_name::<T>())
            .field("align", &ALIGN)
            .field("backend", &self.facade.0)
            .finish()
    }
}

/// Allocators with the same back-end and `ALIGN` compare equal when their back-ends do, regardless of element type.
impl<T, U, const ALIGN: usize, A: PartialEq> PartialEq<AlignedAllocator<U, ALIGN, A>> for AlignedAllocator<T, ALIGN, A> {
    fn eq(&self, other: &AlignedAllocator<U, ALIGN, A>) -> bool { self.facade.0 == other.facade.0 }
}

impl<T, const ALIGN: usize, A: Eq> Eq for AlignedAllocator<T, ALIGN, A> {}



#[test] fn alignment() {
    assert_eq!(AlignedAllocator::<u8>::ALIGNMENT, ALIGN_1);
    assert_eq!(AlignedAllocator::<u64>::ALIGNMENT, Alignment::of::<u64>());
    assert_eq!(AlignedAllocator::<u8, 64>::ALIGNMENT, ALIGN_64);
    assert_eq!(AlignedAllocator::<u64, 2>::ALIGNMENT, Alignment::of::<u64>());
    #[repr(C, align(128))] struct Wide([u8; 128]);
    assert_eq!(AlignedAllocator::<Wide, 16>::new().alignment(), ALIGN_128);
}

#[test] fn allocate() {
    let alloc = AlignedAllocator::<u32, 256>::new();
    for n in [0, 1, 7, 100, 10_000] {
        let data = alloc.allocate(n).unwrap();
        assert!(ALIGN_256.is_aligned(data.as_ptr() as usize));
        // SAFETY: ✔️ `data` has room for `n` `u32`s
        let slice = unsafe { core::slice::from_raw_parts_mut(data.as_ptr(), n) };
        for (i, v) in slice.iter_mut().enumerate() { *v = i as u32 }
        assert!(slice.iter().enumerate().all(|(i, v)| *v == i as u32));
        // SAFETY: ✔️ `data` was allocated by `alloc` with `n`
        unsafe { alloc.deallocate(data, n) };
    }
}

#[test] fn allocate_zeroed() {
    let alloc = AlignedAllocator::<u64, 4096>::new();
    let data = alloc.allocate_zeroed(513).unwrap();
    assert!(ALIGN_4096.is_aligned(data.as_ptr() as usize));
    // SAFETY: ✔️ `data` has room for 513 zeroed `u64`s
    assert!(unsafe { core::slice::from_raw_parts(data.as_ptr(), 513) }.iter().all(|v| *v == 0));
    // SAFETY: ✔️ `data` was allocated by `alloc` with 513
    unsafe { alloc.deallocate(data, 513) };
}

#[test] fn overflow() {
    let alloc = AlignedAllocator::<u64, 16>::new();
    assert!(matches!(alloc.allocate(usize::MAX / 4), Err(AllocError::SizeOverflow { .. })));
    assert!(alloc.allocate(alloc.max_size() + 1).is_err());
    assert!(alloc.max_size() <= isize::MAX as usize / 8);
}

#[test] fn failing_backend() {
    let alloc = AlignedAllocator::<u8, 64, _>::new_in(crate::allocator::debug::Null);
    assert_eq!(alloc.allocate(16), Err(AllocError::OutOfMemory { size: 16, align: ALIGN_64 }));
}

#[test] fn counted() {
    let counting = crate::allocator::debug::Counting::new(Selected::default());
    let alloc = AlignedAllocator::<u16, 32, _>::new_in(&counting);
    let a = alloc.allocate(10).unwrap();
    let b = alloc.rebind::<u128>().allocate(3).unwrap();
    assert_eq!(counting.live(), 2);
    // SAFETY: ✔️ allocated above with matching `n`
    unsafe { alloc.deallocate(a, 10) };
    // SAFETY: ✔️ allocated above with matching `n`
    unsafe { alloc.rebind::<u128>().deallocate(b, 3) };
    assert_eq!(counting.live(), 0);
}

#[test] fn equality() {
    assert!(AlignedAllocator::<u8, 64>::new() == AlignedAllocator::<u32, 64>::new());
    assert_eq!(AlignedAllocator::<u8, 64>::new().rebind::<f64>(), AlignedAllocator::<f64, 64>::new());
}
