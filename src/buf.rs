//! [`ABuf`]

use crate::*;
use crate::allocator::Selected;
use crate::error::AllocError;

use bytemuck::{Pod, PodCastError};

use core::fmt::{self, Debug, Formatter};
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;



/// An owned, zero-initialized, aligned block of bytes, freed on [`Drop`].
///
/// ```
/// use ialign::{ABuf, ALIGN_64};
///
/// let mut buf = ABuf::new(256, ALIGN_64).unwrap();
/// assert_eq!(buf.as_ptr() as usize % 64, 0);
/// buf[..4].copy_from_slice(&1.0f32.to_ne_bytes());
///
/// let floats : &[f32] = buf.try_cast_slice().unwrap();
/// assert_eq!(floats.len(), 64);
/// assert_eq!(floats[0], 1.0);
/// ```
pub struct ABuf<A: fat::Alloc + thin::Free = Selected> {
    facade: Facade<A>,
    data:   NonNull<u8>,
    len:    usize,
    align:  Alignment,
}

// SAFETY: ✔️ `ABuf` owns its bytes exclusively, so it's as thread safe as its back-end
unsafe impl<A: fat::Alloc + thin::Free + Send> Send for ABuf<A> {}
// SAFETY: ✔️ `&ABuf` only grants shared access to the bytes
unsafe impl<A: fat::Alloc + thin::Free + Sync> Sync for ABuf<A> {}

impl<A: fat::Alloc + thin::Free> Drop for ABuf<A> {
    fn drop(&mut self) {
        // SAFETY: ✔️ `self.data` was allocated by `self.facade`, and will never be accessed again
        unsafe { self.facade.free(self.data.as_ptr().cast()) }
    }
}

impl ABuf {
    /// Allocate `len` zeroed bytes aligned to `align` using the [`Selected`] back-end.
    pub fn new(len: usize, align: Alignment) -> Result<Self, AllocError> { Self::new_in(len, align, Selected::default()) }
}

impl<A: fat::Alloc + thin::Free> ABuf<A> {
    /// Allocate `len` zeroed bytes aligned to `align` using `backend`.
    pub fn new_in(len: usize, align: Alignment, backend: A) -> Result<Self, AllocError> {
        let facade = Facade(backend);
        let data = facade.try_allocate_zeroed(len, align.as_usize())?;
        Ok(Self { facade, data, len, align })
    }

    /// The alignment `self` was allocated with.
    pub fn alignment(&self) -> Alignment { self.align }

    /// The back-end `self` was allocated with.
    pub fn backend(&self) -> &A { self.facade.backend() }

    /// Reinterpret the bytes as `[T]`.
    ///
    /// Fails if the length isn't a multiple of `size_of::<T>()`, or if [`alignment`](Self::alignment) is too small for `T`.
    pub fn try_cast_slice<T: Pod>(&self) -> Result<&[T], PodCastError> { bytemuck::try_cast_slice(&**self) }

    /// Reinterpret the bytes as `[T]`, mutably.
    pub fn try_cast_slice_mut<T: Pod>(&mut self) -> Result<&mut [T], PodCastError> { bytemuck::try_cast_slice_mut(&mut **self) }
}

impl<A: fat::Alloc + thin::Free> Deref for ABuf<A> {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        // SAFETY: ✔️ `self.data` holds `self.len` initialized (zeroed, then only ever written through `&mut [u8]`) bytes
        unsafe { core::slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }
}

impl<A: fat::Alloc + thin::Free> DerefMut for ABuf<A> {
    fn deref_mut(&mut self) -> &mut [u8] {
        // SAFETY: ✔️ as above, and `&mut self` guarantees exclusive access
        unsafe { core::slice::from_raw_parts_mut(self.data.as_ptr(), self.len) }
    }
}

impl<A: fat::Alloc + thin::Free> AsRef<[u8]> for ABuf<A> { fn as_ref(&self) -> &[u8] { self } }
impl<A: fat::Alloc + thin::Free> AsMut<[u8]> for ABuf<A> { fn as_mut(&mut self) -> &mut [u8] { self } }

impl<A: fat::Alloc + thin::Free> Debug for ABuf<A> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ABuf").field("len", &self.len).field("align", &self.align).finish_non_exhaustive()
    }
}



#[test] fn zeroed_and_aligned() {
    for align in [ALIGN_1, ALIGN_16, ALIGN_4096] {
        for len in [0, 1, 100, 8192] {
            let buf = ABuf::new(len, align).unwrap();
            assert_eq!(buf.len(), len);
            assert_eq!(buf.alignment(), align);
            assert!(align.is_aligned(buf.as_ptr() as usize));
            assert!(buf.iter().all(|b| *b == 0));
        }
    }
}

#[test] fn cast() {
    let mut buf = ABuf::new(64, ALIGN_16).unwrap();
    buf.try_cast_slice_mut::<u32>().unwrap()[3] = 0xDEAD_BEEF;
    assert_eq!(buf.try_cast_slice::<u32>().unwrap()[3], 0xDEAD_BEEF);
    assert_eq!(buf.try_cast_slice::<u128>().unwrap().len(), 4);
    assert_eq!(buf.try_cast_slice::<[u8; 3]>().unwrap_err(), PodCastError::OutputSliceWouldHaveSlop);
}

#[test] fn freed_on_drop() {
    let counting = crate::allocator::debug::Counting::new(Selected::default());
    {
        let _a = ABuf::new_in(100, ALIGN_64, &counting).unwrap();
        let _b = ABuf::new_in(0, ALIGN_8, &counting).unwrap();
        assert_eq!(counting.live(), 2);
    }
    assert_eq!(counting.live(), 0);
}

#[test] fn failing_backend() {
    let err = ABuf::new_in(16, ALIGN_16, crate::allocator::debug::Null).unwrap_err();
    assert_eq!(err, AllocError::OutOfMemory { size: 16, align: ALIGN_16 });
}

#[test] fn send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ABuf>();
}
