use core::mem::MaybeUninit;
use core::ptr::NonNull;



/// Forms `&mut [MaybeUninit<u8>]` over a fresh allocation.
///
/// ## Safety
/// *   The bytes `data[..size]` must be valid for reads and writes, and belong to a single allocation.
/// *   `size` must be no larger than `isize::MAX`.
/// *   The memory must not be accessed through any other pointer for the duration of `'a`.
pub unsafe fn from_raw_bytes_mut<'a>(data: NonNull<MaybeUninit<u8>>, size: usize) -> &'a mut [MaybeUninit<u8>] {
    // SAFETY: ✔️ non-null & aligned by type (`u8`), always initialized by type (`MaybeUninit`), the rest per fn preconditions
    unsafe { core::slice::from_raw_parts_mut(data.as_ptr(), size) }
}

/// Zero `data[..size]`, returning the now-initialized pointer.
///
/// ## Safety
/// *   Same as [`from_raw_bytes_mut`].
pub unsafe fn zero(data: NonNull<MaybeUninit<u8>>, size: usize) -> NonNull<u8> {
    // SAFETY: ✔️ per fn preconditions
    unsafe { from_raw_bytes_mut(data, size) }.fill(MaybeUninit::new(0u8));
    data.cast()
}
