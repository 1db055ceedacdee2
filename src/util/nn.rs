//! [`NonNull`]-related utilities

use crate::Alignment;

use core::ptr::NonNull;



/// A well-aligned, non-null, dangling pointer suitable for zero-sized allocations.
pub fn dangling<T>(align: Alignment) -> NonNull<T> {
    // SAFETY: ✔️ alignments are nonzero
    unsafe { NonNull::new_unchecked(core::ptr::null_mut::<u8>().wrapping_add(align.as_usize()).cast()) }
}

