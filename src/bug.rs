//! Bug reporting panics

use crate::Alignment;

use core::ffi::c_void;
use core::mem::MaybeUninit;
use core::ptr::NonNull;



pub trait AsPtr : Copy                  { fn as_ptr(self) -> *mut c_void; }
impl AsPtr for *mut             c_void  { fn as_ptr(self) -> *mut c_void { self } }
impl AsPtr for *mut    MaybeUninit<u8>  { fn as_ptr(self) -> *mut c_void { self.cast() } }
impl AsPtr for *mut                u8   { fn as_ptr(self) -> *mut c_void { self.cast() } }
impl AsPtr for NonNull<MaybeUninit<u8>> { fn as_ptr(self) -> *mut c_void { self.as_ptr().cast() } }
impl AsPtr for NonNull<            u8 > { fn as_ptr(self) -> *mut c_void { self.as_ptr().cast() } }

/// Report bugs that indicate Undefined Behavior
pub mod ub {
    use super::*;

    #[track_caller] #[inline(never)] pub fn invalid_free_align_for_allocator(align: impl Into<usize>) -> ! {
        let align = align.into();
        if let Ok(align) = Alignment::try_from(align) {
            panic!("bug: undefined behavior: tried to free an allocation with alignment {align:?}, but that's not supported by the allocator");
        } else {
            panic!("bug: undefined behavior: tried to free an allocation with alignment {align:?}, but that's not supported by the allocator.  It's also not a power of two, which might hint at a corrupt Layout.");
        }
    }

    #[track_caller] #[inline(never)] pub fn invalid_ptr_for_allocator(ptr: impl AsPtr) -> ! {
        let ptr = ptr.as_ptr();
        panic!("bug: undefined behavior: {ptr:?} doesn't belong to this allocator");
    }

    #[track_caller] #[inline(never)] pub fn corrupt_header(ptr: impl AsPtr) -> ! {
        let ptr = ptr.as_ptr();
        panic!("bug: undefined behavior: the bookkeeping header before {ptr:?} is corrupt (typically this means the pointer didn't belong to the allocator, was already freed, or there was heap corruption)");
    }

    #[track_caller] #[inline(never)] pub fn misaligned_free(ptr: impl AsPtr, align: Alignment) -> ! {
        let ptr = ptr.as_ptr();
        panic!("bug: undefined behavior: tried to free {ptr:?}, but it isn't aligned to the {align:?} it was supposedly allocated with");
    }
}
