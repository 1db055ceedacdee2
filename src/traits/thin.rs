//! C-style allocator traits operating on thin pointers, implying alignment, etc.
//!
//! C allocators, and every aligned back-end behind <code>[free_aligned](crate::free_aligned)</code>, merely accept a pointer to free.
//! This module provides traits for such functionality.

use crate::*;
use crate::meta::Meta;

use core::mem::MaybeUninit;
use core::ptr::NonNull;



/// Allocation functions with alignment (up to <code>[Meta]::[MAX_ALIGN](Meta::MAX_ALIGN)</code>) implied by size:
/// <code>
/// fn [alloc_uninit](Self::alloc_uninit)(size: [usize]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;
/// fn [alloc_zeroed](Self::alloc_zeroed)(size: [usize]) -> [Result]&lt;[NonNull]&lt;\_&gt;, \_&gt;
/// </code><br>
///
/// ## Safety
/// *   Successful allocations must be aligned to at least <code>[Meta]::[MIN_ALIGN](Meta::MIN_ALIGN)</code>.
/// *   Successful allocations must provide at least `size` bytes.
pub unsafe trait Alloc : Meta {
    /// Allocate at least `size` bytes of uninitialized memory.
    ///
    /// The resulting allocation can typically be freed with <code>[Free]::[free](Free::free)</code>
    fn alloc_uninit(&self, size: usize) -> Result<AllocNN, Self::Error>;

    /// Allocate at least `size` bytes of zeroed memory.
    ///
    /// The resulting allocation can typically be freed with <code>[Free]::[free](Free::free)</code>
    fn alloc_zeroed(&self, size: usize) -> Result<AllocNN0, Self::Error> {
        let alloc = self.alloc_uninit(size)?;
        // SAFETY: ✔️ `alloc` was just allocated with at least `size` bytes
        Ok(unsafe { util::slice::zero(alloc, size) })
    }
}



/// Deallocation function:<br>
/// <code>[free](Self::free)(ptr: [NonNull]<[MaybeUninit]<[u8]>>)</code><br>
/// <br>
///
/// Implementors must override at least one of [`free`](Self::free) or [`free_nullable`](Self::free_nullable): the defaults are implemented in terms of each other.
///
/// ## Safety
/// *   This trait must be able to free allocations made by any other [`thin`] *and* [`fat`] allocation traits implemented on this allocator type.
pub unsafe trait Free : Meta {
    /// Deallocate an allocation, `ptr`, belonging to `self`.
    ///
    /// ### Safety
    /// *   `ptr` must belong to `self`
    /// *   `ptr` will no longer be accessible after free
    unsafe fn free(&self, ptr: AllocNN) { unsafe { self.free_nullable(ptr.as_ptr()) } }

    /// Deallocate an allocation, `ptr`, belonging to `self`.
    ///
    /// ### Safety
    /// *   `ptr` may be null, in which case this is a noop
    /// *   `ptr` must otherwise belong to `self`
    /// *   `ptr` will no longer be accessible after free
    unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) { if let Some(ptr) = NonNull::new(ptr) { unsafe { self.free(ptr) } } }
}



#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Alloc> Alloc for &'a A {
    fn alloc_uninit(&self, size: usize) -> Result<AllocNN,  Self::Error> { A::alloc_uninit(self, size) }
    fn alloc_zeroed(&self, size: usize) -> Result<AllocNN0, Self::Error> { A::alloc_zeroed(self, size) }
}

#[allow(clippy::undocumented_unsafe_blocks)] // SAFETY: ✔️ same trait, same prereqs
unsafe impl<'a, A: Free> Free for &'a A {
    unsafe fn free(         &self, ptr: AllocNN                 ) { unsafe { A::free(         self, ptr) } }
    unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>    ) { unsafe { A::free_nullable(self, ptr) } }
}



/// Testing functions to verify implementations of [`thin`] traits.
pub mod test {
    use super::*;

    /// Assert that `A` provides at least [`Meta::MIN_ALIGN`] for a spread of sizes, and that the memory is usable.
    #[track_caller] pub fn alignment<A: Alloc + Free>(allocator: A) {
        for size in [1, 2, 3, 4, 7, 8, 15, 16, 31, 32, 64, 100, 1000, 4096, 10_000] {
            let alloc = allocator.alloc_uninit(size).unwrap_or_else(|err| panic!("alloc_uninit({size}) failed: {err:?}"));
            let addr = alloc.as_ptr() as usize;
            assert!(A::MIN_ALIGN.is_aligned(addr), "alloc_uninit({size}) = {addr:#x}, which isn't aligned to MIN_ALIGN = {:?}", A::MIN_ALIGN);
            // SAFETY: ✔️ `alloc` was just allocated with `size` bytes
            unsafe { fill_and_verify(alloc, size) };
            // SAFETY: ✔️ `alloc` belongs to `allocator`
            unsafe { allocator.free(alloc) };
        }
    }

    /// Assert that absurd sizes fail gracefully (no crash, and anything that *does* succeed can be freed.)
    #[track_caller] pub fn edge_case_sizes<A: Alloc + Free>(allocator: A) {
        for size in [usize::MAX, usize::MAX - 1, usize::MAX/2 + 1, usize::MAX/2] {
            if let Ok(alloc) = allocator.alloc_uninit(size) {
                // SAFETY: ✔️ `alloc` belongs to `allocator`
                unsafe { allocator.free(alloc) };
            }
        }
    }

    /// Assert that [`Free::free_nullable`] accepts null.
    #[track_caller] pub fn nullable<A: Free>(allocator: A) {
        // SAFETY: ✔️ null is explicitly allowed by `free_nullable`
        unsafe { allocator.free_nullable(core::ptr::null_mut()) }
    }

    /// Assert that [`Alloc::alloc_zeroed`] zeroes memory.
    #[track_caller] pub fn zeroed_alloc<A: Alloc + Free>(allocator: A) {
        for size in [1, 8, 100, 4096, 100_000] {
            let alloc = allocator.alloc_zeroed(size).unwrap_or_else(|err| panic!("alloc_zeroed({size}) failed: {err:?}"));
            // SAFETY: ✔️ `alloc` was just allocated and initialized with `size` bytes
            let bytes = unsafe { core::slice::from_raw_parts(alloc.as_ptr(), size) };
            assert!(bytes.iter().all(|b| *b == 0), "alloc_zeroed({size}) returned nonzero memory");
            // SAFETY: ✔️ `alloc` belongs to `allocator`
            unsafe { allocator.free(alloc.cast()) };
        }
    }

    /// Assert that `A` supports zero sized allocations if [`Meta::ZST_SUPPORTED`] is set.
    #[track_caller] pub fn zst_supported_conservative<A: Alloc + Free>(allocator: A) {
        let alloc = allocator.alloc_uninit(0);
        if A::ZST_SUPPORTED { assert!(alloc.is_ok(), "alloc = {alloc:?}, ZST_SUPPORTED = {}", A::ZST_SUPPORTED) }
        // SAFETY: ✔️ `alloc` belongs to `allocator`
        if let Ok(alloc) = alloc { unsafe { allocator.free(alloc) } }
    }

    /// Write a `size`-dependent pattern to `data[..size]` and verify it reads back intact.
    ///
    /// ### Safety
    /// *   `data[..size]` must be valid for reads and writes, and exclusively accessible.
    #[track_caller] pub unsafe fn fill_and_verify(data: AllocNN, size: usize) {
        let pattern = |i: usize| (i.wrapping_mul(31) ^ size) as u8;
        // SAFETY: ✔️ per fn preconditions
        let bytes = unsafe { util::slice::from_raw_bytes_mut(data, size) };
        for (i, b) in bytes.iter_mut().enumerate() { *b = MaybeUninit::new(pattern(i)) }
        for (i, b) in bytes.iter().enumerate() {
            // SAFETY: ✔️ every byte was just initialized
            let b = unsafe { b.assume_init() };
            assert_eq!(b, pattern(i), "byte {i} of {size} was corrupted");
        }
    }
}
