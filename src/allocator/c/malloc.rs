use crate::*;
use crate::meta::*;

use libc::*;

use core::mem::MaybeUninit;
use core::ptr::NonNull;



/// [`malloc`] / [`calloc`] / [`free`]
///
/// Unaligned (beyond [`MAX_ALIGN`](Self::MAX_ALIGN)) base allocator, used by <code>[manual::Manual](crate::allocator::manual::Manual)&lt;[Malloc]&gt;</code>.
///
/// | Rust                              | C                     |
/// | ----------------------------------| ----------------------|
/// | [`thin::Alloc::alloc_uninit`]     | [`malloc`]            |
/// | [`thin::Alloc::alloc_zeroed`]     | [`calloc`]            |
/// | [`thin::Free::free`]              | [`free`]              |
///
/// [`malloc`]: https://en.cppreference.com/w/c/memory/malloc
/// [`calloc`]: https://en.cppreference.com/w/c/memory/calloc
/// [`free`]:   https://en.cppreference.com/w/c/memory/free
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Malloc;



// meta::*

impl Meta for Malloc {
    type Error = ();

    /// | Platform          | Value     |
    /// | ------------------| ----------|
    /// | Windows 32-bit    | [`8` according to Microsoft](https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/malloc#return-value)
    /// | Windows 64-bit    | [`16` according to Microsoft](https://learn.microsoft.com/en-us/cpp/c-runtime-library/reference/malloc#return-value)
    /// | glibc             | <code>[_Alignof](https://en.cppreference.com/w/c/language/_Alignof)\([max_align_t](https://en.cppreference.com/w/c/types/max_align_t)\)</code>
    /// | Elsewhere         | <code>[_Alignof](https://en.cppreference.com/w/c/language/_Alignof)\(double\)</code> ("... suitable for any object type with [fundamental alignment](https://en.cppreference.com/w/c/language/object#Alignment)")
    const MAX_ALIGN : Alignment = if cfg!(target_env = "msvc") {
        if core::mem::size_of::<usize>() >= 8 { ALIGN_16 } else { ALIGN_8 }
    } else {
        #[cfg(not(all(target_os = "linux", target_env = "gnu")))] #[allow(non_camel_case_types)] type max_align_t = f64;
        Alignment::of::<max_align_t>()
    };

    const MAX_SIZE : usize = usize::MAX; // *slightly* less in practice

    /// "If the size of the space requested is zero, the behavior is implementation defined: either a null pointer is returned, or the behavior is as if the size were some nonzero value, except that the returned pointer shall not be used to access an object."
    /// C89 § 7.20.3 ¶ 1
    const ZST_SUPPORTED : bool = false;
}



/// | Safety Item   | Description   |
/// | --------------| --------------|
/// | `align`       | ✔️ Validated via [`thin::test::alignment`] ("The pointer returned if the allocation succeeds is suitably aligned so that it may be assigned to a pointer to any type of object" C89 § 7.20.3 ¶ 1)
/// | `size`        | ✔️ Validated via [`thin::test::edge_case_sizes`]
/// | `exclusive`   | ✔️ "Each such allocation shall yield a pointer to an object disjoint from any other object." C89 § 7.20.3 ¶ 1
/// | `zeroed`      | ✔️ Validated via [`thin::test::zeroed_alloc`] ("The space is initialized to all bits zero" C89 § 7.20.3.1 ¶ 2)
///
// SAFETY: per above
unsafe impl thin::Alloc for Malloc {
    #[track_caller] fn alloc_uninit(&self, size: usize) -> Result<NonNull<MaybeUninit<u8>>, Self::Error> {
        // SAFETY: ✔️ this "should" be safe for all `size`.  Unsound C stdlibs are #[test]ed for at the end of this file.
        let alloc = unsafe { malloc(size) };
        NonNull::new(alloc.cast()).ok_or(())
    }

    #[track_caller] fn alloc_zeroed(&self, size: usize) -> Result<NonNull<u8>, Self::Error> {
        // SAFETY: ✔️ this "should" be safe for all `size`.  Unsound C stdlibs are #[test]ed for at the end of this file.
        // SAFETY: ✔️ `calloc` zeros memory
        let alloc = unsafe { calloc(1, size) };
        NonNull::new(alloc.cast()).ok_or(())
    }
}

// SAFETY: ✔️ `free` is compatible with `malloc` / `calloc` (C89 § 7.20.3.2 ¶ 2)
unsafe impl thin::Free for Malloc {
    #[track_caller] unsafe fn free_nullable(&self, ptr: *mut MaybeUninit<u8>) {
        // SAFETY: ✔️ `ptr` can be nullptr (C89 § 7.20.3.2 ¶ 2, validated via [`thin::test::nullable`])
        // SAFETY: ✔️ `ptr` otherwise belongs to `self` per [`thin::Free::free_nullable`]'s documented safety preconditions
        unsafe { free(ptr.cast()) }
    }
}

#[no_implicit_prelude] mod cleanroom {
    use super::{impls, Malloc};

    impls! {
        unsafe impl ialign::fat::Alloc      for Malloc => ialign::thin::Alloc;
        unsafe impl ialign::fat::Free       for Malloc => ialign::thin::Free;
    }
}



#[test] fn thin_alignment()             { thin::test::alignment(Malloc) }
#[test] fn thin_edge_case_sizes()       { thin::test::edge_case_sizes(Malloc) }
#[test] fn thin_nullable()              { thin::test::nullable(Malloc) }
#[test] fn thin_zeroed()                { thin::test::zeroed_alloc(Malloc) }
#[test] fn thin_zst_support()           { thin::test::zst_supported_conservative(Malloc) }

#[test] fn fat_alignment()              { fat::test::alignment(Malloc) }
#[test] fn fat_edge_case_sizes()        { fat::test::edge_case_sizes(Malloc) }
#[test] fn fat_thin_free()              { fat::test::thin_free_compatible(Malloc) }
#[test] fn fat_zeroed()                 { fat::test::zeroed_alloc(Malloc) }
#[test] fn fat_zst_support()            { fat::test::zst_supported_conservative(Malloc) }

#[test] fn fat_rejects_overalignment() {
    let layout = core::alloc::Layout::from_size_align(64, Malloc::MAX_ALIGN.as_usize() * 2).unwrap();
    assert!(fat::Alloc::alloc_uninit(&Malloc, layout).is_err());
}
