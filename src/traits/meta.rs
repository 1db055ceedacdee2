//! Metadata traits common to all (de)allocators

use crate::*;
use crate::error::*;

use core::fmt::Debug;



/// Allocator metadata (are ZSTs supported, max allocation size/alignment, error type, etc.)
pub trait Meta {
    /// The error type returned from failed allocation.
    type Error : Debug + From<ExcessiveAlignmentRequestedError>;

    /// Indicates the minimum alignment every successful allocation is guaranteed to have, regardless of what was requested.
    ///
    /// | Allocator                                 | Common Values     |
    /// | ------------------------------------------| ------------------|
    /// | [`posix_memalign`]/[`memalign`] wrappers  | <code>[Alignment]::[of](Alignment::of)::&lt;\*const ()&gt;()</code>, as POSIX rejects less
    /// | `malloc`                                  | <code>[Alignment]::[of](Alignment::of)::&lt;[max_align_t](https://en.cppreference.com/w/c/types/max_align_t)&gt;()</code>
    ///
    /// [`posix_memalign`]: https://man7.org/linux/man-pages/man3/posix_memalign.3.html
    /// [`memalign`]:       https://man7.org/linux/man-pages/man3/memalign.3.html
    const MIN_ALIGN : Alignment = Alignment::MIN;

    /// Indicates the maximum alignment this allocator should be expected to succeed in allocating.
    /// Requesting an allocation with more alignment than this is almost certainly a bug.
    ///
    /// ## Safety
    /// *   It should be "safe" to attempt an allocation with larger alignment than this - however, such calls are unlikely to return anything other than <code>[Err]\(...\)</code>.
    /// *   [`thin`] style allocations don't parameterize alignment, and will simply return allocations with at most this much alignment.  The caller is responsible for ensuring that's sufficient.
    const MAX_ALIGN : Alignment;

    /// Indicates the maximum size this allocator should be expected to succeed in allocating.
    /// Requesting an allocation larger than this is almost certainly a bug.
    const MAX_SIZE : usize;

    /// Indicates if this allocator supports zero-sized allocations.
    /// While this is nice and Rust-friendly, it may not be supported by C allocators.
    /// The [`Facade`](crate::Facade) never asks a back-end for zero bytes either way.
    const ZST_SUPPORTED : bool;
}

impl<'a, A: Meta> Meta for &'a A {
    type Error                      = A::Error;
    const MIN_ALIGN     : Alignment = A::MIN_ALIGN;
    const MAX_ALIGN     : Alignment = A::MAX_ALIGN;
    const MAX_SIZE      : usize     = A::MAX_SIZE;
    const ZST_SUPPORTED : bool      = A::ZST_SUPPORTED;
}

