//! [`AllocError`], [`ExcessiveAlignmentRequestedError`]

use crate::Alignment;

use core::alloc::Layout;
use core::fmt::{self, Debug, Display, Formatter};



/// More alignment was requested than the allocator could support.
#[derive(Clone, Copy, Debug, PartialEq, Eq)] pub struct ExcessiveAlignmentRequestedError {
    pub requested: Alignment,
    pub supported: Alignment,
}

impl ExcessiveAlignmentRequestedError {
    /// Returns an error if `layout` needs more than `supported` alignment.
    pub fn check(layout: Layout, supported: Alignment) -> Result<(), Self> {
        if layout.align() <= supported.as_usize() { return Ok(()) }
        Err(Self { requested: Alignment::from(layout), supported })
    }
}

impl Display for ExcessiveAlignmentRequestedError { fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "requested {:?} alignment, but a maximum of {:?} is supported", self.requested, self.supported) } }
impl From<ExcessiveAlignmentRequestedError> for () { fn from(_: ExcessiveAlignmentRequestedError) -> Self {} }
#[cfg(feature = "std")] impl std::error::Error for ExcessiveAlignmentRequestedError {}



/// Why an aligned allocation failed.
///
/// <code>[allocate_aligned](crate::allocate_aligned)</code> collapses all of these into a null pointer.
/// <code>[try_allocate_aligned](crate::try_allocate_aligned)</code> reports them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)] pub enum AllocError {
    /// The requested alignment wasn't a power of two (zero included).
    InvalidAlignment { requested: usize },

    /// `size`, rounded up to `align`, exceeded `isize::MAX` or the back-end's maximum allocation size.
    SizeOverflow { size: usize, align: Alignment },

    /// The back-end can't provide this much alignment.
    ExcessiveAlignment(ExcessiveAlignmentRequestedError),

    /// The back-end failed to allocate (typically out of memory.)
    OutOfMemory { size: usize, align: Alignment },

    /// The back-end claimed success, but returned an insufficiently aligned address.  The allocation was released.
    Misaligned { align: Alignment, address: usize },
}

impl Display for AllocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            AllocError::InvalidAlignment { requested }      => write!(f, "alignment {requested} isn't a power of two"),
            AllocError::SizeOverflow { size, align }        => write!(f, "{size} bytes aligned to {align:?} exceeds the maximum allocation size"),
            AllocError::ExcessiveAlignment(ref err)         => Display::fmt(err, f),
            AllocError::OutOfMemory { size, align }         => write!(f, "failed to allocate {size} bytes aligned to {align:?}"),
            AllocError::Misaligned { align, address }       => write!(f, "allocator returned {address:#x}, which isn't aligned to {align:?}"),
        }
    }
}

impl From<ExcessiveAlignmentRequestedError> for AllocError { fn from(err: ExcessiveAlignmentRequestedError) -> Self { AllocError::ExcessiveAlignment(err) } }
impl From<AllocError> for () { fn from(_: AllocError) -> Self {} }
#[cfg(feature = "std")] impl std::error::Error for AllocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocError::ExcessiveAlignment(err) => Some(err),
            _                                   => None,
        }
    }
}



#[test] fn display() {
    use crate::*;
    use alloc::string::ToString;

    assert_eq!(AllocError::InvalidAlignment { requested: 3 }.to_string(), "alignment 3 isn't a power of two");
    assert_eq!(AllocError::OutOfMemory { size: 1024, align: ALIGN_64 }.to_string(), "failed to allocate 1024 bytes aligned to 64 B");
    assert_eq!(AllocError::Misaligned { align: ALIGN_4096, address: 0x1010 }.to_string(), "allocator returned 0x1010, which isn't aligned to 4096 B");

    let excessive = ExcessiveAlignmentRequestedError { requested: ALIGN_16_MiB, supported: ALIGN_16 };
    assert_eq!(AllocError::from(excessive).to_string(), "requested 16 MiB alignment, but a maximum of 16 B is supported");
}
