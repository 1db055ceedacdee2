use crate::*;

#[cfg(doc)] use core::alloc::*;
use core::alloc::Layout;
use core::fmt::{self, Debug, Display, Formatter};
use core::mem::{align_of, size_of};
use core::num::{NonZeroUsize, TryFromIntError};



/// A valid [`Layout`] alignment (a power of 2)
///
/// Available in named constant forms, which have been `#[doc(hidden)]` to avoid spam:
///
/// | Min           | Max               | Name          | Equivalences |
/// | --------------| ------------------| --------------| -------------|
/// | `ALIGN_1`     | `ALIGN_8192`      | Byte(s)       | 8 bits = 1 octect ≈ 1 byte
/// | `ALIGN_1_KiB` | `ALIGN_8192_KiB`  | Kibibyte(s)   | 1 KiB = 2<sup>10</sup> bytes = 1024<sup>1</sup> bytes
/// | `ALIGN_1_MiB` | `ALIGN_2048_MiB`  | Mebibyte(s)   | 1 MiB = 2<sup>20</sup> bytes = 1024<sup>2</sup> bytes
/// | `ALIGN_1_GiB` | `ALIGN_2_GiB`     | Gibibyte(s)   | 1 GiB = 2<sup>30</sup> bytes = 1024<sup>3</sup> bytes
///
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)] #[repr(transparent)] pub struct Alignment(NonZeroUsize);
const _ : () = assert!(align_of::<Alignment>() == align_of::<usize>());
const _ : () = assert!(size_of ::<Alignment>() == size_of ::<usize>());
const _ : () = assert!(size_of ::<Option<Alignment>>() == size_of ::<usize>());

impl Alignment {
    #[track_caller] pub(crate) const fn constant(align: usize) -> Self { match Self::new(align) { Some(a) => a, None => panic!("Alignment::constant(align): invalid constant") } }

    /// Returns [`None`] unless `align` is a valid power of 2 (which also implies nonzero)
    pub const fn new(align: usize) -> Option<Self> {
        if align.is_power_of_two() {
            // SAFETY: ✔️ powers of two are nonzero
            Some(Self(unsafe { NonZeroUsize::new_unchecked(align) }))
        } else {
            None
        }
    }

    /// Returns the [`Alignment`] of `T`.
    pub const fn of<T>() -> Self { Self::constant(align_of::<T>()) }

    /// **Undefined behavior** unless `align` is a valid power of 2 (which also implies nonzero)
    pub const unsafe fn new_unchecked(align: usize) -> Self {
        debug_assert!(align.is_power_of_two(), "bug: undefined behavior: Alignment::new_unchecked(align) requires a power of two");
        // SAFETY: ✔️ powers of two are nonzero, per fn precondition
        Self(unsafe { NonZeroUsize::new_unchecked(align) })
    }

    /// Returns the alignment as a [`usize`] (the nicheless underlying type)
    pub const fn as_usize   (self) -> usize         { self.0.get() }

    /// Returns the alignment as a [`NonZeroUsize`]
    pub const fn as_nonzero (self) -> NonZeroUsize  { self.0 }

    /// The larger of the two alignments.  A `const` [`Ord::max`].
    pub const fn max(self, other: Self) -> Self { if self.as_usize() >= other.as_usize() { self } else { other } }

    /// Returns `true` if `addr` is a multiple of `self`.
    pub const fn is_aligned(self, addr: usize) -> bool { addr & (self.as_usize() - 1) == 0 }

    /// Round `addr` up to the next multiple of `self`, or [`None`] on overflow.
    pub const fn align_up(self, addr: usize) -> Option<usize> {
        let mask = self.as_usize() - 1;
        match addr.checked_add(mask) {
            Some(a) => Some(a & !mask),
            None    => None,
        }
    }

    /// Minimum representable alignment (e.g. `1`)
    pub const MIN : Alignment = ALIGN_1;

    /// Maximum representable alignment
    ///
    /// | Bits  | MAX                           |
    /// | ------| ------------------------------|
    /// | 16    | 2<sup>15</sup> B = 32 KiB     |
    /// | 32    | 2<sup>31</sup> B = 2 GiB      |
    /// | 64    | 2<sup>63</sup> B = 8 EiB      |
    pub const MAX : Alignment = Alignment::constant(usize::MAX/2+1);
}

impl From<Layout   > for Alignment      { fn from(layout: Layout  ) -> Self { Self::constant(layout.align()) } }
impl From<Alignment> for usize          { fn from(align: Alignment) -> Self { align.as_usize()   } }
impl From<Alignment> for NonZeroUsize   { fn from(align: Alignment) -> Self { align.as_nonzero() } }

fn try_from_int_error() -> TryFromIntError { u8::try_from(u16::MAX).unwrap_err() }
impl TryFrom<usize          > for Alignment { fn try_from(align: usize          ) -> Result<Self, Self::Error> { Self::new(align      ).ok_or_else(try_from_int_error) } type Error = TryFromIntError; }
impl TryFrom<NonZeroUsize   > for Alignment { fn try_from(align: NonZeroUsize   ) -> Result<Self, Self::Error> { Self::new(align.get()).ok_or_else(try_from_int_error) } type Error = TryFromIntError; }

impl Debug   for Alignment { fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { util::bytes::pretty(f, self.as_usize()) } }
impl Display for Alignment { fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { util::bytes::pretty(f, self.as_usize()) } }



#[test] fn new() {
    assert_eq!(Alignment::new(0), None);
    assert_eq!(Alignment::new(3), None);
    assert_eq!(Alignment::new(24), None);
    assert_eq!(Alignment::new(usize::MAX), None);
    for shift in 0 .. usize::BITS {
        let align = 1usize << shift;
        assert_eq!(Alignment::new(align).map(Alignment::as_usize), Some(align));
    }
}

#[test] fn of() {
    assert_eq!(Alignment::of::<u8>(),  ALIGN_1);
    assert_eq!(Alignment::of::<u16>(), ALIGN_2);
    assert_eq!(Alignment::of::<u32>(), ALIGN_4);
    #[repr(C, align(64))] struct CacheLine([u8; 64]);
    assert_eq!(Alignment::of::<CacheLine>(), ALIGN_64);
}

#[test] fn is_aligned() {
    assert!( ALIGN_64.is_aligned(0));
    assert!( ALIGN_64.is_aligned(128));
    assert!(!ALIGN_64.is_aligned(96));
    assert!( ALIGN_1.is_aligned(7));
}

#[test] fn align_up() {
    assert_eq!(ALIGN_16.align_up(0),  Some(0));
    assert_eq!(ALIGN_16.align_up(1),  Some(16));
    assert_eq!(ALIGN_16.align_up(16), Some(16));
    assert_eq!(ALIGN_16.align_up(17), Some(32));
    assert_eq!(ALIGN_16.align_up(usize::MAX), None);
}

#[test] fn try_from() {
    assert!(Alignment::try_from(0usize).is_err());
    assert!(Alignment::try_from(48usize).is_err());
    assert_eq!(Alignment::try_from(4096usize).ok(), Some(ALIGN_4096));
}

#[test] fn debug() {
    use alloc::format;
    assert_eq!(format!("{:?}", ALIGN_64),    "64 B");
    assert_eq!(format!("{:?}", ALIGN_8192),  "8192 B");
    assert_eq!(format!("{:?}", ALIGN_16_KiB), "16 KiB");
}
