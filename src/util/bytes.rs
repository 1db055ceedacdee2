use core::fmt::{self, Display, Formatter};
use core::ops::ShrAssign;



/// Pretty print `v` as e.g. "64 B", "16 KiB" or similar
pub fn pretty<T: Copy + Display + From<u16> + Ord + ShrAssign>(f: &mut Formatter<'_>, mut v: T) -> fmt::Result {
    let limit = T::from(8192);
    let shr   = T::from(10);

    for unit in ["B", "KiB", "MiB", "GiB", "TiB", "PiB"] {
        if v <= limit { return write!(f, "{v} {unit}"); }
        v >>= shr;
    }
    write!(f, "{v} EiB")
}
