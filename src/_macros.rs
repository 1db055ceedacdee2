//! Diagnostics forwarded to [`log`](https://docs.rs/log) when the `log` feature is enabled, and compiled out otherwise.

#[cfg(feature = "log")] macro_rules! trace {
    ( $($tt:tt)* ) => { ::log::trace!(target: "ialign", $($tt)*) };
}

#[cfg(feature = "log")] macro_rules! debug {
    ( $($tt:tt)* ) => { ::log::debug!(target: "ialign", $($tt)*) };
}

// Arguments are still type checked (but never evaluated) without `log`.
#[cfg(not(feature = "log"))] macro_rules! trace {
    ( $($tt:tt)* ) => { if false { let _ = ::core::format_args!($($tt)*); } };
}

#[cfg(not(feature = "log"))] macro_rules! debug {
    ( $($tt:tt)* ) => { if false { let _ = ::core::format_args!($($tt)*); } };
}
