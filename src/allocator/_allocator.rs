//! Allocator implementations
//!
//! | Back-end                                  | Selected on                                               | Primitive             |
//! | ------------------------------------------| ----------------------------------------------------------| ----------------------|
//! | [`msvc::AlignedMalloc`]                   | Windows (MSVC or MinGW CRT)                               | `_aligned_malloc`     |
//! | [`posix::PosixMemalign`]                  | macOS 10.6+, Solaris/illumos, POSIX.1-2001 Unix           | `posix_memalign`      |
//! | [`memalign::Memalign`]                    | Android (and legacy SunOS via `IALIGN_BACKEND=memalign`)  | `memalign`            |
//! | <code>[manual::Manual]&lt;\_&gt;</code>   | everything else                                           | `malloc` or [`alloc::alloc::alloc`](::alloc::alloc::alloc) + header |
//!
//! The build script picks exactly one of these as [`Selected`].
//! Set `IALIGN_BACKEND` to one of `msvc`, `posix`, `memalign`, or `manual` to override the choice.

#[path = "alloc/_alloc.rs"      ] pub mod alloc;
#[path = "c/_c.rs"              ] pub mod c;
#[path = "debug/_debug.rs"      ] pub mod debug;
#[path = "manual/_manual.rs"    ] pub mod manual;
#[path = "memalign/_memalign.rs"] pub mod memalign;
#[path = "msvc/_msvc.rs"        ] pub mod msvc;
#[path = "posix/_posix.rs"      ] pub mod posix;
#[path = "win32/_win32.rs"      ] pub mod win32;



/// The aligned allocation back-end chosen for this target at build time.
#[cfg(ialign_backend = "msvc"       )] pub type Selected = msvc::AlignedMalloc;
/// The aligned allocation back-end chosen for this target at build time.
#[cfg(ialign_backend = "posix"      )] pub type Selected = posix::PosixMemalign;
/// The aligned allocation back-end chosen for this target at build time.
#[cfg(ialign_backend = "memalign"   )] pub type Selected = memalign::Memalign;
/// The aligned allocation back-end chosen for this target at build time.
#[cfg(all(ialign_backend = "manual", ialign_manual_base = "malloc"))] pub type Selected = manual::Manual<c::Malloc>;
/// The aligned allocation back-end chosen for this target at build time.
#[cfg(all(ialign_backend = "manual", ialign_manual_base = "global"))] pub type Selected = manual::Manual<alloc::Global>;

/// Name of the [`Selected`] back-end, for diagnostics.
///
/// | [`Selected`]                              | `BACKEND`             |
/// | ------------------------------------------| ----------------------|
/// | [`msvc::AlignedMalloc`]                   | `"_aligned_malloc"`
/// | [`posix::PosixMemalign`]                  | `"posix_memalign"`
/// | [`memalign::Memalign`]                    | `"memalign"`
/// | <code>[manual::Manual]&lt;[c::Malloc]&gt;</code>      | `"manual(malloc)"`
/// | <code>[manual::Manual]&lt;[alloc::Global]&gt;</code>  | `"manual(global)"`
pub const BACKEND : &str = if cfg!(ialign_backend = "msvc") {
    "_aligned_malloc"
} else if cfg!(ialign_backend = "posix") {
    "posix_memalign"
} else if cfg!(ialign_backend = "memalign") {
    "memalign"
} else if cfg!(ialign_manual_base = "malloc") {
    "manual(malloc)"
} else {
    "manual(global)"
};



#[test] fn backend_matches_target() {
    if option_env!("IALIGN_BACKEND").is_some_and(|b| !b.trim().is_empty()) { return } // overridden
    if cfg!(all(windows, any(target_env = "msvc", target_env = "gnu"), feature = "msvc")) {
        assert_eq!(BACKEND, "_aligned_malloc");
    } else if cfg!(all(any(target_os = "linux", target_os = "macos", target_os = "freebsd", target_os = "solaris", target_os = "illumos"), feature = "c")) {
        assert_eq!(BACKEND, "posix_memalign");
    } else if cfg!(all(target_os = "android", feature = "c")) {
        assert_eq!(BACKEND, "memalign");
    } else if cfg!(not(any(feature = "c", feature = "msvc"))) {
        assert!(BACKEND.starts_with("manual("), "BACKEND = {BACKEND:?}, but no native back-end was enabled");
    }
}

#[test] fn manual_base_matches_features() {
    if !BACKEND.starts_with("manual(") { return }
    if cfg!(all(feature = "c", any(unix, windows))) {
        assert_eq!(BACKEND, "manual(malloc)");
    } else {
        assert_eq!(BACKEND, "manual(global)");
    }
}

#[test] fn selected_is_zero_sized() {
    assert_eq!(core::mem::size_of::<Selected>(), 0);
}
