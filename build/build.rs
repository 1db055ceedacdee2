use std::env;

const PROBE_CC      : &'static str = "build/probe/cc.c";
const PROBE_POSIX   : &'static str = "build/probe/posix_memalign.c";

#[derive(Clone, Copy, Debug, PartialEq, Eq)] enum Backend { Msvc, Posix, Memalign, Manual }

impl Backend {
    fn name(self) -> &'static str {
        match self {
            Backend::Msvc       => "msvc",
            Backend::Posix      => "posix",
            Backend::Memalign   => "memalign",
            Backend::Manual     => "manual",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name.trim() {
            "msvc"      => Some(Backend::Msvc),
            "posix"     => Some(Backend::Posix),
            "memalign"  => Some(Backend::Memalign),
            "manual"    => Some(Backend::Manual),
            _           => None,
        }
    }
}

struct Target {
    os:         String,
    env:        String,
    vendor:     String,
    families:   Vec<String>,
    c:          bool,
    msvc:       bool,
    alloc:      bool,
}

impl Target {
    fn from_env() -> Self {
        let var = |name: &str| env::var(name).unwrap_or_default();
        Self {
            os:         var("CARGO_CFG_TARGET_OS"),
            env:        var("CARGO_CFG_TARGET_ENV"),
            vendor:     var("CARGO_CFG_TARGET_VENDOR"),
            families:   var("CARGO_CFG_TARGET_FAMILY").split(',').map(|f| f.trim().to_string()).collect(),
            c:          env::var_os("CARGO_FEATURE_C"    ).is_some(),
            msvc:       env::var_os("CARGO_FEATURE_MSVC" ).is_some(),
            alloc:      env::var_os("CARGO_FEATURE_ALLOC").is_some(),
        }
    }

    fn is_family(&self, family: &str) -> bool { self.families.iter().any(|f| f == family) }
    fn is_windows(&self) -> bool { self.os == "windows" }
    fn has_crt_aligned_malloc(&self) -> bool { self.is_windows() && matches!(self.env.as_str(), "msvc" | "gnu") }
    fn has_memalign(&self) -> bool { matches!(self.os.as_str(), "linux" | "android" | "solaris" | "illumos") }

    /// `c::Malloc` needs a C runtime reachable through `libc`.
    fn manual_base(&self) -> Option<&'static str> {
        if self.c && (self.is_family("unix") || self.is_windows()) { Some("malloc") }
        else if self.alloc { Some("global") }
        else { None }
    }

    fn available(&self, backend: Backend) -> bool {
        match backend {
            Backend::Msvc       => self.msvc && self.has_crt_aligned_malloc(),
            Backend::Posix      => self.c && self.is_family("unix"),
            Backend::Memalign   => self.c && self.has_memalign(),
            Backend::Manual     => self.manual_base().is_some(),
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build/build.rs");
    println!("cargo:rerun-if-changed={PROBE_CC}");
    println!("cargo:rerun-if-changed={PROBE_POSIX}");
    println!("cargo:rerun-if-env-changed=IALIGN_BACKEND");
    println!("cargo:rerun-if-env-changed=MACOSX_DEPLOYMENT_TARGET");
    println!("cargo:rerun-if-env-changed=IALIGN_SKIP_CC");
    println!("cargo:rustc-check-cfg=cfg(ialign_backend, values(\"msvc\", \"posix\", \"memalign\", \"manual\"))");
    println!("cargo:rustc-check-cfg=cfg(ialign_manual_base, values(\"malloc\", \"global\"))");

    let target = Target::from_env();

    let backend = match env::var("IALIGN_BACKEND") {
        Ok(name) if !name.trim().is_empty() => {
            let backend = Backend::parse(&name).unwrap_or_else(|| panic!("IALIGN_BACKEND={name:?} isn't one of \"msvc\", \"posix\", \"memalign\", \"manual\""));
            if !target.available(backend) { panic!("IALIGN_BACKEND={name:?} isn't available for target_os={:?} target_env={:?} with the enabled features", target.os, target.env) }
            backend
        },
        _ => select(&target),
    };

    if backend == Backend::Manual && target.manual_base().is_none() {
        panic!("no aligned allocation back-end available for target_os={:?}: enable the `c` or `alloc` feature", target.os);
    }

    println!("cargo:rustc-cfg=ialign_backend=\"{}\"", backend.name());
    if let Some(base) = target.manual_base() {
        println!("cargo:rustc-cfg=ialign_manual_base=\"{base}\"");
    }
}

/// First match wins.
fn select(target: &Target) -> Backend {
    if target.available(Backend::Msvc) {
        Backend::Msvc
    } else if target.vendor == "apple" {
        if target.available(Backend::Posix) && macos_deployment_target_at_least(10, 6) { Backend::Posix } else { Backend::Manual }
    } else if target.os == "android" {
        if target.available(Backend::Memalign) { Backend::Memalign } else { Backend::Manual }
    } else if matches!(target.os.as_str(), "solaris" | "illumos") {
        // every SunOS release rustc targets is 5.11+, older releases need `IALIGN_BACKEND=memalign`
        if target.available(Backend::Posix) { Backend::Posix } else { Backend::Manual }
    } else if target.available(Backend::Posix) && probe_posix_memalign().unwrap_or(true) {
        Backend::Posix
    } else {
        Backend::Manual
    }
}

fn macos_deployment_target_at_least(major: u32, minor: u32) -> bool {
    let Ok(version) = env::var("MACOSX_DEPLOYMENT_TARGET") else { return true };
    let mut parts = version.trim().split('.').map(|p| p.parse::<u32>().unwrap_or(0));
    let have = (parts.next().unwrap_or(0), parts.next().unwrap_or(0));
    have >= (major, minor)
}

/// Returns [`None`] if a C compiler couldn't be used at all, or if probing was skipped (`DOCS_RS` or `IALIGN_SKIP_CC` set).
#[cfg(feature = "cc")] fn probe_posix_memalign() -> Option<bool> {
    if env::var_os("DOCS_RS").is_some() || env::var_os("IALIGN_SKIP_CC").is_some() { return None }
    if !try_compile(PROBE_CC, "ialign_probe_cc") { return None }
    Some(try_compile(PROBE_POSIX, "ialign_probe_posix_memalign"))
}

#[cfg(not(feature = "cc"))] fn probe_posix_memalign() -> Option<bool> { None }

#[cfg(feature = "cc")] fn try_compile(src: &str, libname: &str) -> bool {
    cc::Build::new()
        .file(src)
        .cargo_metadata(false)
        .warnings(false)
        .try_compile(libname)
        .is_ok()
}
