#![cfg(all(target_os = "windows", feature = "win32"))]
//! [`ProcessHeap`]
//!
//! | Allocator                     | [`thin::Alloc`]       | [`thin::Free`]    |
//! | ------------------------------| ----------------------| ------------------|
//! | [`ProcessHeap`]               | [`HeapAlloc`]         | [`HeapFree`]      |
//!
//! [`HeapAlloc`]:  https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapalloc
//! [`HeapFree`]:   https://learn.microsoft.com/en-us/windows/win32/api/heapapi/nf-heapapi-heapfree

#[cfg(doc)] use crate::*;

mod process_heap;       pub use process_heap::*;

/// | Arch      | Value |
/// | ----------| -----:|
/// | i686      |  8    |
/// | x86_64    | 16    |
const MEMORY_ALLOCATION_ALIGNMENT : crate::Alignment = crate::Alignment::constant(winapi::um::winnt::MEMORY_ALLOCATION_ALIGNMENT);
