//! Print the selected back-end and the alignment it actually delivers.

use ialign::{BACKEND, Facade, allocator::Selected, error::AllocError};

fn main() {
    println!("back-end: {BACKEND}");
    println!();
    println!("{:>10} {:>10}  {}", "align", "size", "result");

    let facade = Facade::<Selected>::default();
    for shift in [0, 3, 4, 6, 12, 16, 21, 30] {
        let align = 1usize << shift;
        for size in [0, 1, 1000] {
            match facade.try_allocate(size, align) {
                Ok(ptr) => {
                    let addr = ptr.as_ptr() as usize;
                    println!("{align:>10} {size:>10}  {addr:#018x} (trailing zeros: {})", addr.trailing_zeros());
                    // SAFETY: ✔️ `ptr` was just allocated by `facade`, and is never touched again
                    unsafe { facade.free(ptr.as_ptr().cast()) };
                },
                Err(err) => println!("{align:>10} {size:>10}  {err}"),
            }
        }
    }

    println!();
    for (size, align) in [(16, 3), (usize::MAX, 16)] {
        let err = facade.try_allocate(size, align).err();
        assert!(matches!(err, Some(AllocError::InvalidAlignment { .. } | AllocError::SizeOverflow { .. })));
        println!("allocate({size}, {align}) failed as expected: {}", err.map_or(String::new(), |e| e.to_string()));
    }
}
