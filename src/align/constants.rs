#![allow(non_upper_case_globals)] // "KiB", "MiB", "GiB"

use crate::Alignment;



macro_rules! constants {
    ( $($id:ident = $value:expr),* $(,)? ) => {$(
        #[doc(hidden)] pub const $id : Alignment = Alignment::constant($value);
    )*};
}

constants! { // 16+-bit
    ALIGN_1 = 1, ALIGN_2 = 2, ALIGN_4 = 4, ALIGN_8 = 8, ALIGN_16 = 16, ALIGN_32 = 32, ALIGN_64 = 64, ALIGN_128 = 128,
    ALIGN_256 = 256, ALIGN_512 = 512, ALIGN_1024 = 1024, ALIGN_2048 = 2048, ALIGN_4096 = 4096, ALIGN_8192 = 8192,
    ALIGN_1_KiB = 1 << 10, ALIGN_2_KiB = 2 << 10, ALIGN_4_KiB = 4 << 10, ALIGN_8_KiB = 8 << 10, ALIGN_16_KiB = 16 << 10,
}

#[cfg(not(target_pointer_width = "16"))] constants! { // 32+ bit
    ALIGN_32_KiB = 32 << 10, ALIGN_64_KiB = 64 << 10, ALIGN_128_KiB = 128 << 10, ALIGN_256_KiB = 256 << 10,
    ALIGN_512_KiB = 512 << 10, ALIGN_1024_KiB = 1024 << 10, ALIGN_2048_KiB = 2048 << 10, ALIGN_4096_KiB = 4096 << 10, ALIGN_8192_KiB = 8192 << 10,
    ALIGN_1_MiB = 1 << 20, ALIGN_2_MiB = 2 << 20, ALIGN_4_MiB = 4 << 20, ALIGN_16_MiB = 16 << 20,
    ALIGN_64_MiB = 64 << 20, ALIGN_256_MiB = 256 << 20, ALIGN_1024_MiB = 1024 << 20, ALIGN_2048_MiB = 2048 << 20,
    ALIGN_1_GiB = 1 << 30, ALIGN_2_GiB = 2 << 30, // 4+ GiB overflows
}
