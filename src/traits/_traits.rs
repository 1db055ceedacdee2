//! Allocator traits implemented by every back-end

pub mod fat;
pub mod meta;
pub mod thin;
