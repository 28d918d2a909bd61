//! The built-in audit rule families (spec §4.H): layering, DDD, hexagonal.

pub mod ddd;
pub mod hexagonal;
pub mod layering;
mod support;
