#![allow(non_snake_case)]

mod core;
pub use self::core::*;
mod from_dense;
mod matrix_math;
mod utils;
