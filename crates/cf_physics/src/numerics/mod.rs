// crates/cf_physics/src/numerics/mod.rs

//! 数值方法

pub mod gradient;
pub mod linear_algebra;

pub use gradient::{grad_vector, wall_sn_grad};
