// crates/cf_physics/src/turbulence/mod.rs

//! 湍流模型
//!
//! 求解主循环只通过 [`TurbulenceModel`] 访问湍流封闭：
//! 运动粘度、涡粘性、湍动能、耗散率、有效应力和雷诺应力。
//!
//! - [`Laminar`]: 层流，涡粘性为零
//! - [`MixingLength`]: van Driest 阻尼的 Prandtl 混合长度模型

pub mod laminar;
pub mod mixing_length;
pub mod traits;

pub use laminar::Laminar;
pub use mixing_length::{MixingLength, MixingLengthParams};
pub use traits::{shear_rate, TurbulenceContext, TurbulenceFields, TurbulenceModel};
