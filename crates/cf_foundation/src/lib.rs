// crates/cf_foundation/src/lib.rs

//! ChanFlow Foundation Layer
//!
//! 基础层，提供整个项目共用的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`float`]: 数值保护常量与 Kahan 求和
//! - [`tensor`]: 基于 glam 的张量代数（对称张量、外积、偏量）
//!
//! # 示例
//!
//! ```
//! use cf_foundation::tensor::{outer, SymmTensor};
//! use glam::DVec3;
//!
//! let f = DVec3::X;
//! let mask = outer(f, f);
//! let v = mask * DVec3::new(2.0, 3.0, 4.0);
//! assert_eq!(v, DVec3::new(2.0, 0.0, 0.0));
//!
//! let s = SymmTensor::new(1.0, 2.0, 0.0, 3.0, 0.0, 4.0);
//! assert_eq!(s.inner(DVec3::X, DVec3::Y), 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;
pub mod tensor;

// 重导出常用类型
pub use error::{CfError, CfResult};
pub use float::{KahanSum, ROOT_VSMALL, SMALL};
pub use tensor::SymmTensor;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{CfError, CfResult};
    pub use crate::float::{KahanSum, ROOT_VSMALL, SMALL};
    pub use crate::tensor::{dev, outer, two_symm, SymmTensor};
    pub use glam::{DMat3, DVec3};
}
