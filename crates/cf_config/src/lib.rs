// crates/cf_config/src/lib.rs

//! ChanFlow Config Layer
//!
//! 算例配置，JSON 格式，所有数值均为 f64。
//!
//! # 模块概览
//!
//! - [`case_config`]: `CaseConfig` 及各分节
//! - [`builder`]: 由配置组装求解主循环
//! - [`error`]: 配置错误类型
//!
//! # 必需项
//!
//! 唯一没有默认值的配置是目标体积平均速度 `transport.ubar`，
//! 缺失时 [`CaseConfig::validate`] 返回 [`ConfigError::Missing`]。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod case_config;
pub mod error;

pub use builder::{build_mesh, SolverBuilder};
pub use case_config::{
    CaseConfig, InitialConfig, MeshConfig, MomentumConfig, OutputConfig, TimeConfig,
    TransportConfig, TurbulenceConfig, TurbulenceModelKind, WriteControl,
};
pub use error::ConfigError;
