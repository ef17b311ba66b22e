// crates/cf_physics/src/lib.rs

//! ChanFlow 物理层
//!
//! 定常周期槽道流求解：在湍流封闭下求解不可压动量方程，
//! 通过动态调整体积力（压力梯度）保持给定的体积平均流量，
//! 并用壁面函数尺度 (y+, u+, nut+, k+, epsilon+) 评估近壁行为。
//!
//! # 模块
//!
//! - [`fields`]: 单元场与面通量
//! - [`state`]: 流动状态 [`FlowState`]
//! - [`wall`]: 壁面几何定位 [`WallLocator`]
//! - [`numerics`]: Green-Gauss 梯度、CSR 矩阵与 PCG 求解器
//! - [`momentum`]: 动量方程组装与求解 [`MomentumSystem`]
//! - [`turbulence`]: 湍流模型接口 [`TurbulenceModel`] 及实现
//! - [`mass_flow`]: 质量流量修正 [`MassFlowCorrector`]
//! - [`wall_function`]: 壁面函数评估 [`WallFunctionEvaluator`]
//! - [`profile`]: 剖面输出 [`ProfileRecorder`]
//! - [`engine`]: 时间控制与主循环 [`SolverLoop`]
//!
//! # 特性开关
//!
//! - `parallel`: 体积加权平均与 SpMV 使用 `rayon`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod fields;
pub mod mass_flow;
pub mod momentum;
pub mod numerics;
pub mod profile;
pub mod state;
pub mod turbulence;
pub mod wall;
pub mod wall_function;

pub use engine::{RunPhase, RunSummary, SolverLoop, StepReport, TimeControl, WriteControl};
pub use fields::{FaceFlux, FieldValue, VolField};
pub use mass_flow::{MassFlowCorrection, MassFlowCorrector};
pub use momentum::{FvMomentumSystem, MomentumSolution, MomentumSystem};
pub use profile::{ProfileRecorder, PROFILE_NAMES};
pub use state::FlowState;
pub use turbulence::{
    Laminar, MixingLength, MixingLengthParams, TurbulenceContext, TurbulenceModel,
};
pub use wall::{SamplingLine, WallGeometry, WallLocator, WallLocatorError, WallSample};
pub use wall_function::{TurbulenceSample, WallFunctionEvaluator, WallFunctionResult};
