// crates/cf_physics/src/engine/mod.rs

//! 求解引擎
//!
//! - `time_control` - 时间推进与输出判定
//! - `solver_loop` - 动量、质量流量修正、湍流修正、壁面评估的主循环

pub mod solver_loop;
pub mod time_control;

pub use solver_loop::{RunPhase, RunSummary, SolverLoop, StepReport};
pub use time_control::{TimeControl, WriteControl};
