// crates/cf_physics/src/engine/solver_loop.rs

//! 主循环
//!
//! 每个时间步依次执行：
//!
//! 1. 动量求解（松弛、显式项流向投影）
//! 2. 质量流量修正（速度平移 + 体积力更新）
//! 3. 湍流模型修正
//! 4. 壁面函数评估
//! 5. 输出步写出场与剖面
//!
//! 任一步骤返回错误即终止运行，错误原样向上传递。

use super::time_control::TimeControl;
use crate::mass_flow::MassFlowCorrector;
use crate::momentum::MomentumSystem;
use crate::numerics::grad_vector;
use crate::profile::ProfileRecorder;
use crate::state::FlowState;
use crate::turbulence::{TurbulenceContext, TurbulenceModel};
use crate::wall::{WallGeometry, WallLocator};
use crate::wall_function::{WallFunctionEvaluator, WallFunctionResult};
use cf_foundation::CfResult;
use cf_mesh::{wall_distance, MeshAccess};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 运行阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    /// 已构造，尚未推进
    #[default]
    Initializing,
    /// 时间推进中
    TimeStepping,
    /// 已到达结束时间
    Finished,
}

/// 单步报告
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// 物理时间
    pub time: f64,
    /// 时间步索引
    pub time_index: usize,
    /// 修正前流向体积平均速度 `f · UbarStar`
    pub uncorrected_bulk: f64,
    /// 流向体积力 `f · gradP`
    pub pressure_gradient: f64,
    /// 近壁量
    pub wall: WallFunctionResult,
    /// 动量求解迭代次数
    pub momentum_iterations: usize,
    /// 本步是否写出
    pub wrote_output: bool,
}

/// 运行汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// 执行的时间步数
    pub steps: usize,
    /// 写出次数
    pub writes: usize,
    /// 结束时间
    pub final_time: f64,
    /// 最后一步报告
    pub last_step: Option<StepReport>,
    /// 结束时体积平均速度
    pub bulk_velocity: DVec3,
    /// 结束时体积力
    pub body_force: DVec3,
    /// 计算时间（秒）
    pub execution_time: f64,
    /// 墙钟时间（秒）
    pub clock_time: f64,
}

/// 槽道流求解主循环
pub struct SolverLoop<M: MeshAccess> {
    mesh: M,
    state: FlowState,
    geometry: WallGeometry,
    wall_distance: Vec<f64>,
    time: TimeControl,
    turbulence: Box<dyn TurbulenceModel>,
    momentum: Box<dyn MomentumSystem>,
    corrector: MassFlowCorrector,
    evaluator: WallFunctionEvaluator,
    recorder: ProfileRecorder,
    phase: RunPhase,
}

impl<M: MeshAccess> SolverLoop<M> {
    /// 组装主循环
    ///
    /// 定位壁面并用初始速度场初始化湍流量。壁面几何不合法时返回错误。
    pub fn new(
        mesh: M,
        state: FlowState,
        time: TimeControl,
        mut turbulence: Box<dyn TurbulenceModel>,
        momentum: Box<dyn MomentumSystem>,
        recorder: ProfileRecorder,
    ) -> CfResult<Self> {
        let geometry = WallLocator::locate(&mesh)?;
        let distance = wall_distance(&mesh);

        let grad = grad_vector(&mesh, &state.velocity);
        turbulence.correct(&TurbulenceContext {
            mesh: &mesh,
            velocity: &state.velocity,
            flux: &state.flux,
            grad_u: &grad,
            wall_distance: &distance,
        })?;

        let evaluator = WallFunctionEvaluator::new(state.flow_direction());
        info!("湍流模型: {}", turbulence.name());

        Ok(Self {
            mesh,
            state,
            geometry,
            wall_distance: distance,
            time,
            turbulence,
            momentum,
            corrector: MassFlowCorrector::new(),
            evaluator,
            recorder,
            phase: RunPhase::Initializing,
        })
    }

    /// 推进一个时间步，已结束时返回 `None`
    pub fn step(&mut self) -> CfResult<Option<StepReport>> {
        if self.phase == RunPhase::Finished {
            return Ok(None);
        }
        if self.phase == RunPhase::Initializing {
            info!("Starting time loop");
            self.phase = RunPhase::TimeStepping;
        }
        if !self.time.loop_step() {
            self.phase = RunPhase::Finished;
            return Ok(None);
        }
        info!("Time = {}", self.time.time_name());

        let solution = self
            .momentum
            .solve(&self.mesh, &mut self.state, self.turbulence.as_ref())?;
        let correction = self.corrector.correct(&self.mesh, &mut self.state, &solution)?;

        let grad = grad_vector(&self.mesh, &self.state.velocity);
        self.turbulence.correct(&TurbulenceContext {
            mesh: &self.mesh,
            velocity: &self.state.velocity,
            flux: &self.state.flux,
            grad_u: &grad,
            wall_distance: &self.wall_distance,
        })?;

        let f = self.state.flow_direction();
        let uncorrected_bulk = f.dot(correction.uncorrected_bulk);
        let pressure_gradient = f.dot(correction.body_force);
        info!(
            "Uncorrected Ubar = {}, pressure gradient = {}",
            uncorrected_bulk, pressure_gradient
        );

        let wall = self
            .evaluator
            .evaluate(&self.geometry, &self.state.velocity, self.turbulence.as_ref());

        let wrote_output = self.time.is_write_step();
        if wrote_output {
            self.recorder.record(
                &self.mesh,
                &self.geometry,
                &self.state,
                self.turbulence.as_ref(),
                self.time.time(),
            )?;
        }

        info!(
            "ExecutionTime = {:.2} s  ClockTime = {:.0} s",
            self.time.elapsed_execution_time(),
            self.time.elapsed_clock_time()
        );

        Ok(Some(StepReport {
            time: self.time.time(),
            time_index: self.time.time_index(),
            uncorrected_bulk,
            pressure_gradient,
            wall,
            momentum_iterations: solution.iterations,
            wrote_output,
        }))
    }

    /// 运行到结束时间
    pub fn run(&mut self) -> CfResult<RunSummary> {
        let mut steps = 0;
        let mut writes = 0;
        let mut last_step = None;
        while let Some(report) = self.step()? {
            steps += 1;
            writes += usize::from(report.wrote_output);
            last_step = Some(report);
        }
        info!("End");

        Ok(RunSummary {
            steps,
            writes,
            final_time: self.time.time(),
            last_step,
            bulk_velocity: self.state.bulk_velocity(&self.mesh),
            body_force: self.state.body_force,
            execution_time: self.time.elapsed_execution_time(),
            clock_time: self.time.elapsed_clock_time(),
        })
    }

    /// 网格
    pub fn mesh(&self) -> &M {
        &self.mesh
    }

    /// 流动状态
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// 壁面几何
    pub fn geometry(&self) -> &WallGeometry {
        &self.geometry
    }

    /// 湍流模型
    pub fn turbulence(&self) -> &dyn TurbulenceModel {
        self.turbulence.as_ref()
    }

    /// 时间控制
    pub fn time(&self) -> &TimeControl {
        &self.time
    }

    /// 当前阶段
    pub fn phase(&self) -> RunPhase {
        self.phase
    }
}
