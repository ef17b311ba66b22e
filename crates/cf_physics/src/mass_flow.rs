// crates/cf_physics/src/mass_flow.rs

//! 质量流量修正
//!
//! 动量求解后，流向体积平均速度 `UbarStar` 一般偏离目标 `Ubar`。
//! 修正分两步：
//!
//! ```text
//! U     += Ubar − UbarStar              (只改内部值，壁面保持零)
//! gradP += (Ubar − UbarStar) / <1/A>_V
//! ```
//!
//! 修正后流向体积平均速度精确等于目标值。

use crate::momentum::MomentumSolution;
use crate::state::FlowState;
use cf_foundation::{CfError, CfResult};
use cf_mesh::MeshAccess;
use glam::DVec3;
use tracing::trace;

/// 一次修正的结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassFlowCorrection {
    /// 修正前的流向体积平均速度 UbarStar
    pub uncorrected_bulk: DVec3,
    /// 施加的速度增量 `Ubar − UbarStar`
    pub delta: DVec3,
    /// 修正后的体积力 gradP
    pub body_force: DVec3,
}

/// 质量流量修正器
#[derive(Debug, Clone, Copy, Default)]
pub struct MassFlowCorrector;

impl MassFlowCorrector {
    /// 创建
    pub fn new() -> Self {
        Self
    }

    /// 修正速度场与体积力，并重算面通量
    pub fn correct<M: MeshAccess + ?Sized>(
        &self,
        mesh: &M,
        state: &mut FlowState,
        solution: &MomentumSolution,
    ) -> CfResult<MassFlowCorrection> {
        let volumes = mesh.cell_volumes();
        if solution.a.len() != volumes.len() {
            return Err(CfError::size_mismatch("A", volumes.len(), solution.a.len()));
        }

        let inverse_a = solution.inverse_a_average(volumes);
        if !inverse_a.is_finite() || inverse_a <= 0.0 {
            return Err(CfError::solver("gradP", 0, inverse_a, "<1/A> 非正或非有限"));
        }

        let uncorrected_bulk = state.masked_bulk_velocity(mesh);
        let delta = state.target_bulk() - uncorrected_bulk;

        state.velocity.shift_internal(delta);
        state.body_force += delta / inverse_a;
        state.update_flux(mesh);

        trace!(
            "质量流量修正: delta = {:?}, <1/A> = {:.6e}",
            delta.to_array(),
            inverse_a
        );

        Ok(MassFlowCorrection {
            uncorrected_bulk,
            delta,
            body_force: state.body_force,
        })
    }
}
