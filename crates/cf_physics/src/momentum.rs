// crates/cf_physics/src/momentum.rs

//! 动量方程
//!
//! 定常一维充分发展槽道流没有对流项，动量方程为
//!
//! ```text
//! −∇·(ν_eff ∇U) − ∇·(ν_eff dev2(∇Uᵀ)) = gradP
//! ```
//!
//! 第一项隐式离散，第二项显式计算后乘以流向投影张量放入源项，
//! 横向动量不受显式项驱动。体积力同样先做流向投影，`(f⊗f)·gradP·V` 加入源项。
//!
//! 求解前欠松弛：
//!
//! ```text
//! D' = max(D, Σ|a_nb|) / α
//! b += (D' − D) U_old
//! ```
//!
//! 求解后返回每个单元的 `A = D'/V`，质量流量修正用它估计体积力增量。

use crate::numerics::grad_vector;
use crate::numerics::linear_algebra::{
    CsrBuilder, JacobiPreconditioner, PcgSolver, SolverConfig, SolverStatus,
};
use crate::state::FlowState;
use crate::turbulence::TurbulenceModel;
use cf_foundation::tensor::dev2;
use cf_foundation::{CfError, CfResult};
use cf_mesh::{MeshAccess, PatchKind};
use glam::{DMat3, DVec3};
use tracing::{debug, warn};

/// 一次动量求解的结果
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumSolution {
    /// 对角系数 `A = D/V`（松弛后）
    pub a: Vec<f64>,
    /// 三个分量中最大的迭代次数
    pub iterations: usize,
    /// 三个分量中最大的最终残差
    pub residual: f64,
}

impl MomentumSolution {
    /// `1/A` 的体积加权平均
    pub fn inverse_a_average(&self, volumes: &[f64]) -> f64 {
        let total: f64 = volumes.iter().sum();
        if total == 0.0 {
            return 0.0;
        }
        self.a
            .iter()
            .zip(volumes)
            .map(|(a, v)| v / a)
            .sum::<f64>()
            / total
    }
}

/// 动量方程组装与求解
pub trait MomentumSystem: Send {
    /// 组装、松弛并求解，结果写回 `state.velocity`
    fn solve(
        &mut self,
        mesh: &dyn MeshAccess,
        state: &mut FlowState,
        turbulence: &dyn TurbulenceModel,
    ) -> CfResult<MomentumSolution>;
}

/// 有限体积动量系统
#[derive(Debug, Clone)]
pub struct FvMomentumSystem {
    relaxation: f64,
    solver: PcgSolver,
}

impl FvMomentumSystem {
    /// 创建，`relaxation ∈ (0, 1]`
    ///
    /// 体积力修正与动量松弛耦合，`relaxation > 0.5` 时迭代可能振荡发散。
    pub fn new(relaxation: f64, config: SolverConfig) -> Self {
        if relaxation > 0.5 {
            warn!("动量松弛因子 {} 大于 0.5, 体积力修正可能不收敛", relaxation);
        }
        Self {
            relaxation,
            solver: PcgSolver::new(config),
        }
    }

    /// 松弛因子
    pub fn relaxation(&self) -> f64 {
        self.relaxation
    }
}

/// `S_f · T`
#[inline]
fn face_flux(sf: DVec3, t: DMat3) -> DVec3 {
    t.transpose() * sf
}

impl MomentumSystem for FvMomentumSystem {
    fn solve(
        &mut self,
        mesh: &dyn MeshAccess,
        state: &mut FlowState,
        turbulence: &dyn TurbulenceModel,
    ) -> CfResult<MomentumSolution> {
        let n = mesh.n_cells();
        let nu_eff = turbulence.nu_eff();
        let grad = grad_vector(mesh, &state.velocity);
        let explicit_stress = |g: DMat3, nu: f64| dev2(g.transpose()) * nu;

        let mut matrix = CsrBuilder::new_square(n);
        let mut explicit = vec![DVec3::ZERO; n];
        let mut boundary_source = vec![DVec3::ZERO; n];

        // 内部面
        for face in 0..mesh.n_internal_faces() {
            let (own, nei) = (mesh.face_owner(face), mesh.face_neighbour(face));
            let sf = mesh.face_area_vector(face);
            let nf = sf.normalize_or_zero();
            let nu_f = nu_eff.face_value(mesh, face);
            let coeff = nu_f * sf.length() / nf.dot(mesh.face_delta(face)).abs();

            matrix.add(own, own, coeff);
            matrix.add(nei, nei, coeff);
            matrix.add(own, nei, -coeff);
            matrix.add(nei, own, -coeff);

            let flux = face_flux(sf, explicit_stress(grad.face_value(mesh, face), nu_f));
            explicit[own] += flux;
            explicit[nei] -= flux;
        }

        // 边界面
        let patches = mesh.patches();
        for (pi, patch) in patches.iter().enumerate() {
            if !patch.kind.is_active() {
                continue;
            }
            for (f, &cell) in patch.face_cells.iter().enumerate() {
                let sf = patch.sf(f);
                let nu_b = nu_eff.boundary_value(pi, f);
                explicit[cell] += face_flux(sf, explicit_stress(grad.boundary_value(pi, f), nu_b));

                match patch.kind {
                    PatchKind::Wall => {
                        let d = patch.normal_distance(f, mesh.cell_center(cell));
                        let coeff = nu_b * patch.face_areas[f] / d;
                        matrix.add(cell, cell, coeff);
                        boundary_source[cell] += state.velocity.boundary_value(pi, f) * coeff;
                    }
                    PatchKind::Cyclic => {
                        let Some(partner) = patch.neighbour_patch.map(|q| &patches[q]) else {
                            continue;
                        };
                        let other = partner.face_cells[f];
                        // 自耦合（单层周期）的贡献相互抵消
                        if other == cell {
                            continue;
                        }
                        let d = patch.normal_distance(f, mesh.cell_center(cell))
                            + partner.normal_distance(f, mesh.cell_center(other));
                        let coeff = nu_b * patch.face_areas[f] / d;
                        matrix.add(cell, cell, coeff);
                        matrix.add(cell, other, -coeff);
                    }
                    _ => {}
                }
            }
        }

        let mut matrix = matrix.build();
        let volumes = mesh.cell_volumes();
        let mask = state.flow_mask();
        // 只有流向分量参与强迫
        let body_force = mask * state.body_force;
        let mut source: Vec<DVec3> = (0..n)
            .map(|c| mask * explicit[c] + body_force * volumes[c] + boundary_source[c])
            .collect();

        // 欠松弛
        let diag = matrix.extract_diagonal();
        let relaxed: Vec<f64> = (0..n)
            .map(|c| diag[c].max(matrix.off_diagonal_sum(c)) / self.relaxation)
            .collect();
        matrix.update_diagonal(|row, _| relaxed[row]);
        let old = state.velocity.internal().to_vec();
        for c in 0..n {
            source[c] += old[c] * (relaxed[c] - diag[c]);
        }

        let precond = JacobiPreconditioner::from_matrix(&matrix);
        let mut solution = old.clone();
        let mut iterations = 0;
        let mut residual: f64 = 0.0;

        for (component, label) in ["x", "y", "z"].iter().enumerate() {
            let b: Vec<f64> = source.iter().map(|s| s[component]).collect();
            let mut x: Vec<f64> = old.iter().map(|u| u[component]).collect();
            let result = self.solver.solve(&matrix, &b, &mut x, &precond);
            debug!(
                "PCG:  Solving for U{}, Initial residual = {:.6e}, Final residual = {:.6e}, No Iterations {}",
                label, result.initial_residual_norm, result.residual_norm, result.iterations
            );

            match result.status {
                SolverStatus::Converged => {}
                SolverStatus::Stagnated => {
                    warn!("U{} 求解停滞, 残差 {:.3e}", label, result.residual_norm)
                }
                SolverStatus::MaxIterationsReached => {
                    return Err(CfError::solver(
                        format!("U{}", label),
                        result.iterations,
                        result.residual_norm,
                        "达到最大迭代次数",
                    ))
                }
                SolverStatus::Diverged => {
                    return Err(CfError::solver(
                        format!("U{}", label),
                        result.iterations,
                        result.residual_norm,
                        "出现非有限值",
                    ))
                }
            }

            iterations = iterations.max(result.iterations);
            residual = residual.max(result.residual_norm);
            for (u, v) in solution.iter_mut().zip(&x) {
                u[component] = *v;
            }
        }

        state.velocity.internal_mut().copy_from_slice(&solution);
        state.velocity.correct_boundary_conditions(mesh);

        let a = relaxed.iter().zip(volumes).map(|(d, v)| d / v).collect();
        Ok(MomentumSolution {
            a,
            iterations,
            residual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turbulence::Laminar;
    use cf_mesh::ChannelMeshBuilder;

    fn setup(relaxation: f64) -> (cf_mesh::ChannelMesh, FlowState, Laminar, FvMomentumSystem) {
        let mesh = ChannelMeshBuilder::new().cells(4).height(2.0).build().unwrap();
        let state = FlowState::new(&mesh, DVec3::X, DVec3::ZERO, DVec3::X).unwrap();
        let model = Laminar::new(&mesh, 1.0);
        let system = FvMomentumSystem::new(relaxation, SolverConfig::new(1e-14, 100));
        (mesh, state, model, system)
    }

    #[test]
    fn test_unrelaxed_solve_matches_discrete_poiseuille() {
        let (mesh, mut state, model, mut system) = setup(1.0);
        let sol = system.solve(&mesh, &mut state, &model).unwrap();

        let u = state.velocity.internal();
        assert!((u[0].x - 0.25).abs() < 1e-10);
        assert!((u[1].x - 0.5).abs() < 1e-10);
        assert!((u[2].x - 0.5).abs() < 1e-10);
        assert!((u[3].x - 0.25).abs() < 1e-10);
        assert!(u.iter().all(|v| v.y.abs() < 1e-14 && v.z.abs() < 1e-14));
        assert!(sol.iterations <= 8);
    }

    #[test]
    fn test_transverse_body_force_is_not_applied() {
        let mesh = ChannelMeshBuilder::new().cells(4).height(2.0).build().unwrap();
        let mut state =
            FlowState::new(&mesh, DVec3::X, DVec3::ZERO, DVec3::new(1.0, 0.3, 0.05)).unwrap();
        let model = Laminar::new(&mesh, 1.0);
        let mut system = FvMomentumSystem::new(1.0, SolverConfig::new(1e-14, 100));
        system.solve(&mesh, &mut state, &model).unwrap();

        let u = state.velocity.internal();
        assert!((u[0].x - 0.25).abs() < 1e-10);
        assert!((u[1].x - 0.5).abs() < 1e-10);
        assert!(u.iter().all(|v| v.y.abs() < 1e-14 && v.z.abs() < 1e-14));
    }

    #[test]
    fn test_relaxed_diagonal_coefficient() {
        let (mesh, mut state, model, mut system) = setup(0.5);
        let sol = system.solve(&mesh, &mut state, &model).unwrap();
        // 壁面单元 D = 2 + 4，内部单元 D = 2 + 2，V = 0.5
        assert!((sol.a[0] - 24.0).abs() < 1e-12);
        assert!((sol.a[1] - 16.0).abs() < 1e-12);
        let expected = (0.5 / 24.0 * 2.0 + 0.5 / 16.0 * 2.0) / 2.0;
        assert!((sol.inverse_a_average(mesh.cell_volumes()) - expected).abs() < 1e-14);
    }

    #[test]
    fn test_wall_values_untouched_by_solve() {
        let (mesh, mut state, model, mut system) = setup(0.7);
        system.solve(&mesh, &mut state, &model).unwrap();
        assert_eq!(state.velocity.boundary_value(0, 0), DVec3::ZERO);
        assert_eq!(state.velocity.boundary_value(1, 0), DVec3::ZERO);
    }

    #[test]
    fn test_iteration_limit_is_an_error() {
        let (mesh, mut state, model, _) = setup(1.0);
        let mut system = FvMomentumSystem::new(1.0, SolverConfig::new(1e-30, 1));
        let err = system.solve(&mesh, &mut state, &model).unwrap_err();
        assert!(matches!(err, CfError::Solver { .. }));
    }
}
