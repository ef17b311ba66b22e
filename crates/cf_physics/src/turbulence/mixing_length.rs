// crates/cf_physics/src/turbulence/mixing_length.rs

//! van Driest 混合长度模型
//!
//! ```text
//! l_m = min(κ y (1 − exp(−y⁺/A⁺)), 0.09 δ)
//! ν_t = l_m² γ              (γ = sqrt(2 S:S)，欠松弛)
//! ε   = ν_t γ²
//! k   = sqrt(ν_t ε / C_μ)
//! ```
//!
//! `y⁺` 使用由各壁面面近壁单元估计的平均摩擦速度，`δ` 取最大壁面距离。
//! 壁面上 ν_t 与 k 为零。

use super::traits::{shear_rate, TurbulenceContext, TurbulenceFields, TurbulenceModel};
use crate::fields::VolField;
use cf_foundation::{CfError, CfResult, KahanSum, SymmTensor};
use cf_mesh::MeshAccess;
use serde::{Deserialize, Serialize};

/// 外层混合长度系数
const OUTER_LENGTH_COEFF: f64 = 0.09;

/// 模型参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixingLengthParams {
    /// von Karman 常数 κ
    pub kappa: f64,
    /// van Driest 阻尼常数 A⁺
    pub a_plus: f64,
    /// C_μ
    pub c_mu: f64,
    /// ν_t 松弛因子
    pub nut_relaxation: f64,
}

impl Default for MixingLengthParams {
    fn default() -> Self {
        Self {
            kappa: 0.41,
            a_plus: 26.0,
            c_mu: 0.09,
            nut_relaxation: 0.5,
        }
    }
}

/// 混合长度模型
#[derive(Debug, Clone)]
pub struct MixingLength {
    params: MixingLengthParams,
    fields: TurbulenceFields,
    u_tau: f64,
}

impl MixingLength {
    /// 创建模型
    pub fn new<M: MeshAccess + ?Sized>(mesh: &M, nu: f64, params: MixingLengthParams) -> Self {
        Self {
            params,
            fields: TurbulenceFields::new(mesh, nu),
            u_tau: 0.0,
        }
    }

    /// 模型参数
    pub fn params(&self) -> &MixingLengthParams {
        &self.params
    }

    /// 最近一次 `correct()` 使用的摩擦速度估计
    pub fn friction_velocity(&self) -> f64 {
        self.u_tau
    }

    /// 壁面面平均摩擦速度 `sqrt(<ν |ΔU_t| / d>)`
    fn estimate_friction_velocity(&self, ctx: &TurbulenceContext<'_>) -> f64 {
        let mesh = ctx.mesh;
        let mut tau = KahanSum::new();
        let mut count = 0usize;
        for (pi, patch) in mesh.patches().iter().enumerate().filter(|(_, p)| p.is_wall()) {
            for (f, &cell) in patch.face_cells.iter().enumerate() {
                let n = patch.nf(f);
                let du = ctx.velocity.internal()[cell] - ctx.velocity.boundary_value(pi, f);
                let du_t = du - n * n.dot(du);
                let d = patch.normal_distance(f, mesh.cell_center(cell));
                if d > 0.0 {
                    tau.add(self.fields.nu.boundary_value(pi, f) * du_t.length() / d);
                    count += 1;
                }
            }
        }
        if count == 0 {
            0.0
        } else {
            (tau.value() / count as f64).sqrt()
        }
    }
}

impl TurbulenceModel for MixingLength {
    fn name(&self) -> &'static str {
        "mixingLength"
    }

    fn correct(&mut self, ctx: &TurbulenceContext<'_>) -> CfResult<()> {
        let mesh = ctx.mesh;
        let MixingLengthParams {
            kappa,
            a_plus,
            c_mu,
            nut_relaxation,
        } = self.params;

        self.u_tau = self.estimate_friction_velocity(ctx);
        let delta = ctx
            .wall_distance
            .iter()
            .copied()
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);

        let n = mesh.n_cells();
        for c in 0..n {
            let y = ctx.wall_distance[c];
            let nu = self.fields.nu.internal()[c];
            let gamma = shear_rate(ctx.grad_u.internal()[c]);

            let y_plus = y * self.u_tau / nu;
            let damping = 1.0 - (-y_plus / a_plus).exp();
            let lm = (kappa * y * damping).min(OUTER_LENGTH_COEFF * delta);
            let nut_new = lm * lm * gamma;

            let nut = &mut self.fields.nut.internal_mut()[c];
            *nut = (1.0 - nut_relaxation) * *nut + nut_relaxation * nut_new;
            let nut = *nut;

            let eps = nut * gamma * gamma;
            self.fields.epsilon.internal_mut()[c] = eps;
            self.fields.k.internal_mut()[c] = (nut * eps / c_mu).sqrt();
        }

        for field in [&mut self.fields.nut, &mut self.fields.k, &mut self.fields.epsilon] {
            field.correct_boundary_conditions(mesh);
        }
        for (pi, patch) in mesh.patches().iter().enumerate() {
            if patch.is_wall() {
                self.fields.nut.fix_patch(pi, 0.0);
                self.fields.k.fix_patch(pi, 0.0);
                for (f, &cell) in patch.face_cells.iter().enumerate() {
                    let eps = self.fields.epsilon.internal()[cell];
                    self.fields.epsilon.boundary_mut(pi)[f] = eps;
                }
            }
        }

        if !self.fields.nut.is_finite() {
            return Err(CfError::solver("nut", 0, f64::NAN, "混合长度涡粘性出现非有限值"));
        }
        self.fields.update_stresses(ctx.grad_u);
        Ok(())
    }

    fn nu(&self) -> &VolField<f64> {
        &self.fields.nu
    }

    fn nut(&self) -> &VolField<f64> {
        &self.fields.nut
    }

    fn k(&self) -> &VolField<f64> {
        &self.fields.k
    }

    fn epsilon(&self) -> &VolField<f64> {
        &self.fields.epsilon
    }

    fn r(&self) -> &VolField<SymmTensor> {
        &self.fields.r
    }

    fn dev_reff(&self) -> &VolField<SymmTensor> {
        &self.fields.dev_reff
    }
}
