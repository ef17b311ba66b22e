// crates/cf_physics/src/wall_function.rs

//! 壁面函数评估
//!
//! 在代表性壁面面及其相邻单元上计算无量纲近壁量：
//!
//! ```text
//! τ_w  = f · devReff_w · n
//! u_τ  = sqrt|τ_w|
//! y⁺   = u_τ y / (ν + ε)
//! u⁺   = |U_P − U_w| / (u_τ + ε)
//! ν_t⁺ = ν_t / ν
//! k⁺   = k / (u_τ² + ε)
//! ε⁺   = ε_P ν / (u_τ⁴ + ε)
//! Re   = |U_P − U_w| y / ν
//! ```
//!
//! `ε = ROOT_VSMALL` 只用于避免除零。ν、ν_t、devReff 取壁面面上的值，
//! k、ε_P 取相邻单元值。

use crate::fields::VolField;
use crate::turbulence::TurbulenceModel;
use crate::wall::{WallGeometry, WallSample};
use cf_foundation::{SymmTensor, ROOT_VSMALL};
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 代表面上的湍流量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurbulenceSample {
    /// 壁面 ν
    pub nu: f64,
    /// 壁面 ν_t
    pub nut: f64,
    /// 近壁单元 k
    pub k: f64,
    /// 近壁单元 ε
    pub epsilon: f64,
    /// 壁面 devReff
    pub wall_stress: SymmTensor,
}

impl TurbulenceSample {
    /// 从湍流模型取样
    pub fn gather(turbulence: &dyn TurbulenceModel, sample: &WallSample) -> Self {
        let (p, f, c) = (sample.patch_index, sample.face_index, sample.cell_index);
        Self {
            nu: turbulence.nu().boundary_value(p, f),
            nut: turbulence.nut().boundary_value(p, f),
            k: turbulence.k().internal()[c],
            epsilon: turbulence.epsilon().internal()[c],
            wall_stress: turbulence.dev_reff().boundary_value(p, f),
        }
    }
}

/// 近壁无量纲量
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallFunctionResult {
    /// 近壁单元雷诺数 Rey
    pub reynolds: f64,
    /// 摩擦速度 u_τ
    pub friction_velocity: f64,
    /// ν_t⁺
    pub nut_plus: f64,
    /// y⁺
    pub y_plus: f64,
    /// u⁺
    pub u_plus: f64,
    /// k⁺
    pub k_plus: f64,
    /// ε⁺
    pub epsilon_plus: f64,
}

impl WallFunctionResult {
    /// 所有量是否有限
    pub fn is_finite(&self) -> bool {
        [
            self.reynolds,
            self.friction_velocity,
            self.nut_plus,
            self.y_plus,
            self.u_plus,
            self.k_plus,
            self.epsilon_plus,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// 壁面函数评估器
#[derive(Debug, Clone, Copy)]
pub struct WallFunctionEvaluator {
    flow_direction: DVec3,
}

impl WallFunctionEvaluator {
    /// 以单位流向创建
    pub fn new(flow_direction: DVec3) -> Self {
        Self { flow_direction }
    }

    /// 由取样值计算
    ///
    /// `mag_up` 为近壁单元相对壁面的速度大小，`y` 为单元中心到壁面距离，
    /// `normal` 为指向流体的壁面法向。
    pub fn compute(
        &self,
        sample: &TurbulenceSample,
        mag_up: f64,
        y: f64,
        normal: DVec3,
    ) -> WallFunctionResult {
        let TurbulenceSample {
            nu,
            nut,
            k,
            epsilon,
            wall_stress,
        } = *sample;

        let tau_w = wall_stress.inner(self.flow_direction, normal);
        let u_tau = tau_w.abs().sqrt();
        let u_tau2 = u_tau * u_tau;

        WallFunctionResult {
            reynolds: mag_up * y / nu,
            friction_velocity: u_tau,
            nut_plus: nut / nu,
            y_plus: u_tau * y / (nu + ROOT_VSMALL),
            u_plus: mag_up / (u_tau + ROOT_VSMALL),
            k_plus: k / (u_tau2 + ROOT_VSMALL),
            epsilon_plus: epsilon * nu / (u_tau2 * u_tau2 + ROOT_VSMALL),
        }
    }

    /// 在代表面上评估并输出日志
    pub fn evaluate(
        &self,
        geometry: &WallGeometry,
        velocity: &VolField<DVec3>,
        turbulence: &dyn TurbulenceModel,
    ) -> WallFunctionResult {
        let s = &geometry.sample;
        let up = velocity.internal()[s.cell_index] - velocity.boundary_value(s.patch_index, s.face_index);
        let sample = TurbulenceSample::gather(turbulence, s);
        let result = self.compute(&sample, up.length(), geometry.first_cell_height(), s.normal);

        info!(
            "Rey = {}, uTau = {}, nut+ = {}, y+ = {}, u+ = {}, k+ = {}, epsilon+ = {}",
            result.reynolds,
            result.friction_velocity,
            result.nut_plus,
            result.y_plus,
            result.u_plus,
            result.k_plus,
            result.epsilon_plus
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turbulence::Laminar;
    use crate::wall::WallLocator;
    use cf_mesh::{ChannelMeshBuilder, MeshAccess};

    fn sample(nu: f64, shear: f64) -> TurbulenceSample {
        TurbulenceSample {
            nu,
            nut: 0.5,
            k: 3.0,
            epsilon: 4.0,
            wall_stress: SymmTensor::new(0.0, shear, 0.0, 0.0, 0.0, 0.0),
        }
    }

    #[test]
    fn test_unit_scales() {
        let eval = WallFunctionEvaluator::new(DVec3::X);
        let r = eval.compute(&sample(1.0, -1.0), 2.0, 1.0, DVec3::Y);
        assert!((r.friction_velocity - 1.0).abs() < 1e-15);
        assert!((r.y_plus - 1.0).abs() < 1e-15);
        assert!((r.u_plus - 2.0).abs() < 1e-15);
        assert!((r.reynolds - 2.0).abs() < 1e-15);
        assert!((r.nut_plus - 0.5).abs() < 1e-15);
        assert!((r.k_plus - 3.0).abs() < 1e-15);
        assert!((r.epsilon_plus - 4.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_shear_stays_finite() {
        let eval = WallFunctionEvaluator::new(DVec3::X);
        let r = eval.compute(&sample(1e-5, 0.0), 0.1, 0.01, DVec3::Y);
        assert_eq!(r.friction_velocity, 0.0);
        assert_eq!(r.y_plus, 0.0);
        assert!(r.is_finite());
        assert!(r.u_plus > 1e140);
    }

    #[test]
    fn test_vanishing_viscosity_keeps_y_plus_bounded() {
        let eval = WallFunctionEvaluator::new(DVec3::X);
        let (u_tau, y) = (0.5, 0.01);
        for nu in [1e-3, 1e-12, 1e-200, 0.0] {
            let r = eval.compute(&sample(nu, -u_tau * u_tau), 1.0, y, DVec3::Y);
            assert!(r.y_plus.is_finite());
            assert!(r.y_plus <= u_tau * y / ROOT_VSMALL);
        }
    }

    #[test]
    fn test_shear_projected_on_flow_and_normal() {
        // 只有 yz 分量时流向 x 上没有壁面剪应力
        let mut s = sample(1.0, 0.0);
        s.wall_stress = SymmTensor::new(0.0, 0.0, 0.0, 0.0, 9.0, 0.0);
        let r = WallFunctionEvaluator::new(DVec3::X).compute(&s, 1.0, 1.0, DVec3::Y);
        assert_eq!(r.friction_velocity, 0.0);
        let r = WallFunctionEvaluator::new(DVec3::Z).compute(&s, 1.0, 1.0, DVec3::Y);
        assert!((r.friction_velocity - 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_laminar_linear_profile_gives_u_plus_equal_y_plus() {
        let mesh = ChannelMeshBuilder::new().cells(10).height(2.0).build().unwrap();
        let geometry = WallLocator::locate(&mesh).unwrap();

        // 近壁为线性剖面 u = 2y
        let internal = mesh.cell_centers().iter().map(|c| DVec3::new(2.0 * c.y, 0.0, 0.0)).collect();
        let mut u = VolField::from_internal("U", &mesh, internal).unwrap();
        u.fix_patch(0, DVec3::ZERO);
        u.fix_patch(1, DVec3::new(4.0, 0.0, 0.0));
        u.correct_boundary_conditions(&mesh);

        let mut model = Laminar::new(&mesh, 0.01);
        let grad = crate::numerics::grad_vector(&mesh, &u);
        let flux = crate::fields::FaceFlux::from_velocity(&mesh, &u);
        let distance = cf_mesh::wall_distance(&mesh);
        model
            .correct(&crate::turbulence::TurbulenceContext {
                mesh: &mesh,
                velocity: &u,
                flux: &flux,
                grad_u: &grad,
                wall_distance: &distance,
            })
            .unwrap();

        let r = WallFunctionEvaluator::new(DVec3::X).evaluate(&geometry, &u, &model);
        // τ_w = ν du/dy = 0.02
        assert!((r.friction_velocity - 0.02f64.sqrt()).abs() < 1e-12);
        assert!((r.u_plus - r.y_plus).abs() < 1e-9 * r.y_plus);
        assert_eq!(r.nut_plus, 0.0);
    }
}
