// crates/cf_physics/src/turbulence/traits.rs

//! 湍流模型接口
//!
//! # 应力约定
//!
//! ```text
//! devReff = −ν_eff dev(∇U + ∇Uᵀ)
//! R       = ⅔ k I − ν_t dev(∇U + ∇Uᵀ)
//! ```
//!
//! 壁面上 `devReff` 的边界值即壁面剪应力张量。

use crate::fields::{FaceFlux, VolField};
use cf_foundation::tensor::{dev, double_dot, two_symm};
use cf_foundation::{CfResult, SymmTensor};
use cf_mesh::MeshAccess;
use glam::{DMat3, DVec3};

/// 剪切率 `sqrt(2 S:S)`，`S = symm(G)`
#[inline]
pub fn shear_rate(g: DMat3) -> f64 {
    let t = two_symm(g);
    (0.5 * double_dot(t, t)).sqrt()
}

/// `correct()` 所需的流场信息
pub struct TurbulenceContext<'a> {
    /// 网格
    pub mesh: &'a dyn MeshAccess,
    /// 速度场
    pub velocity: &'a VolField<DVec3>,
    /// 面通量
    pub flux: &'a FaceFlux,
    /// 速度梯度（含边界值）
    pub grad_u: &'a VolField<DMat3>,
    /// 单元到最近壁面的距离
    pub wall_distance: &'a [f64],
}

/// 湍流模型
pub trait TurbulenceModel: Send {
    /// 模型名称
    fn name(&self) -> &'static str;

    /// 用当前速度场推进模型状态
    fn correct(&mut self, ctx: &TurbulenceContext<'_>) -> CfResult<()>;

    /// 运动粘度 ν
    fn nu(&self) -> &VolField<f64>;

    /// 涡粘性 ν_t
    fn nut(&self) -> &VolField<f64>;

    /// 湍动能 k
    fn k(&self) -> &VolField<f64>;

    /// 耗散率 ε
    fn epsilon(&self) -> &VolField<f64>;

    /// 雷诺应力 R
    fn r(&self) -> &VolField<SymmTensor>;

    /// 有效偏应力 devReff
    fn dev_reff(&self) -> &VolField<SymmTensor>;

    /// 有效粘度 ν + ν_t
    fn nu_eff(&self) -> VolField<f64> {
        self.nu().zip_map(self.nut(), "nuEff", |nu, nut| nu + nut)
    }
}

/// 各模型共用的场存储
#[derive(Debug, Clone)]
pub struct TurbulenceFields {
    /// ν
    pub nu: VolField<f64>,
    /// ν_t
    pub nut: VolField<f64>,
    /// k
    pub k: VolField<f64>,
    /// ε
    pub epsilon: VolField<f64>,
    /// R
    pub r: VolField<SymmTensor>,
    /// devReff
    pub dev_reff: VolField<SymmTensor>,
}

impl TurbulenceFields {
    /// 均匀粘度、零湍流量
    pub fn new<M: MeshAccess + ?Sized>(mesh: &M, nu: f64) -> Self {
        Self {
            nu: VolField::uniform("nu", mesh, nu),
            nut: VolField::uniform("nut", mesh, 0.0),
            k: VolField::uniform("k", mesh, 0.0),
            epsilon: VolField::uniform("epsilon", mesh, 0.0),
            r: VolField::uniform("R", mesh, SymmTensor::ZERO),
            dev_reff: VolField::uniform("devReff", mesh, SymmTensor::ZERO),
        }
    }

    /// 由速度梯度重算 devReff 与 R
    pub fn update_stresses(&mut self, grad_u: &VolField<DMat3>) {
        let strain = grad_u.map("devTwoSymm", |g| SymmTensor::from_mat(dev(two_symm(g))));
        let nu_eff = self.nu.zip_map(&self.nut, "nuEff", |nu, nut| nu + nut);

        self.dev_reff = strain.zip_map(&nu_eff, "devReff", |s, nu_eff| s * -nu_eff);
        self.r = strain
            .zip_map(&self.nut, "R", |s, nut| s * -nut)
            .zip_map(&self.k, "R", |r, k| r + SymmTensor::sphere(2.0 * k / 3.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_foundation::tensor::outer;

    #[test]
    fn test_shear_rate_of_simple_shear() {
        // u = 2 y
        let g = outer(DVec3::Y, DVec3::X) * 2.0;
        assert!((shear_rate(g) - 2.0).abs() < 1e-14);
    }

    #[test]
    fn test_stress_signs_in_simple_shear() {
        let mesh = cf_mesh::ChannelMeshBuilder::new().cells(2).build().unwrap();
        let mut fields = TurbulenceFields::new(&mesh, 0.1);
        fields.nut = VolField::uniform("nut", &mesh, 0.4);
        fields.k = VolField::uniform("k", &mesh, 3.0);
        let grad = VolField::uniform("grad(U)", &mesh, outer(DVec3::Y, DVec3::X));
        fields.update_stresses(&grad);

        let d = fields.dev_reff.internal()[0];
        assert!((d.xy + 0.5).abs() < 1e-14);
        let r = fields.r.internal()[0];
        assert!((r.xy + 0.4).abs() < 1e-14);
        assert!((r.xx - 2.0).abs() < 1e-14);
    }
}
