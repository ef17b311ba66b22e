// crates/cf_physics/src/numerics/gradient.rs

//! Green-Gauss 速度梯度
//!
//! 使用 Green 定理将体积分转化为面积分:
//! `∇U ≈ (1/V) Σ_f S_f ⊗ U_f`
//!
//! 张量约定 `G_ij = ∂u_j/∂x_i`。`Empty` patch 不参与求和。
//!
//! 边界梯度：壁面（固定值）用面法向梯度修正
//! `G_b = G_P + n ⊗ (snGrad(U) − n·G_P)`，
//! 其余 patch 按 [`VolField::correct_boundary_conditions`] 的约定取值。

use crate::fields::VolField;
use cf_foundation::tensor::outer;
use cf_mesh::MeshAccess;
use glam::{DMat3, DVec3};

/// 壁面面法向梯度 `(U_w - U_P) / d`
///
/// `d` 为单元中心到面的法向距离，沿外法向为正。
#[inline]
pub fn wall_sn_grad(u_wall: DVec3, u_cell: DVec3, distance: f64) -> DVec3 {
    (u_wall - u_cell) / distance
}

/// 矢量场的 Green-Gauss 梯度
pub fn grad_vector<M: MeshAccess + ?Sized>(mesh: &M, field: &VolField<DVec3>) -> VolField<DMat3> {
    let n = mesh.n_cells();
    let mut sum = vec![DMat3::ZERO; n];

    for face in 0..mesh.n_internal_faces() {
        let flux = outer(mesh.face_area_vector(face), field.face_value(mesh, face));
        sum[mesh.face_owner(face)] += flux;
        sum[mesh.face_neighbour(face)] -= flux;
    }

    for (pi, patch) in mesh.patches().iter().enumerate() {
        if !patch.kind.is_active() {
            continue;
        }
        for (f, &cell) in patch.face_cells.iter().enumerate() {
            sum[cell] += outer(patch.sf(f), field.boundary_value(pi, f));
        }
    }

    let internal: Vec<DMat3> = sum
        .into_iter()
        .zip(mesh.cell_volumes())
        .map(|(s, &v)| s * (1.0 / v))
        .collect();

    let mut grad = VolField::uniform("grad(U)", mesh, DMat3::ZERO);
    grad.internal_mut().copy_from_slice(&internal);
    grad.correct_boundary_conditions(mesh);

    for (pi, patch) in mesh.patches().iter().enumerate() {
        if !patch.is_wall() {
            continue;
        }
        for (f, &cell) in patch.face_cells.iter().enumerate() {
            let nf = patch.nf(f);
            let gp = internal[cell];
            let d = patch.normal_distance(f, mesh.cell_center(cell));
            let sn = wall_sn_grad(field.boundary_value(pi, f), field.internal()[cell], d);
            // n·G = Gᵀ n
            let n_dot_g = gp.transpose() * nf;
            grad.boundary_mut(pi)[f] = gp + outer(nf, sn - n_dot_g);
        }
    }

    grad
}
