// crates/cf_mesh/src/geometry.rs

//! 几何辅助：壁面距离

use crate::traits::MeshAccess;

/// 每个单元到最近壁面面的法向距离
///
/// 壁面假定为平面，距离取 `|n_w · (C - C_w)|` 在所有壁面面上的最小值。
/// 没有壁面时返回 `f64::INFINITY`。
pub fn wall_distance<M: MeshAccess + ?Sized>(mesh: &M) -> Vec<f64> {
    let walls: Vec<_> = mesh
        .patches()
        .iter()
        .filter(|p| p.is_wall())
        .flat_map(|p| (0..p.n_faces()).map(move |f| (p.face_centers[f], p.nf(f))))
        .collect();

    mesh.cell_centers()
        .iter()
        .map(|&c| {
            walls
                .iter()
                .map(|&(cf, nf)| nf.dot(c - cf).abs())
                .fold(f64::INFINITY, f64::min)
        })
        .collect()
}

/// 最大壁面距离（槽道半高的估计）
pub fn max_wall_distance<M: MeshAccess + ?Sized>(mesh: &M) -> f64 {
    wall_distance(mesh)
        .into_iter()
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max)
}
