// crates/cf_mesh/src/traits.rs

//! 网格抽象接口（MeshAccess）
//!
//! 定义有限体积网格的只读访问契约。物理层只通过此 trait 操作网格，
//! 不直接依赖 [`ChannelMesh`](crate::ChannelMesh) 的具体实现。
//!
//! # 约定
//!
//! - 笛卡尔坐标，单位米
//! - 内部面面积向量从 owner 指向 neighbour
//! - 边界面法向指向计算域外
//! - 单元索引 `0..n_cells()`，内部面索引 `0..n_internal_faces()`
//! - patch 按索引顺序枚举，patch 内的面按索引顺序枚举

use crate::patch::BoundaryPatch;
use cf_foundation::KahanSum;
use glam::DVec3;

/// 网格访问接口（只读）
pub trait MeshAccess: Send + Sync {
    // ===== 基本计数 =====

    /// 单元总数
    fn n_cells(&self) -> usize;

    /// 内部面数量
    fn n_internal_faces(&self) -> usize;

    // ===== 单元几何 =====

    /// 所有单元中心
    fn cell_centers(&self) -> &[DVec3];

    /// 所有单元体积
    fn cell_volumes(&self) -> &[f64];

    /// 单元中心
    #[inline]
    fn cell_center(&self, cell: usize) -> DVec3 {
        self.cell_centers()[cell]
    }

    /// 单元体积
    #[inline]
    fn cell_volume(&self, cell: usize) -> f64 {
        self.cell_volumes()[cell]
    }

    // ===== 内部面 =====

    /// 面的 owner 单元
    fn face_owner(&self, face: usize) -> usize;

    /// 面的 neighbour 单元
    fn face_neighbour(&self, face: usize) -> usize;

    /// 面积向量（owner → neighbour）
    fn face_area_vector(&self, face: usize) -> DVec3;

    /// 面心
    fn face_center(&self, face: usize) -> DVec3;

    // ===== 边界 =====

    /// 边界 patch 列表
    fn patches(&self) -> &[BoundaryPatch];

    /// patch 数量
    #[inline]
    fn n_patches(&self) -> usize {
        self.patches().len()
    }

    // ===== 派生量 =====

    /// 总体积
    fn total_volume(&self) -> f64 {
        KahanSum::sum_iter(self.cell_volumes().iter().copied())
    }

    /// 内部面插值权重（owner 侧）
    ///
    /// `w = |n·(C_N - C_f)| / (|n·(C_f - C_P)| + |n·(C_N - C_f)|)`
    fn face_weight(&self, face: usize) -> f64 {
        let n = self.face_area_vector(face).normalize_or_zero();
        let cf = self.face_center(face);
        let d_own = n.dot(cf - self.cell_center(self.face_owner(face))).abs();
        let d_nei = n.dot(self.cell_center(self.face_neighbour(face)) - cf).abs();
        let total = d_own + d_nei;
        if total > 0.0 {
            d_nei / total
        } else {
            0.5
        }
    }

    /// owner 到 neighbour 的中心向量
    #[inline]
    fn face_delta(&self, face: usize) -> DVec3 {
        self.cell_center(self.face_neighbour(face)) - self.cell_center(self.face_owner(face))
    }
}
