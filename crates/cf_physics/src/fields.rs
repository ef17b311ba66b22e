// crates/cf_physics/src/fields.rs

//! 单元中心场与面通量
//!
//! [`VolField`] 保存内部单元值与每个 patch 的边界面值，
//! 边界值在 patch 内按面索引排列。
//!
//! # 边界修正约定
//!
//! [`VolField::correct_boundary_conditions`] 只更新非壁面 patch：
//!
//! | patch | 边界值 |
//! |---|---|
//! | `Cyclic` | 本侧与配对侧单元值的平均 |
//! | `Symmetry` | 单元值去掉镜像反对称部分 |
//! | `Empty` / `Patch` | 单元值（零梯度） |
//!
//! 壁面值是固定值，由调用方设置后保持不变。

use cf_foundation::tensor::outer;
use cf_foundation::{CfError, CfResult, KahanSum, SymmTensor};
use cf_io::FieldSnapshot;
use cf_mesh::{MeshAccess, PatchKind};
use glam::{DMat3, DVec3};
use std::ops::{Add, Mul};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// 可存入单元场的值类型
pub trait FieldValue:
    Copy + Add<Output = Self> + Mul<f64, Output = Self> + Send + Sync + 'static
{
    /// 零值
    const ZERO: Self;

    /// 分量数
    const N_COMPONENTS: usize;

    /// 分量展开（输出顺序）
    fn components(&self) -> Vec<f64>;

    /// 关于法向为 `n` 的平面的镜像
    fn mirror(self, n: DVec3) -> Self;

    /// 所有分量是否有限
    fn is_finite_value(&self) -> bool {
        self.components().iter().all(|v| v.is_finite())
    }
}

impl FieldValue for f64 {
    const ZERO: Self = 0.0;
    const N_COMPONENTS: usize = 1;

    fn components(&self) -> Vec<f64> {
        vec![*self]
    }

    fn mirror(self, _n: DVec3) -> Self {
        self
    }
}

impl FieldValue for DVec3 {
    const ZERO: Self = DVec3::ZERO;
    const N_COMPONENTS: usize = 3;

    fn components(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    fn mirror(self, n: DVec3) -> Self {
        self - n * (2.0 * n.dot(self))
    }
}

/// 反射矩阵 `I - 2 n n`
#[inline]
fn reflection(n: DVec3) -> DMat3 {
    DMat3::IDENTITY - outer(n, n) * 2.0
}

impl FieldValue for SymmTensor {
    const ZERO: Self = SymmTensor::ZERO;
    const N_COMPONENTS: usize = 6;

    fn components(&self) -> Vec<f64> {
        self.to_array().to_vec()
    }

    fn mirror(self, n: DVec3) -> Self {
        let r = reflection(n);
        SymmTensor::from_mat(r * self.to_mat() * r)
    }
}

impl FieldValue for DMat3 {
    const ZERO: Self = DMat3::ZERO;
    const N_COMPONENTS: usize = 9;

    // 行优先 (xx xy xz yx ...)
    fn components(&self) -> Vec<f64> {
        self.transpose().to_cols_array().to_vec()
    }

    fn mirror(self, n: DVec3) -> Self {
        let r = reflection(n);
        r * self * r
    }
}

// ============================================================
// VolField
// ============================================================

/// 单元中心场
#[derive(Debug, Clone, PartialEq)]
pub struct VolField<T> {
    name: String,
    internal: Vec<T>,
    boundary: Vec<Vec<T>>,
}

impl<T: FieldValue> VolField<T> {
    /// 均匀场（边界值同为 `value`）
    pub fn uniform<M: MeshAccess + ?Sized>(name: impl Into<String>, mesh: &M, value: T) -> Self {
        Self {
            name: name.into(),
            internal: vec![value; mesh.n_cells()],
            boundary: mesh.patches().iter().map(|p| vec![value; p.n_faces()]).collect(),
        }
    }

    /// 由内部值构建，边界取相邻单元值
    pub fn from_internal<M: MeshAccess + ?Sized>(
        name: impl Into<String>,
        mesh: &M,
        internal: Vec<T>,
    ) -> CfResult<Self> {
        if internal.len() != mesh.n_cells() {
            return Err(CfError::size_mismatch("VolField.internal", mesh.n_cells(), internal.len()));
        }
        let boundary = mesh
            .patches()
            .iter()
            .map(|p| p.face_cells.iter().map(|&c| internal[c]).collect())
            .collect();
        Ok(Self {
            name: name.into(),
            internal,
            boundary,
        })
    }

    /// 场名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 单元数
    #[inline]
    pub fn n_cells(&self) -> usize {
        self.internal.len()
    }

    /// 内部值
    #[inline]
    pub fn internal(&self) -> &[T] {
        &self.internal
    }

    /// 内部值（可变）
    #[inline]
    pub fn internal_mut(&mut self) -> &mut [T] {
        &mut self.internal
    }

    /// patch 边界值
    #[inline]
    pub fn boundary(&self, patch: usize) -> &[T] {
        &self.boundary[patch]
    }

    /// patch 边界值（可变）
    #[inline]
    pub fn boundary_mut(&mut self, patch: usize) -> &mut [T] {
        &mut self.boundary[patch]
    }

    /// 单个边界面的值
    #[inline]
    pub fn boundary_value(&self, patch: usize, face: usize) -> T {
        self.boundary[patch][face]
    }

    /// 将一个 patch 的边界值全部设为 `value`
    pub fn fix_patch(&mut self, patch: usize, value: T) {
        self.boundary[patch].iter_mut().for_each(|v| *v = value);
    }

    /// 内部面插值
    #[inline]
    pub fn face_value<M: MeshAccess + ?Sized>(&self, mesh: &M, face: usize) -> T {
        let w = mesh.face_weight(face);
        self.internal[mesh.face_owner(face)] * w + self.internal[mesh.face_neighbour(face)] * (1.0 - w)
    }

    /// 内部值均匀平移（边界值不变）
    pub fn shift_internal(&mut self, delta: T) {
        self.internal.iter_mut().for_each(|v| *v = *v + delta);
    }

    /// 逐值变换（内部与边界）
    pub fn map<U: FieldValue>(&self, name: impl Into<String>, f: impl Fn(T) -> U) -> VolField<U> {
        VolField {
            name: name.into(),
            internal: self.internal.iter().map(|&v| f(v)).collect(),
            boundary: self
                .boundary
                .iter()
                .map(|b| b.iter().map(|&v| f(v)).collect())
                .collect(),
        }
    }

    /// 与另一个同构场逐值组合
    pub fn zip_map<U: FieldValue, R: FieldValue>(
        &self,
        other: &VolField<U>,
        name: impl Into<String>,
        f: impl Fn(T, U) -> R,
    ) -> VolField<R> {
        debug_assert_eq!(self.internal.len(), other.internal.len());
        VolField {
            name: name.into(),
            internal: self
                .internal
                .iter()
                .zip(&other.internal)
                .map(|(&a, &b)| f(a, b))
                .collect(),
            boundary: self
                .boundary
                .iter()
                .zip(&other.boundary)
                .map(|(pa, pb)| pa.iter().zip(pb).map(|(&a, &b)| f(a, b)).collect())
                .collect(),
        }
    }

    /// 体积加权平均（只计内部值）
    ///
    /// 权重总和为零时返回零值。
    pub fn weighted_average(&self, weights: &[f64]) -> T {
        debug_assert_eq!(self.internal.len(), weights.len(), "权重长度必须等于单元数");
        let total = KahanSum::sum_iter(weights.iter().copied());
        if total == 0.0 {
            return T::ZERO;
        }
        self.weighted_sum(weights) * (1.0 / total)
    }

    #[cfg(not(feature = "parallel"))]
    fn weighted_sum(&self, weights: &[f64]) -> T {
        self.internal
            .iter()
            .zip(weights)
            .fold(T::ZERO, |acc, (&v, &w)| acc + v * w)
    }

    #[cfg(feature = "parallel")]
    fn weighted_sum(&self, weights: &[f64]) -> T {
        self.internal
            .par_iter()
            .zip(weights.par_iter())
            .map(|(&v, &w)| v * w)
            .reduce(|| T::ZERO, |a, b| a + b)
    }

    /// 更新非壁面 patch 的边界值
    pub fn correct_boundary_conditions<M: MeshAccess + ?Sized>(&mut self, mesh: &M) {
        for (pi, patch) in mesh.patches().iter().enumerate() {
            match patch.kind {
                PatchKind::Wall => {}
                PatchKind::Cyclic => {
                    let partner = patch.neighbour_patch.map(|q| &mesh.patches()[q]);
                    for (f, &cell) in patch.face_cells.iter().enumerate() {
                        let own = self.internal[cell];
                        self.boundary[pi][f] = match partner {
                            Some(p) => (own + self.internal[p.face_cells[f]]) * 0.5,
                            None => own,
                        };
                    }
                }
                PatchKind::Symmetry => {
                    for (f, &cell) in patch.face_cells.iter().enumerate() {
                        let v = self.internal[cell];
                        self.boundary[pi][f] = (v + v.mirror(patch.nf(f))) * 0.5;
                    }
                }
                PatchKind::Empty | PatchKind::Patch => {
                    for (f, &cell) in patch.face_cells.iter().enumerate() {
                        self.boundary[pi][f] = self.internal[cell];
                    }
                }
            }
        }
    }

    /// 内部与边界值是否全部有限
    pub fn is_finite(&self) -> bool {
        self.internal
            .iter()
            .chain(self.boundary.iter().flatten())
            .all(|v| v.is_finite_value())
    }

    /// 导出快照
    pub fn to_snapshot<M: MeshAccess + ?Sized>(&self, mesh: &M, time: f64) -> FieldSnapshot {
        FieldSnapshot {
            name: self.name.clone(),
            time,
            components: T::N_COMPONENTS,
            internal: self.internal.iter().map(|v| v.components()).collect(),
            boundary: mesh
                .patches()
                .iter()
                .zip(&self.boundary)
                .map(|(p, values)| (p.name.clone(), values.iter().map(|v| v.components()).collect()))
                .collect(),
        }
    }
}

// ============================================================
// 面通量
// ============================================================

/// 面体积通量 `phi = U_f · S_f`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceFlux {
    /// 内部面通量（owner → neighbour）
    pub internal: Vec<f64>,
    /// 各 patch 边界面通量（向外为正）
    pub boundary: Vec<Vec<f64>>,
}

impl FaceFlux {
    /// 由速度场插值计算
    pub fn from_velocity<M: MeshAccess + ?Sized>(mesh: &M, velocity: &VolField<DVec3>) -> Self {
        let internal = (0..mesh.n_internal_faces())
            .map(|f| velocity.face_value(mesh, f).dot(mesh.face_area_vector(f)))
            .collect();
        let boundary = mesh
            .patches()
            .iter()
            .enumerate()
            .map(|(pi, patch)| {
                (0..patch.n_faces())
                    .map(|f| {
                        if patch.kind.is_active() {
                            velocity.boundary_value(pi, f).dot(patch.sf(f))
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect();
        Self { internal, boundary }
    }

    /// patch 总通量
    pub fn patch_total(&self, patch: usize) -> f64 {
        KahanSum::sum_iter(self.boundary[patch].iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_mesh::ChannelMeshBuilder;

    #[test]
    fn test_weighted_average_uses_volumes() {
        let mesh = ChannelMeshBuilder::new().cells(3).grading(1.0).build().unwrap();
        let field = VolField::from_internal("s", &mesh, vec![1.0, 2.0, 6.0]).unwrap();
        let avg = field.weighted_average(&[1.0, 1.0, 2.0]);
        assert!((avg - 15.0 / 4.0).abs() < 1e-14);
    }

    #[test]
    fn test_shift_keeps_wall_values() {
        let mesh = ChannelMeshBuilder::new().cells(4).build().unwrap();
        let mut u = VolField::uniform("U", &mesh, DVec3::X);
        u.fix_patch(0, DVec3::ZERO);
        u.shift_internal(DVec3::new(0.5, 0.0, 0.0));
        assert_eq!(u.internal()[2], DVec3::new(1.5, 0.0, 0.0));
        assert_eq!(u.boundary_value(0, 0), DVec3::ZERO);
    }

    #[test]
    fn test_symmetry_removes_normal_component() {
        let mesh = ChannelMeshBuilder::new().cells(4).half_channel(true).build().unwrap();
        let mut u = VolField::uniform("U", &mesh, DVec3::new(1.0, 0.3, 0.0));
        u.correct_boundary_conditions(&mesh);
        // patch 1 = centreline，法向 +y
        assert!((u.boundary_value(1, 0) - DVec3::X).length() < 1e-14);
    }

    #[test]
    fn test_cyclic_flux_balances() {
        let mesh = ChannelMeshBuilder::new().cells(6).grading(3.0).build().unwrap();
        let u = VolField::uniform("U", &mesh, DVec3::new(2.0, 0.0, 0.0));
        let phi = FaceFlux::from_velocity(&mesh, &u);
        // 出口 + 入口 = 0，出口 = U * 截面积
        assert!((phi.patch_total(2) + phi.patch_total(3)).abs() < 1e-12);
        assert!((phi.patch_total(3) - 2.0 * 2.0).abs() < 1e-12);
        assert!(phi.internal.iter().all(|f| f.abs() < 1e-14));
    }

    #[test]
    fn test_snapshot_components() {
        let mesh = ChannelMeshBuilder::new().cells(2).build().unwrap();
        let r = VolField::uniform("R", &mesh, SymmTensor::sphere(1.0));
        let snap = r.to_snapshot(&mesh, 3.0);
        assert_eq!(snap.components, 6);
        assert_eq!(snap.internal.len(), 2);
        assert_eq!(snap.boundary.len(), mesh.n_patches());
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn test_mirror_of_tensor() {
        let t = SymmTensor::new(1.0, 2.0, 0.0, 3.0, 0.0, 4.0);
        let m = t.mirror(DVec3::Y);
        assert!((m.xy + 2.0).abs() < 1e-14);
        assert!((m.yy - 3.0).abs() < 1e-14);
    }
}
