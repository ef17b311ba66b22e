// crates/cf_mesh/src/patch.rs

//! 边界 patch 定义
//!
//! 每个 patch 持有其所有边界面的几何（面心、单位外法向、面积）和相邻单元。
//! patch 在整个计算过程中不可变。

use cf_foundation::{CfError, CfResult};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// patch 类型
///
/// 只有 [`PatchKind::Wall`] 具有无滑移壁面能力。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatchKind {
    /// 无滑移固壁
    Wall,
    /// 周期边界（成对出现）
    Cyclic,
    /// 对称面
    Symmetry,
    /// 空边界（降维方向，不参与离散）
    Empty,
    /// 一般边界（零梯度）
    #[default]
    Patch,
}

impl PatchKind {
    /// 是否为无滑移壁面
    #[inline]
    pub fn is_wall(&self) -> bool {
        matches!(self, Self::Wall)
    }

    /// 是否参与离散
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

impl std::fmt::Display for PatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Wall => "wall",
            Self::Cyclic => "cyclic",
            Self::Symmetry => "symmetry",
            Self::Empty => "empty",
            Self::Patch => "patch",
        };
        write!(f, "{}", name)
    }
}

/// 边界 patch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryPatch {
    /// patch 名称
    pub name: String,
    /// patch 类型
    pub kind: PatchKind,
    /// 面心
    pub face_centers: Vec<DVec3>,
    /// 单位外法向（指向计算域外）
    pub face_normals: Vec<DVec3>,
    /// 面积
    pub face_areas: Vec<f64>,
    /// 相邻内部单元
    pub face_cells: Vec<usize>,
    /// 周期边界的配对 patch（面按索引一一对应）
    #[serde(default)]
    pub neighbour_patch: Option<usize>,
}

impl BoundaryPatch {
    /// 创建空 patch
    pub fn new(name: impl Into<String>, kind: PatchKind) -> Self {
        Self {
            name: name.into(),
            kind,
            face_centers: Vec::new(),
            face_normals: Vec::new(),
            face_areas: Vec::new(),
            face_cells: Vec::new(),
            neighbour_patch: None,
        }
    }

    /// 追加一个面（法向会被归一化）
    pub fn push_face(&mut self, center: DVec3, outward_normal: DVec3, area: f64, cell: usize) {
        self.face_centers.push(center);
        self.face_normals.push(outward_normal.normalize_or_zero());
        self.face_areas.push(area);
        self.face_cells.push(cell);
    }

    /// 设置周期配对
    pub fn with_neighbour(mut self, patch: usize) -> Self {
        self.neighbour_patch = Some(patch);
        self
    }

    /// 面数量
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.face_cells.len()
    }

    /// 是否为无滑移壁面
    #[inline]
    pub fn is_wall(&self) -> bool {
        self.kind.is_wall()
    }

    /// 单位外法向
    #[inline]
    pub fn nf(&self, face: usize) -> DVec3 {
        self.face_normals[face]
    }

    /// 面积向量
    #[inline]
    pub fn sf(&self, face: usize) -> DVec3 {
        self.face_normals[face] * self.face_areas[face]
    }

    /// 单元中心到面心沿法向的距离
    #[inline]
    pub fn normal_distance(&self, face: usize, cell_center: DVec3) -> f64 {
        self.nf(face).dot(self.face_centers[face] - cell_center).abs()
    }

    /// 校验内部一致性
    pub fn validate(&self, n_cells: usize) -> CfResult<()> {
        let n = self.n_faces();
        if self.face_centers.len() != n {
            return Err(CfError::size_mismatch("patch.face_centers", n, self.face_centers.len()));
        }
        if self.face_normals.len() != n {
            return Err(CfError::size_mismatch("patch.face_normals", n, self.face_normals.len()));
        }
        if self.face_areas.len() != n {
            return Err(CfError::size_mismatch("patch.face_areas", n, self.face_areas.len()));
        }
        if let Some(&cell) = self.face_cells.iter().find(|&&c| c >= n_cells) {
            return Err(CfError::index_out_of_bounds("patch.face_cells", cell, n_cells));
        }
        if let Some(i) = self.face_normals.iter().position(|nf| nf.length_squared() == 0.0) {
            return Err(CfError::invalid_mesh(format!(
                "patch {} 第 {} 个面法向为零",
                self.name, i
            )));
        }
        Ok(())
    }
}
