// crates/cf_mesh/src/channel.rs

//! 结构化槽道网格
//!
//! 沿壁面法向（y）堆叠的一维六面体单元列，流向（x）和展向（z）各一层。
//!
//! ```text
//!   y = H  ───────────── topWall (或 centreline 对称面)
//!          │  cell n-1 │
//!          ├───────────┤
//!          │    ...    │   periodicX0 | periodicX1 (x 方向周期)
//!          ├───────────┤   frontAndBack (z 方向 empty)
//!          │  cell 0   │
//!   y = 0  ───────────── bottomWall
//! ```
//!
//! patch 顺序固定：`bottomWall`, `topWall`/`centreline`, `periodicX0`,
//! `periodicX1`, `frontAndBack`。

use crate::patch::{BoundaryPatch, PatchKind};
use crate::traits::MeshAccess;
use cf_foundation::{CfError, CfResult, SMALL};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 内部面
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InternalFace {
    /// owner 单元
    pub owner: usize,
    /// neighbour 单元
    pub neighbour: usize,
    /// 面积向量（owner → neighbour）
    pub area_vector: DVec3,
    /// 面心
    pub center: DVec3,
}

/// 内存网格
///
/// 既是结构化槽道网格的载体，也可通过 [`ChannelMesh::from_parts`]
/// 承载任意合成网格（测试用）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMesh {
    cell_centers: Vec<DVec3>,
    cell_volumes: Vec<f64>,
    faces: Vec<InternalFace>,
    patches: Vec<BoundaryPatch>,
}

impl ChannelMesh {
    /// 由各部分组装并校验
    pub fn from_parts(
        cell_centers: Vec<DVec3>,
        cell_volumes: Vec<f64>,
        faces: Vec<InternalFace>,
        patches: Vec<BoundaryPatch>,
    ) -> CfResult<Self> {
        let n_cells = cell_centers.len();
        if cell_volumes.len() != n_cells {
            return Err(CfError::size_mismatch("cell_volumes", n_cells, cell_volumes.len()));
        }
        if let Some(c) = cell_volumes.iter().position(|&v| !(v > 0.0)) {
            return Err(CfError::invalid_mesh(format!("单元 {} 体积非正", c)));
        }
        for (i, f) in faces.iter().enumerate() {
            if f.owner >= n_cells || f.neighbour >= n_cells {
                return Err(CfError::invalid_mesh(format!("内部面 {} 引用了不存在的单元", i)));
            }
            if f.area_vector.length() < SMALL {
                return Err(CfError::invalid_mesh(format!("内部面 {} 面积为零", i)));
            }
        }
        for (i, patch) in patches.iter().enumerate() {
            patch.validate(n_cells)?;
            if let Some(partner) = patch.neighbour_patch {
                let other = patches.get(partner).ok_or_else(|| {
                    CfError::invalid_mesh(format!("patch {} 的配对 patch {} 不存在", patch.name, partner))
                })?;
                if other.n_faces() != patch.n_faces() {
                    return Err(CfError::invalid_mesh(format!(
                        "周期 patch {} 与 {} 面数不一致",
                        patch.name, other.name
                    )));
                }
                if other.neighbour_patch != Some(i) {
                    return Err(CfError::invalid_mesh(format!(
                        "周期 patch {} 与 {} 配对不对称",
                        patch.name, other.name
                    )));
                }
            }
        }

        Ok(Self {
            cell_centers,
            cell_volumes,
            faces,
            patches,
        })
    }

    /// 内部面列表
    pub fn faces(&self) -> &[InternalFace] {
        &self.faces
    }
}

impl MeshAccess for ChannelMesh {
    fn n_cells(&self) -> usize {
        self.cell_centers.len()
    }

    fn n_internal_faces(&self) -> usize {
        self.faces.len()
    }

    fn cell_centers(&self) -> &[DVec3] {
        &self.cell_centers
    }

    fn cell_volumes(&self) -> &[f64] {
        &self.cell_volumes
    }

    fn face_owner(&self, face: usize) -> usize {
        self.faces[face].owner
    }

    fn face_neighbour(&self, face: usize) -> usize {
        self.faces[face].neighbour
    }

    fn face_area_vector(&self, face: usize) -> DVec3 {
        self.faces[face].area_vector
    }

    fn face_center(&self, face: usize) -> DVec3 {
        self.faces[face].center
    }

    fn patches(&self) -> &[BoundaryPatch] {
        &self.patches
    }
}

// ============================================================
// 构建器
// ============================================================

/// 槽道网格构建器
///
/// # 示例
///
/// ```
/// use cf_mesh::{ChannelMeshBuilder, MeshAccess};
///
/// let mesh = ChannelMeshBuilder::new()
///     .height(2.0)
///     .cells(20)
///     .grading(5.0)
///     .build()
///     .unwrap();
/// assert!((mesh.total_volume() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ChannelMeshBuilder {
    height: f64,
    cells: usize,
    grading: f64,
    length: f64,
    depth: f64,
    half_channel: bool,
}

impl Default for ChannelMeshBuilder {
    fn default() -> Self {
        Self {
            height: 2.0,
            cells: 40,
            grading: 1.0,
            length: 1.0,
            depth: 1.0,
            half_channel: false,
        }
    }
}

impl ChannelMeshBuilder {
    /// 默认参数：高 2，40 单元，均匀
    pub fn new() -> Self {
        Self::default()
    }

    /// 槽道高度（半槽道模式下为壁面到中心线的距离）
    pub fn height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    /// 法向单元数
    pub fn cells(mut self, cells: usize) -> Self {
        self.cells = cells;
        self
    }

    /// 中心单元高度与壁面单元高度之比
    pub fn grading(mut self, grading: f64) -> Self {
        self.grading = grading;
        self
    }

    /// 流向长度
    pub fn length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    /// 展向宽度
    pub fn depth(mut self, depth: f64) -> Self {
        self.depth = depth;
        self
    }

    /// 半槽道：顶部为对称面
    pub fn half_channel(mut self, half: bool) -> Self {
        self.half_channel = half;
        self
    }

    /// 法向单元高度分布
    fn cell_heights(&self) -> Vec<f64> {
        let n = self.cells;
        // 距壁面的层号
        let level = |i: usize| {
            if self.half_channel {
                i
            } else {
                i.min(n - 1 - i)
            }
        };
        let max_level = (0..n).map(level).max().unwrap_or(0);
        let ratio = if max_level > 0 {
            self.grading.powf(1.0 / max_level as f64)
        } else {
            1.0
        };
        let raw: Vec<f64> = (0..n).map(|i| ratio.powi(level(i) as i32)).collect();
        let total: f64 = raw.iter().sum();
        raw.into_iter().map(|w| w * self.height / total).collect()
    }

    /// 构建网格
    pub fn build(self) -> CfResult<ChannelMesh> {
        if self.cells == 0 {
            return Err(CfError::invalid_config("mesh.cells", "0", "至少需要一个单元"));
        }
        for (key, value) in [
            ("mesh.height", self.height),
            ("mesh.grading", self.grading),
            ("mesh.length", self.length),
            ("mesh.depth", self.depth),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return Err(CfError::invalid_config(key, value.to_string(), "必须为正数"));
            }
        }

        let n = self.cells;
        let (lx, lz) = (self.length, self.depth);
        let heights = self.cell_heights();

        // 面位置 y_0 = 0 ... y_n = H
        let mut y_faces = Vec::with_capacity(n + 1);
        y_faces.push(0.0);
        for h in &heights {
            let last = *y_faces.last().unwrap_or(&0.0);
            y_faces.push(last + h);
        }
        y_faces[n] = self.height;

        let mid = |y: f64| DVec3::new(0.5 * lx, y, 0.5 * lz);

        let cell_centers: Vec<DVec3> = (0..n).map(|i| mid(0.5 * (y_faces[i] + y_faces[i + 1]))).collect();
        let cell_volumes: Vec<f64> = heights.iter().map(|h| lx * h * lz).collect();

        let xz_area = lx * lz;
        let faces: Vec<InternalFace> = (0..n.saturating_sub(1))
            .map(|i| InternalFace {
                owner: i,
                neighbour: i + 1,
                area_vector: DVec3::Y * xz_area,
                center: mid(y_faces[i + 1]),
            })
            .collect();

        let mut bottom = BoundaryPatch::new("bottomWall", PatchKind::Wall);
        bottom.push_face(mid(0.0), DVec3::NEG_Y, xz_area, 0);

        let mut top = if self.half_channel {
            BoundaryPatch::new("centreline", PatchKind::Symmetry)
        } else {
            BoundaryPatch::new("topWall", PatchKind::Wall)
        };
        top.push_face(mid(self.height), DVec3::Y, xz_area, n - 1);

        let mut x0 = BoundaryPatch::new("periodicX0", PatchKind::Cyclic).with_neighbour(3);
        let mut x1 = BoundaryPatch::new("periodicX1", PatchKind::Cyclic).with_neighbour(2);
        let mut sides = BoundaryPatch::new("frontAndBack", PatchKind::Empty);
        for (i, c) in cell_centers.iter().enumerate() {
            let yz_area = heights[i] * lz;
            let xy_area = heights[i] * lx;
            x0.push_face(DVec3::new(0.0, c.y, c.z), DVec3::NEG_X, yz_area, i);
            x1.push_face(DVec3::new(lx, c.y, c.z), DVec3::X, yz_area, i);
            sides.push_face(DVec3::new(c.x, c.y, 0.0), DVec3::NEG_Z, xy_area, i);
            sides.push_face(DVec3::new(c.x, c.y, lz), DVec3::Z, xy_area, i);
        }

        let mesh = ChannelMesh::from_parts(
            cell_centers,
            cell_volumes,
            faces,
            vec![bottom, top, x0, x1, sides],
        )?;
        tracing::debug!(
            "槽道网格: {} 单元, 高度 {}, 首层单元高度 {:.4e}",
            n,
            self.height,
            heights[0]
        );
        Ok(mesh)
    }
}
