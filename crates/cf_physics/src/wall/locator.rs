// crates/cf_physics/src/wall/locator.rs

//! 壁面定位
//!
//! 按 patch 索引、再按面索引顺序枚举所有无滑移壁面面：
//!
//! 1. 第一个壁面面作为代表面，记录其内法向（外法向取反）
//! 2. 第二个壁面面的内法向必须与代表面平行，`|n1·n2| ∈ [0.99, 1.01]`
//! 3. 壁面面总数超过 2 或为 0 都是致命错误
//!
//! 采样线 `y[c] = n_w · (C_c - C_f)`，每个内部单元一个值，按单元索引排列。
//!
//! 所有失败都以 [`WallLocatorError`] 返回，不在此处终止进程。

use cf_foundation::CfError;
use cf_mesh::MeshAccess;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 平行检查下限
pub const PARALLEL_LOWER: f64 = 0.99;
/// 平行检查上限
pub const PARALLEL_UPPER: f64 = 1.01;
/// 允许的最大壁面面数（两侧槽道壁各一个）
pub const MAX_WALL_FACES: usize = 2;

/// 壁面定位错误
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WallLocatorError {
    /// 没有任何壁面面
    #[error("No wall patches identified")]
    NoWallFaces,

    /// 壁面面法向不平行
    #[error("wall faces are not parallel for patches {first} and {second} (|n1·n2| = {dot})")]
    NonParallelWallFaces {
        /// 代表面所在 patch
        first: String,
        /// 不平行面所在 patch
        second: String,
        /// 内法向点积的绝对值
        dot: f64,
    },

    /// 壁面面过多
    #[error("number of wall faces > 2 (found {found})")]
    TooManyWallFaces {
        /// 壁面面总数
        found: usize,
    },
}

impl From<WallLocatorError> for CfError {
    fn from(err: WallLocatorError) -> Self {
        CfError::wall_geometry(err.to_string())
    }
}

/// 代表性壁面面
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSample {
    /// patch 内面索引
    pub face_index: usize,
    /// patch 索引
    pub patch_index: usize,
    /// 相邻内部单元
    pub cell_index: usize,
    /// 指向流体的单位法向
    pub normal: DVec3,
}

/// 壁面法向采样线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplingLine {
    y: Vec<f64>,
}

impl SamplingLine {
    /// 由距离序列创建
    pub fn new(y: Vec<f64>) -> Self {
        Self { y }
    }

    /// 按单元索引排列的距离
    #[inline]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// 单元 `cell` 的距离
    #[inline]
    pub fn at(&self, cell: usize) -> f64 {
        self.y[cell]
    }

    /// 点数
    #[inline]
    pub fn len(&self) -> usize {
        self.y.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// 定位结果
#[derive(Debug, Clone, PartialEq)]
pub struct WallGeometry {
    /// 代表性壁面面
    pub sample: WallSample,
    /// 采样线
    pub line: SamplingLine,
    /// 代表面所在 patch 名
    pub patch_name: String,
    /// 壁面面总数（1 或 2）
    pub n_wall_faces: usize,
}

impl WallGeometry {
    /// 近壁单元中心到壁面的距离 y0
    #[inline]
    pub fn first_cell_height(&self) -> f64 {
        self.line.at(self.sample.cell_index)
    }
}

/// 壁面定位器
#[derive(Debug, Clone, Copy, Default)]
pub struct WallLocator;

impl WallLocator {
    /// 扫描边界并构建采样线
    pub fn locate<M: MeshAccess + ?Sized>(mesh: &M) -> Result<WallGeometry, WallLocatorError> {
        let patches = mesh.patches();
        let total: usize = patches.iter().filter(|p| p.is_wall()).map(|p| p.n_faces()).sum();

        let mut first: Option<(usize, usize, DVec3)> = None;
        let mut n_wall_faces = 0;

        for (pi, patch) in patches.iter().enumerate().filter(|(_, p)| p.is_wall()) {
            for fi in 0..patch.n_faces() {
                n_wall_faces += 1;
                let inward = -patch.nf(fi);
                match (n_wall_faces, first) {
                    (1, _) => first = Some((pi, fi, inward)),
                    (2, Some((p0, _, n0))) => {
                        let dot = n0.dot(inward).abs();
                        if !(PARALLEL_LOWER..=PARALLEL_UPPER).contains(&dot) {
                            return Err(WallLocatorError::NonParallelWallFaces {
                                first: patches[p0].name.clone(),
                                second: patch.name.clone(),
                                dot,
                            });
                        }
                    }
                    _ => return Err(WallLocatorError::TooManyWallFaces { found: total }),
                }
            }
        }

        let (patch_index, face_index, normal) = first.ok_or(WallLocatorError::NoWallFaces)?;
        let patch = &patches[patch_index];
        info!("Generating wall data for patch: {}", patch.name);

        let cell_index = patch.face_cells[face_index];
        let wall_center = patch.face_centers[face_index];
        let y = mesh
            .cell_centers()
            .iter()
            .map(|&c| normal.dot(c - wall_center))
            .collect();
        let line = SamplingLine::new(y);
        info!("    Height to first cell centre y0 = {}", line.at(cell_index));

        Ok(WallGeometry {
            sample: WallSample {
                face_index,
                patch_index,
                cell_index,
                normal,
            },
            line,
            patch_name: patch.name.clone(),
            n_wall_faces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_mesh::{BoundaryPatch, ChannelMesh, ChannelMeshBuilder, PatchKind};

    /// 两个单元沿 y 堆叠，底部一个壁面面，顶部面法向可旋转
    fn two_wall_mesh(top_normal: DVec3) -> ChannelMesh {
        let centers = vec![DVec3::new(0.5, 0.5, 0.5), DVec3::new(0.5, 1.5, 0.5)];
        let faces = vec![cf_mesh::InternalFace {
            owner: 0,
            neighbour: 1,
            area_vector: DVec3::Y,
            center: DVec3::new(0.5, 1.0, 0.5),
        }];
        let mut bottom = BoundaryPatch::new("lower", PatchKind::Wall);
        bottom.push_face(DVec3::new(0.5, 0.0, 0.5), DVec3::NEG_Y, 1.0, 0);
        let mut top = BoundaryPatch::new("upper", PatchKind::Wall);
        top.push_face(DVec3::new(0.5, 2.0, 0.5), top_normal, 1.0, 1);
        ChannelMesh::from_parts(centers, vec![1.0, 1.0], faces, vec![bottom, top]).unwrap()
    }

    #[test]
    fn test_normal_points_into_fluid() {
        let centers = vec![DVec3::new(0.0, 0.25, 0.0)];
        let mut wall = BoundaryPatch::new("wall", PatchKind::Wall);
        wall.push_face(DVec3::ZERO, DVec3::NEG_Y, 1.0, 0);
        let mesh = ChannelMesh::from_parts(centers, vec![0.5], vec![], vec![wall]).unwrap();

        let geo = WallLocator::locate(&mesh).unwrap();
        assert_eq!(geo.sample.normal, DVec3::Y);
        assert_eq!(geo.sample.cell_index, 0);
        assert!((geo.first_cell_height() - 0.25).abs() < 1e-14);
        assert!(geo.line.y().iter().all(|&y| y > 0.0));
    }

    #[test]
    fn test_parallel_walls_accepted() {
        let geo = WallLocator::locate(&two_wall_mesh(DVec3::Y)).unwrap();
        assert_eq!(geo.n_wall_faces, 2);
        assert_eq!(geo.patch_name, "lower");
        assert_eq!(geo.sample.patch_index, 0);
        assert!((geo.line.at(1) - 1.5).abs() < 1e-14);
    }

    #[test]
    fn test_tilted_wall_rejected() {
        // 10° 时 cos = 0.985 < 0.99
        let angle = 10f64.to_radians();
        let tilted = DVec3::new(angle.sin(), angle.cos(), 0.0);
        let err = WallLocator::locate(&two_wall_mesh(tilted)).unwrap_err();
        assert!(matches!(err, WallLocatorError::NonParallelWallFaces { .. }));

        // 5° 时 cos = 0.996，仍在容差内
        let angle = 5f64.to_radians();
        let slight = DVec3::new(angle.sin(), angle.cos(), 0.0);
        assert!(WallLocator::locate(&two_wall_mesh(slight)).is_ok());
    }

    #[test]
    fn test_no_wall_is_fatal() {
        let mut side = BoundaryPatch::new("side", PatchKind::Patch);
        side.push_face(DVec3::ZERO, DVec3::NEG_Y, 1.0, 0);
        let mesh = ChannelMesh::from_parts(vec![DVec3::Y], vec![1.0], vec![], vec![side]).unwrap();
        assert_eq!(WallLocator::locate(&mesh).unwrap_err(), WallLocatorError::NoWallFaces);
    }

    #[test]
    fn test_three_wall_faces_is_fatal() {
        let mut wall = BoundaryPatch::new("wall", PatchKind::Wall);
        for i in 0..3 {
            wall.push_face(DVec3::new(i as f64, 0.0, 0.0), DVec3::NEG_Y, 1.0, 0);
        }
        let mesh = ChannelMesh::from_parts(vec![DVec3::Y], vec![1.0], vec![], vec![wall]).unwrap();
        let err = WallLocator::locate(&mesh).unwrap_err();
        assert_eq!(err, WallLocatorError::TooManyWallFaces { found: 3 });
        assert!(CfError::from(err).is_geometry());
    }

    #[test]
    fn test_channel_line_follows_cell_order() {
        let mesh = ChannelMeshBuilder::new().cells(4).height(2.0).build().unwrap();
        let geo = WallLocator::locate(&mesh).unwrap();
        assert_eq!(geo.patch_name, "bottomWall");
        let expected = [0.25, 0.75, 1.25, 1.75];
        for (y, e) in geo.line.y().iter().zip(expected) {
            assert!((y - e).abs() < 1e-12);
        }
    }
}
