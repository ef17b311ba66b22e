// crates/cf_mesh/src/lib.rs

//! ChanFlow 网格层
//!
//! 提供有限体积网格的只读访问契约和一个内存中的结构化槽道网格实现。
//!
//! # 模块
//!
//! - [`patch`]: 边界 patch 与无滑移壁面能力标记
//! - [`traits`]: 网格访问接口 [`MeshAccess`]
//! - [`channel`]: 结构化槽道网格 [`ChannelMesh`] 及其构建器
//! - [`geometry`]: 壁面距离等几何辅助
//!
//! # 使用示例
//!
//! ```
//! use cf_mesh::{ChannelMeshBuilder, MeshAccess};
//!
//! let mesh = ChannelMeshBuilder::new().cells(8).height(2.0).build().unwrap();
//! assert_eq!(mesh.n_cells(), 8);
//! assert_eq!(mesh.patches().iter().filter(|p| p.is_wall()).count(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod geometry;
pub mod patch;
pub mod traits;

pub use channel::{ChannelMesh, ChannelMeshBuilder, InternalFace};
pub use geometry::{max_wall_distance, wall_distance};
pub use patch::{BoundaryPatch, PatchKind};
pub use traits::MeshAccess;
