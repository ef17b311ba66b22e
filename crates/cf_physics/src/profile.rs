// crates/cf_physics/src/profile.rs

//! 剖面输出
//!
//! 输出步上先写出速度场 `U` 与雷诺应力场 `R`，再沿壁面法向采样线
//! 写出下列曲线（横坐标为 `y`，按单元索引排列）：
//!
//! | 名称 | 量 |
//! |------|----|
//! | `Uf` | `f · U` |
//! | `nu`, `k`, `epsilon` | 湍流模型场 |
//! | `Rff`, `Rww`, `Rfw` | `f·R·f`, `n·R·n`, `f·R·n` |
//! | `u`, `v`, `w` | `sqrt|R_xx|`, `sqrt|R_yy|`, `sqrt|R_zz|` |
//! | `uv` | `R_xy` |
//! | `gammaDot` | `|∇U|` |

use crate::numerics::grad_vector;
use crate::state::FlowState;
use crate::turbulence::TurbulenceModel;
use crate::wall::WallGeometry;
use cf_foundation::tensor::{mag, SymmComponent};
use cf_foundation::CfResult;
use cf_io::{time_name, FieldSnapshot, FieldWriter, Graph, GraphWriter};
use cf_mesh::MeshAccess;
use tracing::debug;

/// 曲线名称（按写出顺序）
pub const PROFILE_NAMES: [&str; 12] = [
    "Uf", "nu", "k", "epsilon", "Rff", "Rww", "Rfw", "u", "v", "w", "uv", "gammaDot",
];

/// 一个输出步的全部数据
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    /// 物理时间
    pub time: f64,
    /// 场快照（`U`、`R`）
    pub fields: Vec<FieldSnapshot>,
    /// 剖面曲线，顺序同 [`PROFILE_NAMES`]
    pub graphs: Vec<Graph>,
}

/// 剖面记录器
pub struct ProfileRecorder {
    graphs: Box<dyn GraphWriter>,
    fields: Box<dyn FieldWriter>,
}

impl ProfileRecorder {
    /// 以给定写出器创建
    pub fn new(graphs: Box<dyn GraphWriter>, fields: Box<dyn FieldWriter>) -> Self {
        Self { graphs, fields }
    }

    /// 采样当前状态
    pub fn collect(
        mesh: &dyn MeshAccess,
        geometry: &WallGeometry,
        state: &FlowState,
        turbulence: &dyn TurbulenceModel,
        time: f64,
    ) -> CfResult<ProfileSet> {
        let y = geometry.line.y();
        let f = state.flow_direction();
        let n = geometry.sample.normal;
        let r = turbulence.r().internal();
        let grad = grad_vector(mesh, &state.velocity);

        let r_component = |c: SymmComponent| -> Vec<f64> { r.iter().map(|t| t.component(c)).collect() };
        let rms = |c: SymmComponent| -> Vec<f64> { r_component(c).into_iter().map(|v| v.abs().sqrt()).collect() };

        let columns: [Vec<f64>; 12] = [
            state.velocity.internal().iter().map(|u| f.dot(*u)).collect(),
            turbulence.nu().internal().to_vec(),
            turbulence.k().internal().to_vec(),
            turbulence.epsilon().internal().to_vec(),
            r.iter().map(|t| t.inner(f, f)).collect(),
            r.iter().map(|t| t.inner(n, n)).collect(),
            r.iter().map(|t| t.inner(f, n)).collect(),
            rms(SymmComponent::XX),
            rms(SymmComponent::YY),
            rms(SymmComponent::ZZ),
            r_component(SymmComponent::XY),
            grad.internal().iter().map(|g| mag(*g)).collect(),
        ];

        let graphs = PROFILE_NAMES
            .iter()
            .zip(columns.iter())
            .map(|(name, values)| Graph::from_columns(*name, y, values))
            .collect::<Result<Vec<_>, _>>()?;

        let fields = vec![
            state.velocity.to_snapshot(mesh, time),
            turbulence.r().to_snapshot(mesh, time),
        ];

        Ok(ProfileSet {
            time,
            fields,
            graphs,
        })
    }

    /// 写出一个输出步
    pub fn write(&mut self, set: &ProfileSet) -> CfResult<()> {
        let dir = time_name(set.time);
        for field in &set.fields {
            self.fields.write_field(&dir, field)?;
        }
        for graph in &set.graphs {
            self.graphs.write_graph(&dir, graph)?;
        }
        debug!("时间 {} 写出 {} 个场, {} 条曲线", dir, set.fields.len(), set.graphs.len());
        Ok(())
    }

    /// 采样并写出
    pub fn record(
        &mut self,
        mesh: &dyn MeshAccess,
        geometry: &WallGeometry,
        state: &FlowState,
        turbulence: &dyn TurbulenceModel,
        time: f64,
    ) -> CfResult<ProfileSet> {
        let set = Self::collect(mesh, geometry, state, turbulence, time)?;
        self.write(&set)?;
        Ok(set)
    }
}
