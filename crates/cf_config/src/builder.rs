// crates/cf_config/src/builder.rs

//! 求解器构建器
//!
//! 从 [`CaseConfig`] 组装网格、流动状态、湍流模型、动量系统、
//! 时间控制和输出写出器，得到可运行的 [`SolverLoop`]。

use crate::case_config::{CaseConfig, MeshConfig, TurbulenceModelKind};
use cf_foundation::CfResult;
use cf_io::{FieldWriter, FileGraphWriter, GraphWriter, JsonFieldWriter};
use cf_mesh::{ChannelMesh, ChannelMeshBuilder};
use cf_physics::numerics::linear_algebra::SolverConfig;
use cf_physics::{
    FlowState, FvMomentumSystem, Laminar, MixingLength, MixingLengthParams, ProfileRecorder,
    SolverLoop, TimeControl, TurbulenceModel,
};
use glam::DVec3;
use std::path::PathBuf;
use tracing::info;

/// 由网格配置构建槽道网格
pub fn build_mesh(config: &MeshConfig) -> CfResult<ChannelMesh> {
    ChannelMeshBuilder::new()
        .height(config.height)
        .cells(config.cells)
        .grading(config.grading)
        .length(config.length)
        .depth(config.depth)
        .half_channel(config.half_channel)
        .build()
}

/// 求解器构建器
pub struct SolverBuilder {
    config: CaseConfig,
    output_dir: Option<PathBuf>,
    writers: Option<(Box<dyn GraphWriter>, Box<dyn FieldWriter>)>,
}

impl SolverBuilder {
    /// 以算例配置创建
    pub fn new(config: CaseConfig) -> Self {
        Self {
            config,
            output_dir: None,
            writers: None,
        }
    }

    /// 覆盖输出目录
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// 使用自定义写出器（不落盘）
    pub fn with_writers(mut self, graphs: Box<dyn GraphWriter>, fields: Box<dyn FieldWriter>) -> Self {
        self.writers = Some((graphs, fields));
        self
    }

    /// 配置
    pub fn config(&self) -> &CaseConfig {
        &self.config
    }

    /// 湍流模型
    fn turbulence(&self, mesh: &ChannelMesh) -> Box<dyn TurbulenceModel> {
        let t = &self.config.turbulence;
        let nu = self.config.transport.nu;
        match t.model {
            TurbulenceModelKind::Laminar => Box::new(Laminar::new(mesh, nu)),
            TurbulenceModelKind::MixingLength => Box::new(MixingLength::new(
                mesh,
                nu,
                MixingLengthParams {
                    kappa: t.kappa,
                    a_plus: t.a_plus,
                    c_mu: t.c_mu,
                    nut_relaxation: t.nut_relaxation,
                },
            )),
        }
    }

    /// 构建主循环
    pub fn build(self) -> CfResult<SolverLoop<ChannelMesh>> {
        let config = &self.config;
        config.validate()?;
        let ubar = DVec3::from_array(config.ubar()?);

        let mesh = build_mesh(&config.mesh)?;
        info!(
            "网格: {} 单元, 高度 {}, 加密比 {}",
            config.mesh.cells, config.mesh.height, config.mesh.grading
        );

        let initial = config.initial.velocity.map(DVec3::from_array).unwrap_or(ubar);
        let body_force = DVec3::from_array(config.initial.body_force);
        let state = FlowState::new(&mesh, ubar, initial, body_force)?;

        let turbulence = self.turbulence(&mesh);
        let momentum = Box::new(FvMomentumSystem::new(
            config.momentum.relaxation,
            SolverConfig::new(config.momentum.tolerance, config.momentum.max_iterations),
        ));

        let t = &config.time;
        let time = TimeControl::new(t.start_time, t.end_time, t.delta_t, t.write_control, t.write_interval)?;

        let recorder = match self.writers {
            Some((graphs, fields)) => ProfileRecorder::new(graphs, fields),
            None => {
                let dir = self
                    .output_dir
                    .clone()
                    .unwrap_or_else(|| config.output.directory.clone());
                info!("输出目录: {}", dir.display());
                ProfileRecorder::new(
                    Box::new(FileGraphWriter::new(&dir, config.output.graph_format)),
                    Box::new(JsonFieldWriter::new(&dir)),
                )
            }
        };

        SolverLoop::new(mesh, state, time, turbulence, momentum, recorder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_foundation::CfError;
    use cf_io::{MemoryFieldWriter, MemoryGraphWriter};
    use cf_mesh::MeshAccess;

    fn memory(builder: SolverBuilder) -> SolverBuilder {
        builder.with_writers(Box::new(MemoryGraphWriter::new()), Box::new(MemoryFieldWriter::new()))
    }

    #[test]
    fn test_mesh_from_config() {
        let config = MeshConfig {
            cells: 12,
            half_channel: true,
            ..Default::default()
        };
        let mesh = build_mesh(&config).unwrap();
        assert_eq!(mesh.n_cells(), 12);
        assert_eq!(mesh.patches().iter().filter(|p| p.is_wall()).count(), 1);
    }

    #[test]
    fn test_builds_selected_turbulence_model() {
        let mut config = CaseConfig::with_ubar([1.0, 0.0, 0.0]);
        config.mesh.cells = 8;
        config.turbulence.model = TurbulenceModelKind::Laminar;
        let solver = memory(SolverBuilder::new(config.clone())).build().unwrap();
        assert_eq!(solver.turbulence().name(), "laminar");

        config.turbulence.model = TurbulenceModelKind::MixingLength;
        let solver = memory(SolverBuilder::new(config)).build().unwrap();
        assert_eq!(solver.turbulence().name(), "mixingLength");
    }

    #[test]
    fn test_missing_ubar_propagates() {
        let err = memory(SolverBuilder::new(CaseConfig::default())).build().err().unwrap();
        assert!(matches!(err, CfError::MissingConfig { .. }));
    }

    #[test]
    fn test_short_run_writes_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CaseConfig::with_ubar([1.0, 0.0, 0.0]);
        config.transport.nu = 0.01;
        config.turbulence.model = TurbulenceModelKind::Laminar;
        config.mesh.cells = 6;
        config.mesh.grading = 1.0;
        config.time.end_time = 3.0;
        config.time.write_interval = 3.0;

        let mut solver = SolverBuilder::new(config)
            .with_output_dir(dir.path())
            .build()
            .unwrap();
        let summary = solver.run().unwrap();
        assert_eq!(summary.steps, 3);
        assert!(dir.path().join("3").join("Uf.xy").exists());
    }
}
