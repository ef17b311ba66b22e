// crates/cf_config/src/case_config.rs

//! CaseConfig - 算例配置
//!
//! 默认值对应 Re_τ ≈ 395 的槽道算例（ν = 2e-5，半高 1）。
//!
//! ```json
//! {
//!   "transport": { "nu": 2e-5, "ubar": [0.1335, 0.0, 0.0] },
//!   "time": { "end_time": 2000, "write_interval": 500 }
//! }
//! ```

use cf_io::GraphFormat;
pub use cf_physics::WriteControl;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 算例配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseConfig {
    /// 输运性质
    #[serde(default)]
    pub transport: TransportConfig,

    /// 湍流模型
    #[serde(default)]
    pub turbulence: TurbulenceConfig,

    /// 动量方程求解
    #[serde(default)]
    pub momentum: MomentumConfig,

    /// 时间控制
    #[serde(default)]
    pub time: TimeConfig,

    /// 网格
    #[serde(default)]
    pub mesh: MeshConfig,

    /// 初始条件
    #[serde(default)]
    pub initial: InitialConfig,

    /// 输出
    #[serde(default)]
    pub output: OutputConfig,
}

/// 输运性质
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// 运动粘度 [m²/s]
    #[serde(default = "default_nu")]
    pub nu: f64,

    /// 目标体积平均速度 [m/s]（必需）
    #[serde(default)]
    pub ubar: Option<[f64; 3]>,
}

fn default_nu() -> f64 { 2.0e-5 }

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            nu: default_nu(),
            ubar: None,
        }
    }
}

/// 湍流模型类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurbulenceModelKind {
    /// 层流
    Laminar,
    /// van Driest 混合长度
    #[default]
    MixingLength,
}

/// 湍流模型配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbulenceConfig {
    /// 模型
    #[serde(default)]
    pub model: TurbulenceModelKind,
    /// von Karman 常数
    #[serde(default = "default_kappa")]
    pub kappa: f64,
    /// van Driest 阻尼常数 A+
    #[serde(default = "default_a_plus")]
    pub a_plus: f64,
    /// C_μ
    #[serde(default = "default_c_mu")]
    pub c_mu: f64,
    /// 涡粘性松弛因子
    #[serde(default = "default_nut_relaxation")]
    pub nut_relaxation: f64,
}

fn default_kappa() -> f64 { 0.41 }
fn default_a_plus() -> f64 { 26.0 }
fn default_c_mu() -> f64 { 0.09 }
fn default_nut_relaxation() -> f64 { 0.5 }

impl Default for TurbulenceConfig {
    fn default() -> Self {
        Self {
            model: TurbulenceModelKind::default(),
            kappa: default_kappa(),
            a_plus: default_a_plus(),
            c_mu: default_c_mu(),
            nut_relaxation: default_nut_relaxation(),
        }
    }
}

/// 动量方程求解配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MomentumConfig {
    /// 欠松弛因子
    #[serde(default = "default_relaxation")]
    pub relaxation: f64,
    /// 线性求解相对容差
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// 线性求解最大迭代次数
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_relaxation() -> f64 { 0.5 }
fn default_tolerance() -> f64 { 1e-10 }
fn default_max_iterations() -> usize { 1000 }

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            relaxation: default_relaxation(),
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// 时间控制配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// 起始时间
    #[serde(default)]
    pub start_time: f64,
    /// 结束时间
    #[serde(default = "default_end_time")]
    pub end_time: f64,
    /// 时间步长（稳态迭代中为伪时间）
    #[serde(default = "default_delta_t")]
    pub delta_t: f64,
    /// 写出控制
    #[serde(default)]
    pub write_control: WriteControl,
    /// 写出间隔
    #[serde(default = "default_write_interval")]
    pub write_interval: f64,
}

fn default_end_time() -> f64 { 1000.0 }
fn default_delta_t() -> f64 { 1.0 }
fn default_write_interval() -> f64 { 200.0 }

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start_time: 0.0,
            end_time: default_end_time(),
            delta_t: default_delta_t(),
            write_control: WriteControl::default(),
            write_interval: default_write_interval(),
        }
    }
}

/// 网格配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshConfig {
    /// 槽道高度 [m]
    #[serde(default = "default_height")]
    pub height: f64,
    /// 法向单元数
    #[serde(default = "default_cells")]
    pub cells: usize,
    /// 中心/壁面单元高度比
    #[serde(default = "default_grading")]
    pub grading: f64,
    /// 流向长度 [m]
    #[serde(default = "default_unit")]
    pub length: f64,
    /// 展向宽度 [m]
    #[serde(default = "default_unit")]
    pub depth: f64,
    /// 半槽道（顶部对称面）
    #[serde(default)]
    pub half_channel: bool,
}

fn default_height() -> f64 { 2.0 }
fn default_cells() -> usize { 80 }
fn default_grading() -> f64 { 10.0 }
fn default_unit() -> f64 { 1.0 }

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            height: default_height(),
            cells: default_cells(),
            grading: default_grading(),
            length: default_unit(),
            depth: default_unit(),
            half_channel: false,
        }
    }
}

/// 初始条件
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitialConfig {
    /// 初始体积力（压力梯度）[m/s²]
    #[serde(default)]
    pub body_force: [f64; 3],
    /// 初始均匀速度，缺省时取 ubar
    #[serde(default)]
    pub velocity: Option<[f64; 3]>,
}

/// 输出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// 曲线格式
    #[serde(default)]
    pub graph_format: GraphFormat,
}

fn default_output_dir() -> PathBuf { PathBuf::from("output") }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            graph_format: GraphFormat::default(),
        }
    }
}

impl CaseConfig {
    /// 从文件加载并验证
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// 从 JSON 字符串加载并验证
    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: CaseConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 带目标速度的默认配置
    pub fn with_ubar(ubar: [f64; 3]) -> Self {
        let mut config = Self::default();
        config.transport.ubar = Some(ubar);
        config
    }

    /// 目标体积平均速度
    pub fn ubar(&self) -> Result<[f64; 3], ConfigError> {
        self.transport
            .ubar
            .ok_or_else(|| ConfigError::Missing("transport.ubar".to_string()))
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ubar = self.ubar()?;
        if ubar.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::invalid("transport.ubar", format!("{:?}", ubar), "分量必须为有限值"));
        }
        if ubar.iter().map(|v| v * v).sum::<f64>() == 0.0 {
            return Err(ConfigError::invalid("transport.ubar", format!("{:?}", ubar), "模为零，无法确定流向"));
        }
        if !(self.transport.nu > 0.0) {
            return Err(ConfigError::invalid("transport.nu", self.transport.nu, "必须为正数"));
        }

        let t = &self.turbulence;
        for (key, value) in [
            ("turbulence.kappa", t.kappa),
            ("turbulence.a_plus", t.a_plus),
            ("turbulence.c_mu", t.c_mu),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(key, value, "必须为正数"));
            }
        }
        if !(t.nut_relaxation > 0.0 && t.nut_relaxation <= 1.0) {
            return Err(ConfigError::invalid("turbulence.nut_relaxation", t.nut_relaxation, "必须在 (0, 1] 内"));
        }

        let m = &self.momentum;
        if !(m.relaxation > 0.0 && m.relaxation <= 1.0) {
            return Err(ConfigError::invalid("momentum.relaxation", m.relaxation, "必须在 (0, 1] 内"));
        }
        if !(m.tolerance > 0.0) {
            return Err(ConfigError::invalid("momentum.tolerance", m.tolerance, "必须为正数"));
        }
        if m.max_iterations == 0 {
            return Err(ConfigError::invalid("momentum.max_iterations", 0, "必须大于 0"));
        }

        let time = &self.time;
        if !(time.delta_t > 0.0) {
            return Err(ConfigError::invalid("time.delta_t", time.delta_t, "必须为正数"));
        }
        if time.end_time < time.start_time {
            return Err(ConfigError::invalid("time.end_time", time.end_time, "不能早于 start_time"));
        }
        if !(time.write_interval > 0.0) {
            return Err(ConfigError::invalid("time.write_interval", time.write_interval, "必须为正数"));
        }

        let mesh = &self.mesh;
        if mesh.cells == 0 {
            return Err(ConfigError::invalid("mesh.cells", 0, "至少需要一个单元"));
        }
        for (key, value) in [
            ("mesh.height", mesh.height),
            ("mesh.grading", mesh.grading),
            ("mesh.length", mesh.length),
            ("mesh.depth", mesh.depth),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(key, value, "必须为正数"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_json() {
        let config = CaseConfig::from_json_str(r#"{ "transport": { "ubar": [0.1335, 0, 0] } }"#).unwrap();
        assert_eq!(config.transport.nu, 2.0e-5);
        assert_eq!(config.momentum.relaxation, 0.5);
        assert_eq!(config.turbulence.model, TurbulenceModelKind::MixingLength);
        assert_eq!(config.output.graph_format, GraphFormat::Raw);
    }

    #[test]
    fn test_missing_ubar_is_reported() {
        let err = CaseConfig::from_json_str("{}").unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref k) if k == "transport.ubar"));
    }

    #[test]
    fn test_zero_ubar_rejected() {
        let config = CaseConfig::with_ubar([0.0, 0.0, 0.0]);
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_relaxation_range() {
        let mut config = CaseConfig::with_ubar([1.0, 0.0, 0.0]);
        config.momentum.relaxation = 1.5;
        assert!(config.validate().is_err());
        config.momentum.relaxation = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enum_spelling() {
        let config = CaseConfig::from_json_str(
            r#"{
                "transport": { "ubar": [1, 0, 0] },
                "turbulence": { "model": "laminar" },
                "time": { "write_control": "run_time", "write_interval": 0.5 },
                "output": { "graph_format": "csv" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.turbulence.model, TurbulenceModelKind::Laminar);
        assert_eq!(config.time.write_control, WriteControl::RunTime);
        assert_eq!(config.output.graph_format, GraphFormat::Csv);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, r#"{ "transport": { "ubar": [0.2, 0, 0] }, "mesh": { "cells": 10 } }"#).unwrap();
        let config = CaseConfig::from_file(&path).unwrap();
        assert_eq!(config.mesh.cells, 10);
    }
}
