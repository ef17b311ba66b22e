// apps/cf_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 只构建网格并定位壁面，不运行求解。

use anyhow::{Context, Result};
use cf_config::{build_mesh, CaseConfig, MeshConfig};
use cf_mesh::{max_wall_distance, MeshAccess};
use cf_physics::WallLocator;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 算例配置文件，缺省时使用默认网格
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 打印默认配置 (JSON)
    #[arg(long)]
    pub defaults: bool,
}

/// 读取网格配置，不要求 `transport.ubar`
fn load_mesh_config(path: &PathBuf) -> Result<MeshConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
    let config: CaseConfig = serde_json::from_str(&content).context("JSON 解析错误")?;
    Ok(config.mesh)
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== ChanFlow 信息 ===");

    if args.defaults {
        let json = serde_json::to_string_pretty(&CaseConfig::default())?;
        println!("{}", json);
        return Ok(());
    }

    let mesh_config = match &args.config {
        Some(path) => load_mesh_config(path)?,
        None => MeshConfig::default(),
    };
    let mesh = build_mesh(&mesh_config)?;

    println!("=== 网格 ===");
    println!("单元数: {}", mesh.n_cells());
    println!("内部面数: {}", mesh.n_internal_faces());
    println!("总体积: {}", mesh.total_volume());
    for patch in mesh.patches() {
        println!("  {:<14} {:?} ({} 面)", patch.name, patch.kind, patch.n_faces());
    }

    let geometry = WallLocator::locate(&mesh)?;
    println!("\n=== 壁面 ===");
    println!("采样补丁: {}", geometry.patch_name);
    println!("壁面面数: {}", geometry.n_wall_faces);
    println!("壁面法向: {:?}", geometry.sample.normal.to_array());
    println!("首层单元中心高度 y0: {}", geometry.first_cell_height());
    println!("最大壁面距离: {}", max_wall_distance(&mesh));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_config_without_ubar() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, r#"{ "mesh": { "cells": 12, "half_channel": true } }"#).unwrap();
        let mesh = load_mesh_config(&path).unwrap();
        assert_eq!(mesh.cells, 12);
        assert!(mesh.half_channel);
    }

    #[test]
    fn test_info_on_default_mesh() {
        execute(InfoArgs {
            config: None,
            defaults: false,
        })
        .unwrap();
    }
}
