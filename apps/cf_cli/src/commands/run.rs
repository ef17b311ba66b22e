// apps/cf_cli/src/commands/run.rs

//! 运行算例命令
//!
//! 读取算例配置，经 `SolverBuilder` 组装主循环并运行到结束时间。
//! 任何错误（包括壁面几何不合法）都以非零退出码结束进程。

use anyhow::{Context, Result};
use cf_config::{CaseConfig, SolverBuilder};
use cf_foundation::CfError;
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info};

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 算例配置文件 (JSON)
    #[arg(short, long)]
    pub config: PathBuf,

    /// 覆盖输出目录
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 覆盖结束时间
    #[arg(short = 't', long)]
    pub end_time: Option<f64>,

    /// 覆盖输出间隔
    #[arg(long)]
    pub write_interval: Option<f64>,
}

/// 把命令行覆盖项写入配置
fn apply_overrides(config: &mut CaseConfig, args: &RunArgs) {
    if let Some(dir) = &args.output {
        config.output.directory = dir.clone();
    }
    if let Some(end) = args.end_time {
        config.time.end_time = end;
    }
    if let Some(interval) = args.write_interval {
        config.time.write_interval = interval;
    }
}

fn report(err: &CfError) {
    if err.is_geometry() {
        error!("壁面几何无效: {}", err);
    } else {
        error!("{}", err);
    }
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== ChanFlow 算例启动 ===");

    let mut config = CaseConfig::from_file(&args.config)
        .with_context(|| format!("无法加载配置: {}", args.config.display()))?;
    apply_overrides(&mut config, &args);
    config.validate().context("命令行覆盖后配置无效")?;

    info!(
        "ν = {}, Ubar = {:?}, 湍流模型 {:?}",
        config.transport.nu, config.transport.ubar, config.turbulence.model
    );

    let mut solver = SolverBuilder::new(config).build().inspect_err(report)?;
    let summary = solver.run().inspect_err(report)?;

    info!("=== 运行完成 ===");
    info!("总步数: {}, 写出次数: {}", summary.steps, summary.writes);
    info!(
        "体积平均速度: {:?}, 体积力: {:?}",
        summary.bulk_velocity.to_array(),
        summary.body_force.to_array()
    );
    if let Some(last) = summary.last_step {
        info!("uTau = {}, y+ = {}", last.wall.friction_velocity, last.wall.y_plus);
    }
    info!(
        "ExecutionTime = {:.2} s  ClockTime = {:.0} s",
        summary.execution_time, summary.clock_time
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config: PathBuf) -> RunArgs {
        RunArgs {
            config,
            output: None,
            end_time: None,
            write_interval: None,
        }
    }

    #[test]
    fn test_overrides_applied() {
        let mut config = CaseConfig::with_ubar([1.0, 0.0, 0.0]);
        let mut a = args(PathBuf::from("case.json"));
        a.output = Some(PathBuf::from("out"));
        a.end_time = Some(10.0);
        apply_overrides(&mut config, &a);
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!((config.time.end_time - 10.0).abs() < 1e-12);
        assert!((config.time.write_interval - 200.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_ubar_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, r#"{ "transport": { "nu": 0.01 } }"#).unwrap();
        assert!(execute(args(path)).is_err());
    }

    #[test]
    fn test_short_laminar_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.json");
        let out = dir.path().join("out");
        std::fs::write(
            &path,
            r#"{
                "transport": { "nu": 0.01, "ubar": [1.0, 0.0, 0.0] },
                "turbulence": { "model": "laminar" },
                "mesh": { "cells": 8, "grading": 1.0 },
                "time": { "end_time": 2, "write_interval": 2 },
                "output": { "graph_format": "csv" }
            }"#,
        )
        .unwrap();
        let mut a = args(path);
        a.output = Some(out.clone());
        execute(a).unwrap();
        assert!(out.join("2").join("Uf.csv").exists());
        assert!(out.join("2").join("U.json").exists());
    }
}
