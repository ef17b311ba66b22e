// apps/cf_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 解析并验证算例配置，再构建网格检查壁面几何。

use anyhow::{bail, Context, Result};
use cf_config::{build_mesh, CaseConfig};
use cf_physics::WallLocator;
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 算例配置文件
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self, strict: bool) -> bool {
        self.errors.is_empty() && (!strict || self.warnings.is_empty())
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== ChanFlow 配置验证 ===");

    let mut result = ValidationResult::default();
    validate_config(&args.config, &mut result)?;
    print_validation_result(&result, args.strict)
}

fn validate_config(path: &Path, result: &mut ValidationResult) -> Result<()> {
    println!("检查配置文件: {}", path.display());

    if !path.exists() {
        result.add_error(format!("配置文件不存在: {}", path.display()));
        return Ok(());
    }

    let content = std::fs::read_to_string(path).context("无法读取配置文件")?;
    let config = match CaseConfig::from_json_str(&content) {
        Ok(config) => config,
        Err(e) => {
            result.add_error(e.to_string());
            return Ok(());
        }
    };
    check_recommendations(&config, result);

    match build_mesh(&config.mesh) {
        Ok(mesh) => {
            if let Err(e) = WallLocator::locate(&mesh) {
                result.add_error(format!("壁面几何无效: {}", e));
            }
        }
        Err(e) => result.add_error(format!("网格无法构建: {}", e)),
    }

    Ok(())
}

/// 合法但可能导致问题的取值
fn check_recommendations(config: &CaseConfig, result: &mut ValidationResult) {
    if config.momentum.relaxation > 0.5 {
        result.add_warning(format!(
            "momentum.relaxation = {} 大于 0.5，体积力修正可能振荡",
            config.momentum.relaxation
        ));
    }
    let steps = (config.time.end_time - config.time.start_time) / config.time.delta_t;
    if config.time.write_interval > steps.max(0.0) && steps > 0.0 {
        result.add_warning("write_interval 超过总步数，不会写出任何结果");
    }
    if config.mesh.cells < 10 {
        result.add_warning(format!("mesh.cells = {} 过少，剖面分辨率不足", config.mesh.cells));
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("{}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("{}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    if result.is_ok(strict) {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
