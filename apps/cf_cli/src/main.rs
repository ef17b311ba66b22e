// apps/cf_cli/src/main.rs

//! ChanFlow 命令行界面
//!
//! 定流量槽道流求解器。`run` 读取 JSON 算例运行到结束时间，
//! `info` 打印网格与壁面信息，`validate` 检查配置文件。

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// ChanFlow 槽道流求解器命令行工具
#[derive(Parser)]
#[command(name = "cf_cli")]
#[command(author = "ChanFlow Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Constant mass-flow channel flow solver", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 运行算例
    Run(commands::run::RunArgs),
    /// 显示网格与壁面信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn parse_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&cli.log_level))
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("bogus"), Level::INFO);
    }

    #[test]
    fn test_run_arguments() {
        let cli = Cli::try_parse_from(["cf_cli", "-l", "debug", "run", "-c", "case.json", "--end-time", "50"])
            .unwrap();
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config.to_str(), Some("case.json"));
                assert_eq!(args.end_time, Some(50.0));
                assert!(args.output.is_none());
            }
            _ => panic!("expected run"),
        }
    }
}
