// crates/cf_io/src/error.rs
//! IO 错误类型定义
//!
//! 所有错误最终可转换为 CfError 以实现跨层错误传递。

use cf_foundation::CfError;
use std::path::PathBuf;
use thiserror::Error;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 文件写入失败
    #[error("写入失败: {path}: {source}")]
    Write {
        /// 目标路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 目录创建失败
    #[error("无法创建目录: {path}: {source}")]
    CreateDir {
        /// 目录路径
        path: PathBuf,
        /// 底层错误
        #[source]
        source: std::io::Error,
    },

    /// 序列化失败
    #[error("序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 数据不一致
    #[error("数据不一致: {name} - {message}")]
    InvalidData {
        /// 数据名称
        name: String,
        /// 说明
        message: String,
    },
}

impl From<IoError> for CfError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::Write { path, source } => {
                CfError::io_with_source(format!("写入失败: {}", path.display()), source)
            }
            IoError::CreateDir { path, source } => {
                CfError::io_with_source(format!("无法创建目录: {}", path.display()), source)
            }
            IoError::Serialization(e) => CfError::serialization(e.to_string()),
            IoError::InvalidData { name, message } => {
                CfError::internal(format!("输出数据不一致 [{name}]: {message}"))
            }
        }
    }
}
