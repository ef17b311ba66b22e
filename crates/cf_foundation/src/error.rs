// crates/cf_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `CfError` 枚举和 `CfResult` 类型别名，用于整个项目的错误处理。
//!
//! # 设计原则
//!
//! 1. **层次化**: 基础层只定义核心错误，壁面几何、IO、配置错误在各自 crate 中定义并转换
//! 2. **易用性**: 提供便捷的构造方法
//! 3. **快速失败**: 所有错误均不重试，由顶层驱动决定终止
//!
//! # 示例
//!
//! ```
//! use cf_foundation::error::{CfError, CfResult};
//!
//! fn read_ubar() -> CfResult<()> {
//!     Err(CfError::missing_config("transport.ubar"))
//! }
//! assert!(read_ubar().is_err());
//! ```

use thiserror::Error;

/// 统一结果类型
pub type CfResult<T> = Result<T, CfError>;

/// ChanFlow 错误类型
#[derive(Error, Debug)]
pub enum CfError {
    // ========================================================================
    // IO 相关错误
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },

    // ========================================================================
    // 数据与网格
    // ========================================================================
    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    /// 索引越界
    #[error("索引越界: {index_type} 索引 {index} 超出范围 0..{len}")]
    IndexOutOfBounds {
        /// 索引类别描述
        index_type: &'static str,
        /// 访问的索引
        index: usize,
        /// 上界（长度）
        len: usize,
    },

    /// 无效网格
    #[error("无效的网格: {message}")]
    InvalidMesh {
        /// 具体错误信息
        message: String,
    },

    /// 壁面几何不满足平直槽道假设
    #[error("壁面几何错误: {message}")]
    WallGeometry {
        /// 具体错误信息
        message: String,
    },

    // ========================================================================
    // 配置
    // ========================================================================
    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 缺少配置项
    #[error("缺少必需的配置项: {key}")]
    MissingConfig {
        /// 配置键名
        key: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    // ========================================================================
    // 数值求解
    // ========================================================================
    /// 线性求解失败
    #[error("求解失败: {equation} 经 {iterations} 次迭代, 残差 {residual:.3e}: {reason}")]
    Solver {
        /// 方程名称
        equation: String,
        /// 迭代次数
        iterations: usize,
        /// 最终残差
        residual: f64,
        /// 失败原因
        reason: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl CfError {
    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 索引越界
    pub fn index_out_of_bounds(index_type: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds {
            index_type,
            index,
            len,
        }
    }

    /// 无效网格
    pub fn invalid_mesh(message: impl Into<String>) -> Self {
        Self::InvalidMesh {
            message: message.into(),
        }
    }

    /// 壁面几何错误
    pub fn wall_geometry(message: impl Into<String>) -> Self {
        Self::WallGeometry {
            message: message.into(),
        }
    }

    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 缺少配置
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfig { key: key.into() }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// 线性求解失败
    pub fn solver(
        equation: impl Into<String>,
        iterations: usize,
        residual: f64,
        reason: impl Into<String>,
    ) -> Self {
        Self::Solver {
            equation: equation.into(),
            iterations,
            residual,
            reason: reason.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 是否为几何类致命错误
    pub fn is_geometry(&self) -> bool {
        matches!(self, Self::WallGeometry { .. } | Self::InvalidMesh { .. })
    }
}

impl From<std::io::Error> for CfError {
    fn from(err: std::io::Error) -> Self {
        Self::io_with_source(err.to_string(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CfError::invalid_config("momentum.relaxation", "1.5", "必须在 (0, 1] 内");
        let msg = err.to_string();
        assert!(msg.contains("momentum.relaxation"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_geometry_classification() {
        assert!(CfError::wall_geometry("no wall").is_geometry());
        assert!(!CfError::missing_config("transport.ubar").is_geometry());
    }

    #[test]
    fn test_io_conversion_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CfError = io.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
