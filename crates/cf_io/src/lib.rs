// crates/cf_io/src/lib.rs

//! ChanFlow IO 模块
//!
//! 提供剖面曲线与场数据的持久化输出。
//!
//! # 模块
//!
//! - [`graph`]: 一维剖面曲线写出（raw / csv / json）
//! - [`field`]: 场快照写出（自动写出的 `U`、`R`）
//! - [`error`]: IO 错误类型
//!
//! # 输出布局
//!
//! ```text
//! <output>/<time>/Uf.xy
//! <output>/<time>/U.json
//! <output>/<time>/R.json
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod field;
pub mod graph;

pub use error::{IoError, IoResult};
pub use field::{FieldSnapshot, FieldWriter, JsonFieldWriter, MemoryFieldWriter};
pub use graph::{FileGraphWriter, Graph, GraphFormat, GraphWriter, MemoryGraphWriter};

/// 时间目录名
///
/// 最多保留 6 位小数并去除末尾的零，`100.0 -> "100"`，`0.25 -> "0.25"`。
pub fn time_name(time: f64) -> String {
    let s = format!("{:.6}", time);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::time_name;

    #[test]
    fn test_time_name() {
        assert_eq!(time_name(100.0), "100");
        assert_eq!(time_name(0.25), "0.25");
        assert_eq!(time_name(0.1 + 0.2), "0.3");
        assert_eq!(time_name(0.0), "0");
    }
}
