// crates/cf_io/src/field.rs

//! 场快照写出
//!
//! 输出步上自动写出的场（速度 `U`、雷诺应力 `R`）以 JSON 形式落盘，
//! 每个单元一行分量数组。

use crate::error::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 场快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    /// 场名
    pub name: String,
    /// 物理时间
    pub time: f64,
    /// 每个值的分量数（标量 1，矢量 3，对称张量 6）
    pub components: usize,
    /// 内部场值
    pub internal: Vec<Vec<f64>>,
    /// 各 patch 的边界值（按 patch 名）
    pub boundary: Vec<(String, Vec<Vec<f64>>)>,
}

impl FieldSnapshot {
    /// 校验分量数一致
    pub fn validate(&self) -> IoResult<()> {
        let bad = self
            .internal
            .iter()
            .chain(self.boundary.iter().flat_map(|(_, v)| v.iter()))
            .any(|row| row.len() != self.components);
        if bad {
            return Err(IoError::InvalidData {
                name: self.name.clone(),
                message: format!("存在分量数不等于 {} 的值", self.components),
            });
        }
        Ok(())
    }
}

/// 场写出接口
pub trait FieldWriter {
    /// 写出一个场到指定时间目录
    fn write_field(&mut self, time_name: &str, field: &FieldSnapshot) -> IoResult<()>;
}

/// JSON 场写出器
#[derive(Debug, Clone)]
pub struct JsonFieldWriter {
    root: PathBuf,
}

impl JsonFieldWriter {
    /// 创建写出器
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FieldWriter for JsonFieldWriter {
    fn write_field(&mut self, time_name: &str, field: &FieldSnapshot) -> IoResult<()> {
        field.validate()?;
        let dir = self.root.join(time_name);
        std::fs::create_dir_all(&dir).map_err(|source| IoError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(format!("{}.json", field.name));
        let content = serde_json::to_string(field)?;
        std::fs::write(&path, content).map_err(|source| IoError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("写出场 {}", path.display());
        Ok(())
    }
}

/// 内存场写出器
#[derive(Debug, Clone, Default)]
pub struct MemoryFieldWriter {
    /// 已写出的 (时间目录, 场)
    pub fields: Vec<(String, FieldSnapshot)>,
}

impl MemoryFieldWriter {
    /// 创建空写出器
    pub fn new() -> Self {
        Self::default()
    }
}

impl FieldWriter for MemoryFieldWriter {
    fn write_field(&mut self, time_name: &str, field: &FieldSnapshot) -> IoResult<()> {
        field.validate()?;
        self.fields.push((time_name.to_string(), field.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn velocity() -> FieldSnapshot {
        FieldSnapshot {
            name: "U".to_string(),
            time: 1.0,
            components: 3,
            internal: vec![vec![1.0, 0.0, 0.0], vec![2.0, 0.0, 0.0]],
            boundary: vec![("bottomWall".to_string(), vec![vec![0.0, 0.0, 0.0]])],
        }
    }

    #[test]
    fn test_component_mismatch_rejected() {
        let mut field = velocity();
        field.internal[1].pop();
        assert!(field.validate().is_err());
        assert!(MemoryFieldWriter::new().write_field("1", &field).is_err());
    }

    #[test]
    fn test_json_writer_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = JsonFieldWriter::new(dir.path());
        writer.write_field("1", &velocity()).unwrap();
        let text = std::fs::read_to_string(dir.path().join("1").join("U.json")).unwrap();
        let back: FieldSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back, velocity());
    }
}
