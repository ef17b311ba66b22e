// crates/cf_io/src/graph.rs

//! 一维剖面曲线写出
//!
//! 每条曲线是按单元顺序排列的 `(y, value)` 点列，写出时不排序。

use crate::error::{IoError, IoResult};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// 曲线文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    /// 空格分隔两列
    #[default]
    Raw,
    /// 带表头的 CSV
    Csv,
    /// JSON 对象
    Json,
}

impl GraphFormat {
    /// 文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Raw => "xy",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::Csv => "csv",
            Self::Json => "json",
        };
        write!(f, "{}", name)
    }
}

/// 剖面曲线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// 曲线名（同时作为文件名）
    pub name: String,
    /// 横坐标名
    pub x_name: String,
    /// 点列
    pub points: Vec<(f64, f64)>,
}

impl Graph {
    /// 由横纵坐标构建，长度不一致时报错
    pub fn from_columns(name: impl Into<String>, x: &[f64], y: &[f64]) -> IoResult<Self> {
        let name = name.into();
        if x.len() != y.len() {
            return Err(IoError::InvalidData {
                name,
                message: format!("横坐标 {} 个点, 纵坐标 {} 个点", x.len(), y.len()),
            });
        }
        Ok(Self {
            name,
            x_name: "y".to_string(),
            points: x.iter().copied().zip(y.iter().copied()).collect(),
        })
    }

    /// 点数
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 按格式渲染为文本
    pub fn render(&self, format: GraphFormat) -> IoResult<String> {
        let mut out = String::with_capacity(self.points.len() * 32);
        match format {
            GraphFormat::Raw => {
                let _ = writeln!(out, "# {} {}", self.x_name, self.name);
                for (x, y) in &self.points {
                    let _ = writeln!(out, "{:.12e} {:.12e}", x, y);
                }
            }
            GraphFormat::Csv => {
                let _ = writeln!(out, "{},{}", self.x_name, self.name);
                for (x, y) in &self.points {
                    let _ = writeln!(out, "{:.12e},{:.12e}", x, y);
                }
            }
            GraphFormat::Json => {
                out = serde_json::to_string_pretty(self)?;
            }
        }
        Ok(out)
    }
}

/// 曲线写出接口
pub trait GraphWriter {
    /// 写出一条曲线到指定时间目录
    fn write_graph(&mut self, time_name: &str, graph: &Graph) -> IoResult<()>;
}

/// 文件曲线写出器
#[derive(Debug, Clone)]
pub struct FileGraphWriter {
    root: PathBuf,
    format: GraphFormat,
}

impl FileGraphWriter {
    /// 创建写出器
    pub fn new(root: impl Into<PathBuf>, format: GraphFormat) -> Self {
        Self {
            root: root.into(),
            format,
        }
    }

    /// 输出根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 曲线文件路径
    pub fn graph_path(&self, time_name: &str, name: &str) -> PathBuf {
        self.root
            .join(time_name)
            .join(format!("{}.{}", name, self.format.extension()))
    }
}

impl GraphWriter for FileGraphWriter {
    fn write_graph(&mut self, time_name: &str, graph: &Graph) -> IoResult<()> {
        let dir = self.root.join(time_name);
        std::fs::create_dir_all(&dir).map_err(|source| IoError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        let path = self.graph_path(time_name, &graph.name);
        let content = graph.render(self.format)?;
        std::fs::write(&path, content).map_err(|source| IoError::Write {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("写出曲线 {}", path.display());
        Ok(())
    }
}

/// 内存曲线写出器（测试与嵌入使用）
#[derive(Debug, Clone, Default)]
pub struct MemoryGraphWriter {
    /// 已写出的 (时间目录, 曲线)
    pub graphs: Vec<(String, Graph)>,
}

impl MemoryGraphWriter {
    /// 创建空写出器
    pub fn new() -> Self {
        Self::default()
    }

    /// 按名称查找最近一次写出的曲线
    pub fn latest(&self, name: &str) -> Option<&Graph> {
        self.graphs.iter().rev().find(|(_, g)| g.name == name).map(|(_, g)| g)
    }
}

impl GraphWriter for MemoryGraphWriter {
    fn write_graph(&mut self, time_name: &str, graph: &Graph) -> IoResult<()> {
        self.graphs.push((time_name.to_string(), graph.clone()));
        Ok(())
    }
}
