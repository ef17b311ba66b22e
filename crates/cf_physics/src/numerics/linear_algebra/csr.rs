// crates/cf_physics/src/numerics/linear_algebra/csr.rs

//! 压缩稀疏行（CSR）矩阵格式
//!
//! 有限体积离散得到的矩阵每行只有本单元与面相邻单元的系数，
//! CSR 存储适合高效的矩阵-向量乘法 (SpMV) 和对角元提取。
//!
//! # 特性开关
//!
//! - `parallel`: 启用基于 `rayon` 的并行矩阵-向量乘法
//!
//! # 格式说明
//!
//! - `row_ptr`: 行指针，长度 n_rows + 1
//! - `col_idx`: 列索引，每行内有序
//! - `values`: 非零元值
//!
//! # 使用示例
//!
//! ```
//! use cf_physics::numerics::linear_algebra::CsrBuilder;
//!
//! let mut builder = CsrBuilder::new_square(2);
//! builder.add(0, 0, 2.0);
//! builder.add(0, 1, -1.0);
//! builder.add(1, 0, -1.0);
//! builder.add(1, 1, 2.0);
//! let matrix = builder.build();
//!
//! let mut y = vec![0.0; 2];
//! matrix.mul_vec(&[1.0, 1.0], &mut y);
//! assert_eq!(y, vec![1.0, 1.0]);
//! ```

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use std::collections::BTreeMap;

// =============================================================================
// 稀疏模式
// =============================================================================

/// CSR 矩阵的稀疏模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrPattern {
    n_rows: usize,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
}

impl CsrPattern {
    /// 行数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// 列数
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// 非零元数量
    #[inline]
    pub fn nnz(&self) -> usize {
        self.col_idx.len()
    }

    /// 第 row 行的非零元列索引
    #[inline]
    pub fn row_indices(&self, row: usize) -> &[usize] {
        &self.col_idx[self.row_ptr[row]..self.row_ptr[row + 1]]
    }

    /// 查找 (row, col) 对应的值索引
    pub fn find_index(&self, row: usize, col: usize) -> Option<usize> {
        let start = self.row_ptr[row];
        // 列索引有序
        self.row_indices(row)
            .binary_search(&col)
            .ok()
            .map(|local| start + local)
    }
}

// =============================================================================
// CSR 矩阵
// =============================================================================

/// CSR 格式稀疏矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    pattern: CsrPattern,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// 行数
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.pattern.n_rows
    }

    /// 列数
    #[inline]
    pub fn n_cols(&self) -> usize {
        self.pattern.n_cols
    }

    /// 非零元数量
    #[inline]
    pub fn nnz(&self) -> usize {
        self.pattern.nnz()
    }

    /// 稀疏模式
    #[inline]
    pub fn pattern(&self) -> &CsrPattern {
        &self.pattern
    }

    /// 非零元值
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// (row, col) 的值，不存在时为 0
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.pattern
            .find_index(row, col)
            .map(|i| self.values[i])
            .unwrap_or(0.0)
    }

    /// 对角元
    #[inline]
    pub fn diagonal_value(&self, row: usize) -> Option<f64> {
        self.pattern.find_index(row, row).map(|i| self.values[i])
    }

    /// 全部对角元（缺失为 0）
    pub fn extract_diagonal(&self) -> Vec<f64> {
        (0..self.n_rows())
            .map(|i| self.diagonal_value(i).unwrap_or(0.0))
            .collect()
    }

    /// 将对角元替换为 `f(row, old)`
    pub fn update_diagonal(&mut self, f: impl Fn(usize, f64) -> f64) {
        for row in 0..self.n_rows() {
            if let Some(i) = self.pattern.find_index(row, row) {
                self.values[i] = f(row, self.values[i]);
            }
        }
    }

    /// 第 row 行非对角元绝对值之和
    pub fn off_diagonal_sum(&self, row: usize) -> f64 {
        let start = self.pattern.row_ptr[row];
        self.pattern
            .row_indices(row)
            .iter()
            .enumerate()
            .filter(|(_, &col)| col != row)
            .map(|(k, _)| self.values[start + k].abs())
            .sum()
    }

    /// 矩阵-向量乘法 y = A * x
    ///
    /// # Panics
    /// - `x.len() != self.n_cols()`
    /// - `y.len() != self.n_rows()`
    pub fn mul_vec(&self, x: &[f64], y: &mut [f64]) {
        assert_eq!(x.len(), self.n_cols(), "x 长度必须等于矩阵列数");
        assert_eq!(y.len(), self.n_rows(), "y 长度必须等于矩阵行数");

        #[cfg(feature = "parallel")]
        {
            y.par_iter_mut()
                .enumerate()
                .for_each(|(row, out)| *out = self.row_dot(row, x));
        }
        #[cfg(not(feature = "parallel"))]
        {
            for (row, out) in y.iter_mut().enumerate() {
                *out = self.row_dot(row, x);
            }
        }
    }

    #[inline]
    fn row_dot(&self, row: usize, x: &[f64]) -> f64 {
        let start = self.pattern.row_ptr[row];
        let end = self.pattern.row_ptr[row + 1];
        (start..end)
            .map(|idx| self.values[idx] * x[self.pattern.col_idx[idx]])
            .sum()
    }

    /// 检查是否对称
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.n_rows()).all(|row| {
            self.pattern
                .row_indices(row)
                .iter()
                .all(|&col| (self.get(row, col) - self.get(col, row)).abs() <= tol)
        })
    }
}

// =============================================================================
// 构建器
// =============================================================================

/// CSR 矩阵构建器
///
/// 组装阶段按行用 `BTreeMap` 累加，构建时列索引自然有序。
#[derive(Debug, Clone)]
pub struct CsrBuilder {
    n_rows: usize,
    n_cols: usize,
    rows: Vec<BTreeMap<usize, f64>>,
}

impl CsrBuilder {
    /// 创建方阵构建器
    #[inline]
    pub fn new_square(n: usize) -> Self {
        Self::new(n, n)
    }

    /// 创建构建器
    pub fn new(n_rows: usize, n_cols: usize) -> Self {
        Self {
            n_rows,
            n_cols,
            rows: vec![BTreeMap::new(); n_rows],
        }
    }

    /// 累加到 (row, col)
    ///
    /// # Panics
    /// - `row >= n_rows`
    /// - `col >= n_cols`
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.n_rows, "行索引越界");
        assert!(col < self.n_cols, "列索引越界");
        *self.rows[row].entry(col).or_insert(0.0) += value;
    }

    /// (row, col) 的当前值
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row].get(&col).copied().unwrap_or(0.0)
    }

    /// 当前非零元总数
    #[inline]
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(|r| r.len()).sum()
    }

    /// 构建 CSR 矩阵（消耗构建器）
    pub fn build(self) -> CsrMatrix {
        let nnz = self.nnz();
        let mut row_ptr = Vec::with_capacity(self.n_rows + 1);
        let mut col_idx = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);

        row_ptr.push(0);
        for row_map in self.rows {
            for (col, val) in row_map {
                col_idx.push(col);
                values.push(val);
            }
            row_ptr.push(col_idx.len());
        }

        CsrMatrix {
            pattern: CsrPattern {
                n_rows: self.n_rows,
                n_cols: self.n_cols,
                row_ptr,
                col_idx,
            },
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(n: usize) -> CsrMatrix {
        let mut b = CsrBuilder::new_square(n);
        for i in 0..n {
            b.add(i, i, 2.0);
            if i > 0 {
                b.add(i, i - 1, -1.0);
            }
            if i + 1 < n {
                b.add(i, i + 1, -1.0);
            }
        }
        b.build()
    }

    #[test]
    fn test_builder_accumulates() {
        let mut b = CsrBuilder::new_square(2);
        b.add(0, 0, 1.0);
        b.add(0, 0, 2.5);
        assert_eq!(b.get(0, 0), 3.5);
        let m = b.build();
        assert_eq!(m.nnz(), 1);
        assert_eq!(m.diagonal_value(1), None);
        assert_eq!(m.extract_diagonal(), vec![3.5, 0.0]);
    }

    #[test]
    fn test_mul_vec() {
        let m = tridiagonal(4);
        let mut y = vec![0.0; 4];
        m.mul_vec(&[1.0, 2.0, 3.0, 4.0], &mut y);
        assert_eq!(y, vec![0.0, 0.0, 0.0, 5.0]);
    }

    #[test]
    fn test_update_diagonal_and_off_sum() {
        let mut m = tridiagonal(3);
        m.update_diagonal(|_, d| d / 0.5);
        assert_eq!(m.extract_diagonal(), vec![4.0, 4.0, 4.0]);
        assert_eq!(m.off_diagonal_sum(1), 2.0);
        assert!(m.is_symmetric(0.0));
    }
}
