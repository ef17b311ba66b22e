// crates/cf_physics/src/numerics/linear_algebra/solver.rs

//! 预条件共轭梯度求解器
//!
//! 动量方程的扩散算子（含松弛后的对角）对称正定，
//! 用 Jacobi 预条件的 CG 求解每个速度分量。

use super::csr::CsrMatrix;
use serde::{Deserialize, Serialize};

/// 求解器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// 相对收敛容差
    pub rtol: f64,
    /// 绝对收敛容差
    pub atol: f64,
    /// 最大迭代次数
    pub max_iter: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rtol: 1e-10,
            atol: 1e-30,
            max_iter: 1000,
        }
    }
}

impl SolverConfig {
    /// 创建求解器配置
    pub fn new(rtol: f64, max_iter: usize) -> Self {
        Self {
            rtol,
            max_iter,
            ..Default::default()
        }
    }
}

/// 求解器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// 收敛
    Converged,
    /// 达到最大迭代次数
    MaxIterationsReached,
    /// 出现非有限值
    Diverged,
    /// 搜索方向退化（残差已无法继续下降）
    Stagnated,
}

/// 求解器结果
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// 求解状态
    pub status: SolverStatus,
    /// 迭代次数
    pub iterations: usize,
    /// 最终残差范数
    pub residual_norm: f64,
    /// 初始残差范数
    pub initial_residual_norm: f64,
}

impl SolverResult {
    /// 是否收敛
    pub fn is_converged(&self) -> bool {
        self.status == SolverStatus::Converged
    }
}

/// Jacobi 预条件器
#[derive(Debug, Clone)]
pub struct JacobiPreconditioner {
    inv_diag: Vec<f64>,
}

impl JacobiPreconditioner {
    /// 从 CSR 矩阵创建
    pub fn from_matrix(matrix: &CsrMatrix) -> Self {
        let inv_diag = matrix
            .extract_diagonal()
            .into_iter()
            .map(|d| if d.abs() > 1e-300 { 1.0 / d } else { 1.0 })
            .collect();
        Self { inv_diag }
    }

    /// z = M⁻¹ r
    #[inline]
    pub fn apply(&self, r: &[f64], z: &mut [f64]) {
        for ((zi, ri), di) in z.iter_mut().zip(r).zip(&self.inv_diag) {
            *zi = ri * di;
        }
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn norm2(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

#[inline]
fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// 预条件共轭梯度法求解器
#[derive(Debug, Clone)]
pub struct PcgSolver {
    config: SolverConfig,
    r: Vec<f64>,
    z: Vec<f64>,
    p: Vec<f64>,
    ap: Vec<f64>,
}

impl PcgSolver {
    /// 创建 PCG 求解器
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            r: Vec::new(),
            z: Vec::new(),
            p: Vec::new(),
            ap: Vec::new(),
        }
    }

    /// 配置
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    fn ensure_workspace(&mut self, n: usize) {
        if self.r.len() != n {
            self.r = vec![0.0; n];
            self.z = vec![0.0; n];
            self.p = vec![0.0; n];
            self.ap = vec![0.0; n];
        }
    }

    /// 求解 Ax = b，`x` 输入初值、输出解
    pub fn solve(
        &mut self,
        matrix: &CsrMatrix,
        b: &[f64],
        x: &mut [f64],
        precond: &JacobiPreconditioner,
    ) -> SolverResult {
        let n = b.len();
        self.ensure_workspace(n);

        // r = b - A*x
        matrix.mul_vec(x, &mut self.r);
        for (ri, bi) in self.r.iter_mut().zip(b) {
            *ri = bi - *ri;
        }

        let initial_norm = norm2(&self.r);
        let result = |status, iterations, residual_norm| SolverResult {
            status,
            iterations,
            residual_norm,
            initial_residual_norm: initial_norm,
        };

        if !initial_norm.is_finite() {
            return result(SolverStatus::Diverged, 0, initial_norm);
        }
        // b 为零时取零解，其余情况以 |b| 为相对尺度
        let scale = norm2(b).max(initial_norm);
        if initial_norm <= self.config.atol || initial_norm <= self.config.rtol * scale {
            return result(SolverStatus::Converged, 0, initial_norm);
        }

        precond.apply(&self.r, &mut self.z);
        self.p.copy_from_slice(&self.z);
        let mut rz = dot(&self.r, &self.z);

        for iter in 0..self.config.max_iter {
            matrix.mul_vec(&self.p, &mut self.ap);
            let pap = dot(&self.p, &self.ap);
            if pap.abs() < 1e-300 {
                return result(SolverStatus::Stagnated, iter, norm2(&self.r));
            }

            let alpha = rz / pap;
            axpy(alpha, &self.p, x);
            axpy(-alpha, &self.ap, &mut self.r);

            let res_norm = norm2(&self.r);
            tracing::trace!("PCG iter {}: residual = {:.6e}", iter + 1, res_norm);
            if !res_norm.is_finite() {
                return result(SolverStatus::Diverged, iter + 1, res_norm);
            }
            if res_norm <= self.config.atol || res_norm <= self.config.rtol * scale {
                return result(SolverStatus::Converged, iter + 1, res_norm);
            }

            precond.apply(&self.r, &mut self.z);
            let rz_new = dot(&self.r, &self.z);
            let beta = rz_new / rz;
            rz = rz_new;
            for (pi, zi) in self.p.iter_mut().zip(&self.z) {
                *pi = zi + beta * *pi;
            }
        }

        result(
            SolverStatus::MaxIterationsReached,
            self.config.max_iter,
            norm2(&self.r),
        )
    }
}
