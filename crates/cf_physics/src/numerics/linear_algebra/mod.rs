// crates/cf_physics/src/numerics/linear_algebra/mod.rs

//! 稀疏线性代数
//!
//! - [`csr`]: CSR 矩阵与构建器
//! - [`solver`]: Jacobi 预条件 CG

pub mod csr;
pub mod solver;

pub use csr::{CsrBuilder, CsrMatrix, CsrPattern};
pub use solver::{JacobiPreconditioner, PcgSolver, SolverConfig, SolverResult, SolverStatus};
