// crates/cf_foundation/src/tensor.rs

//! 张量代数
//!
//! 在 `glam::DMat3` 之上提供有限体积法常用的二阶张量运算。
//!
//! # 约定
//!
//! - 完整张量用 `DMat3` 表示，元素 `(i, j)` 即 `m.col(j)[i]`
//! - 速度梯度 `G_ij = ∂u_j/∂x_i`
//! - `outer(a, b)` 的元素为 `a_i b_j`，因此 `outer(f, f) * v = f (f·v)`
//! - 对称张量 [`SymmTensor`] 存储 6 个独立分量 (xx, xy, xz, yy, yz, zz)

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 外积 `a ⊗ b`
#[inline]
pub fn outer(a: DVec3, b: DVec3) -> DMat3 {
    DMat3::from_cols(a * b.x, a * b.y, a * b.z)
}

/// 张量的迹
#[inline]
pub fn trace(m: DMat3) -> f64 {
    m.x_axis.x + m.y_axis.y + m.z_axis.z
}

/// `A + Aᵀ`
#[inline]
pub fn two_symm(m: DMat3) -> DMat3 {
    m + m.transpose()
}

/// 偏量部分 `A - tr(A)/3 I`
#[inline]
pub fn dev(m: DMat3) -> DMat3 {
    m - DMat3::IDENTITY * (trace(m) / 3.0)
}

/// `A - 2/3 tr(A) I`
#[inline]
pub fn dev2(m: DMat3) -> DMat3 {
    m - DMat3::IDENTITY * (2.0 * trace(m) / 3.0)
}

/// 双点积 `A : B`
#[inline]
pub fn double_dot(a: DMat3, b: DMat3) -> f64 {
    a.x_axis.dot(b.x_axis) + a.y_axis.dot(b.y_axis) + a.z_axis.dot(b.z_axis)
}

/// 张量模 `sqrt(A : A)`
#[inline]
pub fn mag(m: DMat3) -> f64 {
    double_dot(m, m).sqrt()
}

/// 对称张量分量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymmComponent {
    /// xx
    XX,
    /// xy
    XY,
    /// xz
    XZ,
    /// yy
    YY,
    /// yz
    YZ,
    /// zz
    ZZ,
}

/// 对称二阶张量
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SymmTensor {
    /// xx 分量
    pub xx: f64,
    /// xy 分量
    pub xy: f64,
    /// xz 分量
    pub xz: f64,
    /// yy 分量
    pub yy: f64,
    /// yz 分量
    pub yz: f64,
    /// zz 分量
    pub zz: f64,
}

impl SymmTensor {
    /// 零张量
    pub const ZERO: Self = Self {
        xx: 0.0,
        xy: 0.0,
        xz: 0.0,
        yy: 0.0,
        yz: 0.0,
        zz: 0.0,
    };

    /// 由 6 个分量创建
    #[inline]
    pub const fn new(xx: f64, xy: f64, xz: f64, yy: f64, yz: f64, zz: f64) -> Self {
        Self { xx, xy, xz, yy, yz, zz }
    }

    /// 球张量 `s I`
    #[inline]
    pub const fn sphere(s: f64) -> Self {
        Self::new(s, 0.0, 0.0, s, 0.0, s)
    }

    /// 取完整张量的对称部分
    pub fn from_mat(m: DMat3) -> Self {
        let at = |i: usize, j: usize| m.col(j)[i];
        Self {
            xx: at(0, 0),
            xy: 0.5 * (at(0, 1) + at(1, 0)),
            xz: 0.5 * (at(0, 2) + at(2, 0)),
            yy: at(1, 1),
            yz: 0.5 * (at(1, 2) + at(2, 1)),
            zz: at(2, 2),
        }
    }

    /// 转换为完整张量
    pub fn to_mat(self) -> DMat3 {
        DMat3::from_cols(
            DVec3::new(self.xx, self.xy, self.xz),
            DVec3::new(self.xy, self.yy, self.yz),
            DVec3::new(self.xz, self.yz, self.zz),
        )
    }

    /// 张量乘向量 `S · v`
    #[inline]
    pub fn dot(self, v: DVec3) -> DVec3 {
        DVec3::new(
            self.xx * v.x + self.xy * v.y + self.xz * v.z,
            self.xy * v.x + self.yy * v.y + self.yz * v.z,
            self.xz * v.x + self.yz * v.y + self.zz * v.z,
        )
    }

    /// 投影 `a · S · b`
    #[inline]
    pub fn inner(self, a: DVec3, b: DVec3) -> f64 {
        a.dot(self.dot(b))
    }

    /// 取单个分量
    #[inline]
    pub fn component(self, c: SymmComponent) -> f64 {
        match c {
            SymmComponent::XX => self.xx,
            SymmComponent::XY => self.xy,
            SymmComponent::XZ => self.xz,
            SymmComponent::YY => self.yy,
            SymmComponent::YZ => self.yz,
            SymmComponent::ZZ => self.zz,
        }
    }

    /// 迹
    #[inline]
    pub fn trace(self) -> f64 {
        self.xx + self.yy + self.zz
    }

    /// 模 `sqrt(S : S)`
    #[inline]
    pub fn mag(self) -> f64 {
        (self.xx * self.xx
            + self.yy * self.yy
            + self.zz * self.zz
            + 2.0 * (self.xy * self.xy + self.xz * self.xz + self.yz * self.yz))
            .sqrt()
    }

    /// 分量数组（序列化输出顺序 xx xy xz yy yz zz）
    pub fn to_array(self) -> [f64; 6] {
        [self.xx, self.xy, self.xz, self.yy, self.yz, self.zz]
    }

    /// 所有分量是否有限
    pub fn is_finite(self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

impl Add for SymmTensor {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(
            self.xx + o.xx,
            self.xy + o.xy,
            self.xz + o.xz,
            self.yy + o.yy,
            self.yz + o.yz,
            self.zz + o.zz,
        )
    }
}

impl AddAssign for SymmTensor {
    fn add_assign(&mut self, o: Self) {
        *self = *self + o;
    }
}

impl Sub for SymmTensor {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        self + (-o)
    }
}

impl Neg for SymmTensor {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

impl Mul<f64> for SymmTensor {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(
            self.xx * s,
            self.xy * s,
            self.xz * s,
            self.yy * s,
            self.yz * s,
            self.zz * s,
        )
    }
}
