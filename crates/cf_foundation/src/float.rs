// crates/cf_foundation/src/float.rs

//! 数值保护常量与补偿求和
//!
//! 壁面函数诊断量的分母统一加上 [`ROOT_VSMALL`]，保证退化输入下
//! 得到有限（可能极大）的结果而不是除零。

/// 极小量的平方根，分母保护用
pub const ROOT_VSMALL: f64 = 1.0e-150;

/// 一般意义上的小量（几何判零用）
pub const SMALL: f64 = 1.0e-15;

/// Kahan 求和
///
/// 体积加权平均在大网格上累加误差明显，质量流量校正依赖其精度。
///
/// # 示例
///
/// ```
/// use cf_foundation::KahanSum;
///
/// let sum = KahanSum::sum_iter(std::iter::repeat(0.1).take(1000));
/// assert!((sum - 100.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum {
    sum: f64,
    compensation: f64,
}

impl KahanSum {
    /// 创建新的求和器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个值
    #[inline]
    pub fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// 获取当前求和值
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum
    }

    /// 从迭代器求和
    pub fn sum_iter<I: IntoIterator<Item = f64>>(iter: I) -> f64 {
        let mut kahan = Self::new();
        for v in iter {
            kahan.add(v);
        }
        kahan.value()
    }
}
