// crates/cf_physics/src/wall/mod.rs

//! 壁面几何
//!
//! 启动时扫描边界，确定代表性壁面面、壁面法向和采样线。

pub mod locator;

pub use locator::{
    SamplingLine, WallGeometry, WallLocator, WallLocatorError, WallSample, MAX_WALL_FACES,
    PARALLEL_LOWER, PARALLEL_UPPER,
};
