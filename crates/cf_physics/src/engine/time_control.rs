// crates/cf_physics/src/engine/time_control.rs

//! 时间控制
//!
//! 定常问题的"时间"只是迭代计数：`time = start + index · Δt`。
//! 时间按索引重算，不累加 Δt，避免长时间运行的舍入漂移。
//!
//! ## 输出判定
//!
//! - `TimeStep`: `index % interval == 0`
//! - `RunTime`: `⌊(t − t₀ + Δt/2)/interval⌋` 在本步增加时输出

use cf_foundation::{CfError, CfResult};
use cf_io::time_name;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// 输出控制方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteControl {
    /// 每 `interval` 个时间步
    #[default]
    TimeStep,
    /// 每 `interval` 物理时间
    RunTime,
}

/// 时间控制器
#[derive(Debug, Clone)]
pub struct TimeControl {
    start_time: f64,
    end_time: f64,
    delta_t: f64,
    write_control: WriteControl,
    write_interval: f64,

    time: f64,
    time_index: usize,

    clock_start: Instant,
    execution: Duration,
    step_start: Option<Instant>,
}

impl TimeControl {
    /// 创建
    pub fn new(
        start_time: f64,
        end_time: f64,
        delta_t: f64,
        write_control: WriteControl,
        write_interval: f64,
    ) -> CfResult<Self> {
        if !(delta_t.is_finite() && delta_t > 0.0) {
            return Err(CfError::invalid_config("time.delta_t", delta_t.to_string(), "必须为正数"));
        }
        if end_time.is_nan() || end_time < start_time {
            return Err(CfError::invalid_config(
                "time.end_time",
                end_time.to_string(),
                "不能小于 start_time",
            ));
        }
        if !(write_interval.is_finite() && write_interval > 0.0) {
            return Err(CfError::invalid_config(
                "time.write_interval",
                write_interval.to_string(),
                "必须为正数",
            ));
        }
        Ok(Self {
            start_time,
            end_time,
            delta_t,
            write_control,
            write_interval,
            time: start_time,
            time_index: 0,
            clock_start: Instant::now(),
            execution: Duration::ZERO,
            step_start: None,
        })
    }

    /// 推进一个时间步，已到达结束时间时返回 `false`
    pub fn loop_step(&mut self) -> bool {
        self.finish_step();
        if !self.is_running() {
            return false;
        }
        self.time_index += 1;
        self.time = self.start_time + self.time_index as f64 * self.delta_t;
        self.step_start = Some(Instant::now());
        true
    }

    /// 是否还有剩余时间步
    #[inline]
    pub fn is_running(&self) -> bool {
        self.time < self.end_time - 0.5 * self.delta_t
    }

    fn finish_step(&mut self) {
        if let Some(start) = self.step_start.take() {
            self.execution += start.elapsed();
        }
    }

    /// 当前时间
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// 当前时间步索引（从 1 开始，初始为 0）
    #[inline]
    pub fn time_index(&self) -> usize {
        self.time_index
    }

    /// 时间步长
    #[inline]
    pub fn delta_t(&self) -> f64 {
        self.delta_t
    }

    /// 结束时间
    #[inline]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// 当前时间目录名
    pub fn time_name(&self) -> String {
        time_name(self.time)
    }

    /// 当前步是否输出
    pub fn is_write_step(&self) -> bool {
        if self.time_index == 0 {
            return false;
        }
        match self.write_control {
            WriteControl::TimeStep => {
                let interval = (self.write_interval.round() as usize).max(1);
                self.time_index % interval == 0
            }
            WriteControl::RunTime => {
                let index = |t: f64| ((t - self.start_time + 0.5 * self.delta_t) / self.write_interval).floor();
                index(self.time) > index(self.time - self.delta_t)
            }
        }
    }

    /// 各时间步内累计的墙钟时间（秒）
    ///
    /// 只统计 `loop_step` 之间的步内时间，不是进程 CPU 时间。
    pub fn elapsed_execution_time(&self) -> f64 {
        let running = self.step_start.map(|s| s.elapsed()).unwrap_or_default();
        (self.execution + running).as_secs_f64()
    }

    /// 自创建以来的墙钟时间（秒）
    pub fn elapsed_clock_time(&self) -> f64 {
        self.clock_start.elapsed().as_secs_f64()
    }
}
