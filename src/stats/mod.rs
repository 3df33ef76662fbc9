//! 统计模块 - 统一管理哈希表性能指标
//!
//! 记录器都是单线程的，使用 `Cell` 计数，与表本身一样不做任何同步。

pub mod operation;
pub mod recorder;
pub mod resize;

pub use operation::{DisabledOperationRecorder, LocalOperationStats, OperationRecorder, OperationStatsSnapshot};
pub use recorder::{DisabledStatsRecorder, LocalStatsRecorder, StatsRecorder, StatsRecorderFactory};
pub use resize::{DisabledResizeRecorder, ResizeAccumulatedSnapshot, ResizeRecorder, ResizeSnapshot, ResizeStats};

use std::cell::Cell;

/// 饱和累加计数器
pub(crate) fn bump(cell: &Cell<u64>, by: u64) {
    cell.set(cell.get().saturating_add(by));
}
