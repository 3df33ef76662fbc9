//! 扩容统计 - 跟踪桶数组的重哈希

use crate::stats::bump;
use std::{cell::Cell, time::Duration};

/// 单次扩容详情
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSnapshot {
    pub from_capacity: usize,
    pub to_capacity: usize,
    pub migrated_entries: u64,
    pub duration: Duration,
}

/// 扩容统计接口
pub trait ResizeRecorder {
    /// 记录完成的扩容
    fn record_resize(&self, stats: ResizeSnapshot);

    /// 记录失败的扩容
    fn record_failure(&self);

    /// 获取扩容统计快照
    fn snapshot(&self) -> ResizeAccumulatedSnapshot;

    /// 重置统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 累积扩容统计快照
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ResizeAccumulatedSnapshot {
    pub count: u64,
    pub failure_count: u64,
    pub migrated_entries: u64,
    pub duration_sum: Duration,
    pub last_capacity: usize,
}

/// 单线程累积扩容统计
#[derive(Debug, Default)]
pub struct ResizeStats {
    count: Cell<u64>,
    failure_count: Cell<u64>,
    migrated_entries: Cell<u64>,
    duration_sum: Cell<u64>, // 纳秒
    last_capacity: Cell<usize>,
}

impl ResizeStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResizeRecorder for ResizeStats {
    fn record_resize(&self, stats: ResizeSnapshot) {
        bump(&self.count, 1);
        bump(&self.migrated_entries, stats.migrated_entries);
        bump(&self.duration_sum, stats.duration.as_nanos() as u64);
        self.last_capacity.set(stats.to_capacity);
    }

    fn record_failure(&self) {
        bump(&self.failure_count, 1);
    }

    fn snapshot(&self) -> ResizeAccumulatedSnapshot {
        ResizeAccumulatedSnapshot {
            count: self.count.get(),
            failure_count: self.failure_count.get(),
            migrated_entries: self.migrated_entries.get(),
            duration_sum: Duration::from_nanos(self.duration_sum.get()),
            last_capacity: self.last_capacity.get(),
        }
    }

    fn reset(&self) {
        self.count.set(0);
        self.failure_count.set(0);
        self.migrated_entries.set(0);
        self.duration_sum.set(0);
        self.last_capacity.set(0);
    }

    fn export_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();

        output.push_str("# HELP chained_resize_count Total completed resizes\n");
        output.push_str("# TYPE chained_resize_count counter\n");
        output.push_str(&format!("chained_resize_count {}\n", snapshot.count));

        output.push_str("# HELP chained_resize_failure_count Resizes rejected or failed to allocate\n");
        output.push_str("# TYPE chained_resize_failure_count counter\n");
        output.push_str(&format!(
            "chained_resize_failure_count {}\n",
            snapshot.failure_count
        ));

        output.push_str("# HELP chained_resize_migrated_entries Total entries rehashed by resizes\n");
        output.push_str("# TYPE chained_resize_migrated_entries counter\n");
        output.push_str(&format!(
            "chained_resize_migrated_entries {}\n",
            snapshot.migrated_entries
        ));

        let total_duration = snapshot.duration_sum.as_secs_f64();
        let avg_duration = if snapshot.count > 0 {
            total_duration / snapshot.count as f64
        } else {
            0.0
        };
        output.push_str("# HELP chained_resize_duration_avg Average resize duration (seconds)\n");
        output.push_str("# TYPE chained_resize_duration_avg gauge\n");
        output.push_str(&format!("chained_resize_duration_avg {:.6}\n", avg_duration));

        output
    }
}

/// 禁用扩容统计
#[derive(Debug, Default)]
pub struct DisabledResizeRecorder;

impl ResizeRecorder for DisabledResizeRecorder {
    fn record_resize(&self, _stats: ResizeSnapshot) {}
    fn record_failure(&self) {}
    fn snapshot(&self) -> ResizeAccumulatedSnapshot {
        ResizeAccumulatedSnapshot::default()
    }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_resizes() {
        let stats = ResizeStats::new();
        stats.record_resize(ResizeSnapshot {
            from_capacity: 4,
            to_capacity: 8,
            migrated_entries: 4,
            duration: Duration::from_micros(3),
        });
        stats.record_resize(ResizeSnapshot {
            from_capacity: 8,
            to_capacity: 16,
            migrated_entries: 7,
            duration: Duration::from_micros(5),
        });
        stats.record_failure();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.failure_count, 1);
        assert_eq!(snapshot.migrated_entries, 11);
        assert_eq!(snapshot.duration_sum, Duration::from_micros(8));
        assert_eq!(snapshot.last_capacity, 16);

        let metrics = stats.export_prometheus();
        assert!(metrics.contains("chained_resize_count 2"));
        assert!(metrics.contains("chained_resize_failure_count 1"));

        stats.reset();
        assert_eq!(stats.snapshot(), ResizeAccumulatedSnapshot::default());
    }

    #[test]
    fn test_counters_saturate() {
        let stats = ResizeStats::new();
        stats.migrated_entries.set(u64::MAX - 1);
        stats.count.set(u64::MAX);
        stats.record_resize(ResizeSnapshot {
            from_capacity: 2,
            to_capacity: 4,
            migrated_entries: 10,
            duration: Duration::ZERO,
        });
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.count, u64::MAX);
        assert_eq!(snapshot.migrated_entries, u64::MAX);
    }
}
