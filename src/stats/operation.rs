//! 操作统计 - 跟踪哈希表操作次数和耗时

use crate::{stats::bump, types::OperationType};
use std::{cell::Cell, time::Duration};

/// 操作统计接口
pub trait OperationRecorder {
    /// 记录操作，`success == false` 表示操作被拒绝或失败
    fn record(&self, op_type: OperationType, duration: Duration, success: bool);

    /// 获取操作统计快照
    fn snapshot(&self) -> OperationStatsSnapshot;

    /// 重置统计
    fn reset(&self);

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String;
}

/// 操作统计快照
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub insert_count: u64,
    pub update_count: u64,
    pub get_count: u64,
    pub remove_count: u64,
    pub clear_count: u64,
    pub failed_count: u64,
    pub total_duration: u64, // 纳秒
}

impl OperationStatsSnapshot {
    pub fn count(&self, op_type: OperationType) -> u64 {
        match op_type {
            OperationType::Insert => self.insert_count,
            OperationType::Update => self.update_count,
            OperationType::Get => self.get_count,
            OperationType::Remove => self.remove_count,
            OperationType::Clear => self.clear_count,
        }
    }
}

/// 单线程操作统计
///
/// 计数器使用 `Cell`，读操作也能在 `&self` 下记录。
#[derive(Debug, Default)]
pub struct LocalOperationStats {
    insert_count: Cell<u64>,
    update_count: Cell<u64>,
    get_count: Cell<u64>,
    remove_count: Cell<u64>,
    clear_count: Cell<u64>,
    failed_count: Cell<u64>,
    total_duration: Cell<u64>,
}

impl LocalOperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, op_type: OperationType) -> &Cell<u64> {
        match op_type {
            OperationType::Insert => &self.insert_count,
            OperationType::Update => &self.update_count,
            OperationType::Get => &self.get_count,
            OperationType::Remove => &self.remove_count,
            OperationType::Clear => &self.clear_count,
        }
    }
}

impl OperationRecorder for LocalOperationStats {
    fn record(&self, op_type: OperationType, duration: Duration, success: bool) {
        if success {
            bump(self.counter(op_type), 1);
        } else {
            bump(&self.failed_count, 1);
        }
        bump(&self.total_duration, duration.as_nanos() as u64);
    }

    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            insert_count: self.insert_count.get(),
            update_count: self.update_count.get(),
            get_count: self.get_count.get(),
            remove_count: self.remove_count.get(),
            clear_count: self.clear_count.get(),
            failed_count: self.failed_count.get(),
            total_duration: self.total_duration.get(),
        }
    }

    fn reset(&self) {
        for op_type in OperationType::ALL {
            self.counter(op_type).set(0);
        }
        self.failed_count.set(0);
        self.total_duration.set(0);
    }

    fn export_prometheus(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();

        for op in OperationType::ALL {
            let name = op.as_str();
            output.push_str(&format!(
                "# HELP chained_operation_{}_count Total {} operations\n",
                name, name
            ));
            output.push_str(&format!("# TYPE chained_operation_{}_count counter\n", name));
            output.push_str(&format!(
                "chained_operation_{}_count {}\n",
                name,
                snapshot.count(op)
            ));
        }

        output.push_str("# HELP chained_operation_failed_count Rejected or failed operations\n");
        output.push_str("# TYPE chained_operation_failed_count counter\n");
        output.push_str(&format!(
            "chained_operation_failed_count {}\n",
            snapshot.failed_count
        ));

        output.push_str("# HELP chained_operation_duration_total Total operation time (seconds)\n");
        output.push_str("# TYPE chained_operation_duration_total counter\n");
        output.push_str(&format!(
            "chained_operation_duration_total {:.6}\n",
            Duration::from_nanos(snapshot.total_duration).as_secs_f64()
        ));

        output
    }
}

/// 禁用操作统计
#[derive(Debug, Default)]
pub struct DisabledOperationRecorder;

impl OperationRecorder for DisabledOperationRecorder {
    fn record(&self, _op_type: OperationType, _duration: Duration, _success: bool) {}
    fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot::default()
    }
    fn reset(&self) {}
    fn export_prometheus(&self) -> String {
        String::new()
    }
}
