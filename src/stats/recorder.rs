//! 统计记录器接口 - 定义统一统计API

use std::time::Duration;

use crate::{
    stats::{
        operation::{DisabledOperationRecorder, LocalOperationStats, OperationRecorder, OperationStatsSnapshot},
        resize::{DisabledResizeRecorder, ResizeAccumulatedSnapshot, ResizeRecorder, ResizeSnapshot, ResizeStats},
    },
    types::OperationType,
};

/// 统计记录器特征
pub trait StatsRecorder {
    /// 记录操作
    fn record_operation(&self, op_type: OperationType, duration: Duration, success: bool);

    /// 记录完成的扩容
    fn record_resize(&self, stats: ResizeSnapshot) {
        self.resize_stats().record_resize(stats);
    }

    /// 记录失败的扩容
    fn record_resize_failure(&self) {
        self.resize_stats().record_failure();
    }

    /// 获取操作统计接口
    fn operation_stats(&self) -> &dyn OperationRecorder;

    /// 获取扩容统计接口
    fn resize_stats(&self) -> &dyn ResizeRecorder;

    /// 重置所有统计
    fn reset(&self) {
        self.operation_stats().reset();
        self.resize_stats().reset();
    }

    /// 导出Prometheus格式指标
    fn export_prometheus(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.operation_stats().export_prometheus());
        output.push_str(&self.resize_stats().export_prometheus());
        output
    }

    /// 获取操作统计快照
    fn operation_stats_snapshot(&self) -> OperationStatsSnapshot {
        self.operation_stats().snapshot()
    }

    /// 获取扩容统计快照
    fn resize_stats_snapshot(&self) -> ResizeAccumulatedSnapshot {
        self.resize_stats().snapshot()
    }
}

/// 默认统计记录器实现，每个表各持一份
#[derive(Debug, Default)]
pub struct LocalStatsRecorder {
    operation: LocalOperationStats,
    resize: ResizeStats,
}

impl LocalStatsRecorder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsRecorder for LocalStatsRecorder {
    fn record_operation(&self, op_type: OperationType, duration: Duration, success: bool) {
        self.operation.record(op_type, duration, success);
    }

    fn operation_stats(&self) -> &dyn OperationRecorder {
        &self.operation
    }

    fn resize_stats(&self) -> &dyn ResizeRecorder {
        &self.resize
    }
}

/// 禁用统计的记录器
#[derive(Debug, Default)]
pub struct DisabledStatsRecorder;

impl StatsRecorder for DisabledStatsRecorder {
    fn record_operation(&self, _op_type: OperationType, _duration: Duration, _success: bool) {}
    fn operation_stats(&self) -> &dyn OperationRecorder {
        &DisabledOperationRecorder
    }
    fn resize_stats(&self) -> &dyn ResizeRecorder {
        &DisabledResizeRecorder
    }
}

/// 自定义统计记录器
struct CustomStatsRecorder {
    operation: Box<dyn OperationRecorder>,
    resize: Box<dyn ResizeRecorder>,
}

impl StatsRecorder for CustomStatsRecorder {
    fn record_operation(&self, op_type: OperationType, duration: Duration, success: bool) {
        self.operation.record(op_type, duration, success);
    }

    fn operation_stats(&self) -> &dyn OperationRecorder {
        self.operation.as_ref()
    }

    fn resize_stats(&self) -> &dyn ResizeRecorder {
        self.resize.as_ref()
    }
}

/// 统计记录器工厂
pub struct StatsRecorderFactory;

impl StatsRecorderFactory {
    /// 创建默认记录器
    pub fn create_default() -> Box<dyn StatsRecorder> {
        Box::new(LocalStatsRecorder::new())
    }

    /// 创建禁用统计的记录器
    pub fn create_disabled() -> Box<dyn StatsRecorder> {
        Box::new(DisabledStatsRecorder)
    }

    /// 组合自定义的操作与扩容记录器
    pub fn create_custom(
        operation: impl OperationRecorder + 'static,
        resize: impl ResizeRecorder + 'static,
    ) -> Box<dyn StatsRecorder> {
        Box::new(CustomStatsRecorder {
            operation: Box::new(operation),
            resize: Box::new(resize),
        })
    }
}
