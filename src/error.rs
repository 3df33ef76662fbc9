//! 统一错误处理 - 哈希表所有可能错误类型和恢复建议

/// 拉链哈希表可能发生的错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainedMapError {
    #[error("无效参数: {reason}")]
    InvalidArgument {
        reason: String,
    },

    #[error("键不能为空 (操作: {operation})")]
    NullKey {
        operation: &'static str,
    },

    #[error("扩容失败 (当前容量: {capacity}, 目标容量: {requested})")]
    ResizeFailed {
        capacity: usize,
        requested: usize,
    },
}

impl ChainedMapError {
    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidArgument { .. } => Some("检查容量与负载因子配置，容量必须大于0"),
            Self::NullKey { .. } => Some("使用非空键重试操作"),
            Self::ResizeFailed { .. } => Some("检查系统内存或调高 max_capacity 限制"),
        }
    }

    /// 判断错误是否可恢复
    ///
    /// 扩容失败不可恢复：表仍保持插入前的状态，但同一插入在调高
    /// `max_capacity` 或有更多内存之前不会成功，重试没有意义。
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ResizeFailed { .. })
    }

    /// 是否为调用方使用错误（参数或空键）
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. } | Self::NullKey { .. })
    }
}
