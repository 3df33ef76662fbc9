//! Rust拉链法哈希表库
//!
//! 不依赖标准库 `HashMap` 的泛型键值容器：桶数组加拉链解决冲突，
//! 负载因子超过阈值时容量翻倍并重哈希。
//!
//! ## 主要特性
//! - 编译期泛型键值类型，无类型擦除
//! - 桶惰性分配，扩容只为非空目标分配桶
//! - 扩容原子化：所有内存预先可失败地分配，失败时表保持插入前状态
//! - 可替换的哈希策略（AHash / XxHash64 / SipHash 或自定义函数）
//! - 操作与扩容统计，支持 Prometheus 文本导出
//!
//! ## 快速开始
//!
//! ```rust
//! use chained_hashtable::*;
//!
//! fn main() -> Result<(), ChainedMapError> {
//!     // 创建默认配置的哈希表
//!     let mut map = ChainedMap::new();
//!
//!     // 插入键值对
//!     map.put("key1".to_string(), "value1")?;
//!
//!     // 获取值
//!     if let Some(value) = map.get(&"key1".to_string())? {
//!         println!("key1: {}", value);
//!     }
//!
//!     // 删除键
//!     map.remove(&"key1".to_string())?;
//!
//!     // 打印统计信息
//!     println!("{:?}", map.stats());
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}
// 核心模块导出
pub mod error;
pub mod hash;
pub mod map;
pub mod stats;
pub mod types;

// 公共接口导出
pub use crate::{
    error::ChainedMapError,
    hash::{bucket_index, default_hash_strategy, HashAlgorithm, HashStrategy, StdHashStrategy},
    map::{
        ChainedMap,
        ChainedMapConfig,
        ChainedMapStats,
        DEFAULT_CAPACITY,
        DEFAULT_LOAD_FACTOR_THRESHOLD,
    },
    stats::{StatsRecorder, StatsRecorderFactory},
    types::{ByteKey, Key, OperationType},
};

// 简化默认类型别名
pub type DefaultMap = ChainedMap<String, String>;

impl<K, V, S> std::fmt::Debug for ChainedMap<K, V, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedMap")
            .field("size", &self.size())
            .field("capacity", &self.capacity())
            .field("load_factor", &self.load_factor())
            .finish()
    }
}

// 便捷功能函数

/// 批量插入
///
/// 返回成功写入（新增或更新）的条目数，遇到空键或扩容失败的条目被跳过。
pub fn batch_insert<K, V, S>(
    map: &mut ChainedMap<K, V, S>,
    items: impl IntoIterator<Item = (K, V)>,
) -> usize
where
    K: Key,
    S: HashStrategy<K>,
{
    let mut count = 0;
    for (k, v) in items {
        match map.put(k, v) {
            Ok(_) => count += 1,
            Err(_err) => {
                log_warn!("batch insert skipped an item: {}", _err);
            }
        }
    }
    count
}

/// 批量查询
///
/// 空键按未命中处理。
pub fn batch_get<'a, K, V, S>(
    map: &ChainedMap<K, V, S>,
    keys: impl IntoIterator<Item = &'a K>,
) -> Vec<Option<V>>
where
    K: Key + 'a,
    V: Clone,
    S: HashStrategy<K>,
{
    keys.into_iter()
        .map(|k| map.get(k).ok().flatten().cloned())
        .collect()
}
