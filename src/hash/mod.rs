//! 哈希模块 - 统一管理哈希相关功能

pub mod strategy;

pub use strategy::{HashAlgorithm, HashStrategy, StdHashStrategy};

/// 默认哈希策略
pub fn default_hash_strategy() -> StdHashStrategy {
    StdHashStrategy::new(HashAlgorithm::AHash)
}

/// 由有符号哈希值计算桶索引
///
/// 取绝对值后对容量取模。`i64::MIN` 没有可表示的相反数，这里取其无符号模 `2^63`
/// 再取模，因此任何哈希值都得到确定的、位于 `[0, capacity)` 的索引。
///
/// `capacity` 必须大于0。
pub fn bucket_index(hash: i64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "capacity must be positive");
    (hash.unsigned_abs() % capacity as u64) as usize
}
