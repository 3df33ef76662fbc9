//! 哈希表核心模块 - 实现拉链哈希表及其组件

pub mod bucket;
pub mod chained_map;

pub use bucket::{Bucket, Entry};
pub use chained_map::{
    ChainedMap, ChainedMapConfig, ChainedMapStats, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR_THRESHOLD,
};

use once_cell::sync::Lazy;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<ChainedMapConfig> = Lazy::new(ChainedMapConfig::default);
