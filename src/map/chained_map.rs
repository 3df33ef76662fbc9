//! 拉链哈希表核心实现

use crate::{
    error::ChainedMapError,
    hash::{bucket_index, HashAlgorithm, HashStrategy, StdHashStrategy},
    map::bucket::{Bucket, Entry},
    stats::{
        recorder::{LocalStatsRecorder, StatsRecorder},
        resize::ResizeSnapshot,
    },
    types::{Key, OperationType},
};
use std::{hash::Hash, mem, time::Instant};

/// 默认初始桶数量
pub const DEFAULT_CAPACITY: usize = 16;

/// 默认扩容阈值，负载因子严格大于该值时扩容
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.75;

/// 哈希表配置
#[derive(Clone, Debug, PartialEq)]
pub struct ChainedMapConfig {
    // 初始桶数量
    pub initial_capacity: usize,
    pub load_factor_threshold: f64,
    // 桶数量上限，扩容越过上限时以 ResizeFailed 拒绝插入
    pub max_capacity: Option<usize>,
    pub hash_algorithm: HashAlgorithm,
}

impl Default for ChainedMapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR_THRESHOLD,
            max_capacity: None,
            hash_algorithm: HashAlgorithm::AHash,
        }
    }
}

impl ChainedMapConfig {
    /// 默认配置，仅替换初始容量
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ChainedMapError> {
        if self.initial_capacity == 0 {
            return Err(ChainedMapError::invalid_argument("容量必须大于0"));
        }
        if !self.load_factor_threshold.is_finite() || self.load_factor_threshold <= 0.0 {
            return Err(ChainedMapError::invalid_argument(format!(
                "负载因子阈值必须是正有限数: {}",
                self.load_factor_threshold
            )));
        }
        if let Some(max_capacity) = self.max_capacity {
            if max_capacity < self.initial_capacity {
                return Err(ChainedMapError::invalid_argument(format!(
                    "max_capacity ({}) 小于初始容量 ({})",
                    max_capacity, self.initial_capacity
                )));
            }
        }
        Ok(())
    }
}

/// 哈希表统计信息
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChainedMapStats {
    pub size: usize,
    pub capacity: usize,
    pub load_factor: f64,
    // 已分配的桶（可能为空）
    pub materialized_buckets: usize,
    // 至少有一个条目的桶
    pub occupied_buckets: usize,
    pub longest_chain: usize,
    pub insert_count: u64,
    pub update_count: u64,
    pub get_count: u64,
    pub remove_count: u64,
    pub rejected_count: u64,
    pub resize_count: u64,
    pub failed_resize_count: u64,
    pub migrated_entries: u64,
}

/// 拉链哈希表
///
/// 单线程容器：不加锁也不使用原子操作，多线程共享时由调用方在外部加锁。
pub struct ChainedMap<K, V, S = StdHashStrategy> {
    // 桶数组，`None` 表示尚未分配的桶
    buckets: Vec<Option<Bucket<K, V>>>,

    // 所有桶中的条目总数
    size: usize,

    // 配置
    config: ChainedMapConfig,

    // 哈希策略
    hasher: S,

    // 统计记录器
    stats_recorder: Box<dyn StatsRecorder>,
}

impl<K: Key + Hash, V> ChainedMap<K, V> {
    /// 使用默认容量创建，总是成功
    pub fn new() -> Self {
        let config = crate::map::DEFAULT_CONFIG.clone();
        let hasher = StdHashStrategy::new(config.hash_algorithm);
        let buckets = (0..config.initial_capacity).map(|_| None).collect();
        Self::from_parts(config, hasher, buckets)
    }

    /// 使用指定初始容量创建，容量为0时返回 `InvalidArgument`
    pub fn with_capacity(capacity: usize) -> Result<Self, ChainedMapError> {
        Self::with_config(ChainedMapConfig::with_capacity(capacity))
    }

    /// 使用完整配置创建
    pub fn with_config(config: ChainedMapConfig) -> Result<Self, ChainedMapError> {
        let hasher = StdHashStrategy::new(config.hash_algorithm);
        Self::with_config_and_hasher(config, hasher)
    }
}

impl<K: Key + Hash, V> Default for ChainedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedMap<K, V, S>
where
    K: Key,
    S: HashStrategy<K>,
{
    /// 使用调用方提供的哈希策略创建
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self, ChainedMapError> {
        Self::with_config_and_hasher(ChainedMapConfig::with_capacity(capacity), hasher)
    }

    /// 使用配置和哈希策略创建，`config.hash_algorithm` 被忽略
    pub fn with_config_and_hasher(config: ChainedMapConfig, hasher: S) -> Result<Self, ChainedMapError> {
        config.validate()?;
        let buckets = allocate_slots(config.initial_capacity).map_err(|_| {
            ChainedMapError::invalid_argument(format!("无法分配 {} 个桶", config.initial_capacity))
        })?;
        log_debug!(
            "created chained map: capacity={}, threshold={}",
            config.initial_capacity,
            config.load_factor_threshold
        );
        Ok(Self::from_parts(config, hasher, buckets))
    }

    /// 插入或更新
    ///
    /// 键已存在时原地替换值并返回旧值，大小不变；否则追加新条目，
    /// 负载因子超过阈值时在返回前扩容。扩容失败会撤销这次插入。
    pub fn put(&mut self, key: K, value: V) -> Result<Option<V>, ChainedMapError> {
        let start = Instant::now();
        if key.is_absent() {
            return Err(self.reject_null_key(OperationType::Insert));
        }

        let index = self.bucket_index(&key);
        let was_absent = self.buckets[index].is_none();
        let bucket = self.buckets[index].get_or_insert_with(Bucket::new);
        if let Some(entry) = bucket.find_mut(&key) {
            let previous = entry.replace_value(value);
            self.stats_recorder
                .record_operation(OperationType::Update, start.elapsed(), true);
            return Ok(Some(previous));
        }

        bucket.push(key, value);
        self.size += 1;

        if self.exceeds_threshold() {
            if let Err(err) = self.grow() {
                // 扩容没有触碰旧桶数组，新条目仍在原桶末尾；
                // 失败已由 record_resize_failure 计数
                if was_absent {
                    self.buckets[index] = None;
                } else if let Some(bucket) = self.buckets[index].as_mut() {
                    bucket.pop();
                }
                self.size -= 1;
                return Err(err);
            }
        }

        self.stats_recorder
            .record_operation(OperationType::Insert, start.elapsed(), true);
        Ok(None)
    }

    /// 查找键对应的值
    pub fn get(&self, key: &K) -> Result<Option<&V>, ChainedMapError> {
        let start = Instant::now();
        if key.is_absent() {
            return Err(self.reject_null_key(OperationType::Get));
        }

        let found = self
            .buckets[self.bucket_index(key)]
            .as_ref()
            .and_then(|bucket| bucket.find(key))
            .map(Entry::value);
        self.stats_recorder
            .record_operation(OperationType::Get, start.elapsed(), true);
        Ok(found)
    }

    /// 查找键对应的值的可变引用
    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>, ChainedMapError> {
        let start = Instant::now();
        if key.is_absent() {
            return Err(self.reject_null_key(OperationType::Get));
        }

        let index = self.bucket_index(key);
        self.stats_recorder
            .record_operation(OperationType::Get, start.elapsed(), true);
        Ok(self.buckets[index]
            .as_mut()
            .and_then(|bucket| bucket.find_mut(key))
            .map(Entry::value_mut))
    }

    /// 是否包含键
    pub fn contains_key(&self, key: &K) -> Result<bool, ChainedMapError> {
        self.get(key).map(|value| value.is_some())
    }

    /// 删除键并返回其值，键不存在时表保持不变。删除从不缩容。
    pub fn remove(&mut self, key: &K) -> Result<Option<V>, ChainedMapError> {
        let start = Instant::now();
        if key.is_absent() {
            return Err(self.reject_null_key(OperationType::Remove));
        }

        let index = self.bucket_index(key);
        let removed = self.buckets[index]
            .as_mut()
            .and_then(|bucket| bucket.remove(key));
        if removed.is_some() {
            self.size -= 1;
        }
        self.stats_recorder
            .record_operation(OperationType::Remove, start.elapsed(), true);
        Ok(removed)
    }

    fn bucket_index(&self, key: &K) -> usize {
        bucket_index(self.hasher.hash_key(key), self.buckets.len())
    }

    fn exceeds_threshold(&self) -> bool {
        self.size as f64 / self.buckets.len() as f64 > self.config.load_factor_threshold
    }

    fn reject_null_key(&self, op_type: OperationType) -> ChainedMapError {
        log_debug!("rejected null key in {}", op_type);
        self.stats_recorder
            .record_operation(op_type, std::time::Duration::ZERO, false);
        ChainedMapError::NullKey {
            operation: op_type.as_str(),
        }
    }

    fn resize_failed(&self, capacity: usize, requested: usize) -> ChainedMapError {
        log_warn!(
            "resize rejected: capacity={}, requested={}, size={}",
            capacity,
            requested,
            self.size
        );
        self.stats_recorder.record_resize_failure();
        ChainedMapError::ResizeFailed {
            capacity,
            requested,
        }
    }

    /// 容量翻倍并重哈希所有条目
    ///
    /// 新桶数组及每个目标桶都按精确大小预先分配，全部成功后才移动条目；
    /// 任一分配失败时旧桶数组保持原样。
    fn grow(&mut self) -> Result<(), ChainedMapError> {
        let start = Instant::now();
        let old_capacity = self.buckets.len();
        let new_capacity = match old_capacity.checked_mul(2) {
            Some(capacity) if self.config.max_capacity.map_or(true, |max| capacity <= max) => capacity,
            _ => return Err(self.resize_failed(old_capacity, old_capacity.saturating_mul(2))),
        };

        let (new_buckets, targets) = match self.prepare_buckets(new_capacity) {
            Some(prepared) => prepared,
            None => {
                log_error!("allocation for {} buckets failed", new_capacity);
                return Err(self.resize_failed(old_capacity, new_capacity));
            }
        };

        // 以下不再分配内存
        let old_buckets = mem::replace(&mut self.buckets, new_buckets);
        let mut migrated = 0usize;
        let entries = old_buckets.into_iter().flatten().flat_map(Bucket::into_entries);
        for (entry, target) in entries.zip(targets) {
            self.buckets[target]
                .get_or_insert_with(Bucket::new)
                .push_entry(entry);
            migrated += 1;
        }
        debug_assert_eq!(migrated, self.size, "resize must preserve every entry");
        self.size = migrated;

        let duration = start.elapsed();
        self.stats_recorder.record_resize(ResizeSnapshot {
            from_capacity: old_capacity,
            to_capacity: new_capacity,
            migrated_entries: migrated as u64,
            duration,
        });
        log_info!(
            "resized from {} to {} buckets, migrated {} entries in {:?}",
            old_capacity,
            new_capacity,
            migrated,
            duration
        );
        Ok(())
    }

    /// 计算每个条目在新容量下的目标桶，并分配好新桶数组
    ///
    /// 返回的目标索引与旧桶数组的遍历顺序一一对应。
    fn prepare_buckets(&self, new_capacity: usize) -> Option<(Vec<Option<Bucket<K, V>>>, Vec<usize>)> {
        let mut targets: Vec<usize> = Vec::new();
        targets.try_reserve_exact(self.size).ok()?;
        let mut counts: Vec<usize> = Vec::new();
        counts.try_reserve_exact(new_capacity).ok()?;
        counts.resize(new_capacity, 0);

        for entry in self.buckets.iter().flatten().flat_map(Bucket::iter) {
            let target = bucket_index(self.hasher.hash_key(entry.key()), new_capacity);
            targets.push(target);
            counts[target] += 1;
        }

        let mut buckets = Vec::new();
        buckets.try_reserve_exact(new_capacity).ok()?;
        for count in counts {
            if count == 0 {
                buckets.push(None);
            } else {
                buckets.push(Some(Bucket::try_with_capacity(count).ok()?));
            }
        }
        Some((buckets, targets))
    }
}

impl<K, V, S> ChainedMap<K, V, S> {
    fn from_parts(config: ChainedMapConfig, hasher: S, buckets: Vec<Option<Bucket<K, V>>>) -> Self {
        Self {
            buckets,
            size: 0,
            config,
            hasher,
            stats_recorder: Box::new(LocalStatsRecorder::new()),
        }
    }

    /// 替换统计记录器
    pub fn with_stats_recorder(mut self, recorder: Box<dyn StatsRecorder>) -> Self {
        self.stats_recorder = recorder;
        self
    }

    /// 条目数
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// 当前桶数量
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    pub fn load_factor_threshold(&self) -> f64 {
        self.config.load_factor_threshold
    }

    pub fn config(&self) -> &ChainedMapConfig {
        &self.config
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// 删除所有条目，已分配的桶和容量保留
    pub fn clear(&mut self) {
        let start = Instant::now();
        for bucket in self.buckets.iter_mut().flatten() {
            bucket.clear();
        }
        self.size = 0;
        self.stats_recorder
            .record_operation(OperationType::Clear, start.elapsed(), true);
    }

    /// 遍历所有条目，顺序不做保证
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .iter()
            .flatten()
            .flat_map(Bucket::iter)
            .map(|entry| (entry.key(), entry.value()))
    }

    /// 遍历所有条目的可变值
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&K, &mut V)> + '_ {
        self.buckets
            .iter_mut()
            .flatten()
            .flat_map(Bucket::iter_mut)
            .map(Entry::parts_mut)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// 统计快照
    pub fn stats(&self) -> ChainedMapStats {
        let mut materialized_buckets = 0;
        let mut occupied_buckets = 0;
        let mut longest_chain = 0;
        for bucket in self.buckets.iter().flatten() {
            materialized_buckets += 1;
            if !bucket.is_empty() {
                occupied_buckets += 1;
            }
            longest_chain = longest_chain.max(bucket.len());
        }

        let operations = self.stats_recorder.operation_stats_snapshot();
        let resizes = self.stats_recorder.resize_stats_snapshot();
        ChainedMapStats {
            size: self.size,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            materialized_buckets,
            occupied_buckets,
            longest_chain,
            insert_count: operations.insert_count,
            update_count: operations.update_count,
            get_count: operations.get_count,
            remove_count: operations.remove_count,
            rejected_count: operations.failed_count,
            resize_count: resizes.count,
            failed_resize_count: resizes.failure_count,
            migrated_entries: resizes.migrated_entries,
        }
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        let mut output = self.stats_recorder.export_prometheus();
        output.push_str("# HELP chained_map_size Current number of entries\n");
        output.push_str("# TYPE chained_map_size gauge\n");
        output.push_str(&format!("chained_map_size {}\n", self.size));
        output.push_str("# HELP chained_map_capacity Current number of buckets\n");
        output.push_str("# TYPE chained_map_capacity gauge\n");
        output.push_str(&format!("chained_map_capacity {}\n", self.capacity()));
        output
    }
}

fn allocate_slots<K, V>(capacity: usize) -> Result<Vec<Option<Bucket<K, V>>>, std::collections::TryReserveError> {
    let mut buckets = Vec::new();
    buckets.try_reserve_exact(capacity)?;
    buckets.resize_with(capacity, || None);
    Ok(buckets)
}
