//! 哈希策略模块 - 定义键到有符号哈希值的映射

use ahash::RandomState;
use std::{
    collections::hash_map::DefaultHasher,
    fmt,
    hash::{BuildHasher, Hash, Hasher},
};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    AHash,
    XxHash,
    Default,
}

impl HashAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::AHash => "ahash",
            HashAlgorithm::XxHash => "xxhash64",
            HashAlgorithm::Default => "siphash",
        }
    }
}

/// 哈希策略特征
///
/// 同一策略实例必须是确定性的，且与键的相等关系一致：相等的键返回相同的哈希值。
/// 键类型的 `Hash` 实现不满足这一点时，调用方应提供自己的策略。
pub trait HashStrategy<K: ?Sized> {
    /// 计算键的有符号哈希值
    fn hash_key(&self, key: &K) -> i64;
}

/// 任何 `Fn(&K) -> i64` 都可以直接作为哈希策略
impl<K, F> HashStrategy<K> for F
where
    K: ?Sized,
    F: Fn(&K) -> i64,
{
    fn hash_key(&self, key: &K) -> i64 {
        self(key)
    }
}

/// 基于 `std::hash::Hash` 的默认策略
#[derive(Clone)]
pub struct StdHashStrategy {
    algorithm: HashAlgorithm,
    seed: u64,
    ahash_state: RandomState,
}

impl StdHashStrategy {
    pub const DEFAULT_SEED: u64 = 42;

    /// 使用默认种子创建
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self::with_seed(algorithm, Self::DEFAULT_SEED)
    }

    /// 使用指定种子创建
    pub fn with_seed(algorithm: HashAlgorithm, seed: u64) -> Self {
        Self {
            algorithm,
            seed,
            ahash_state: RandomState::with_seed(seed as usize),
        }
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn hash_u64<K: Hash + ?Sized>(&self, key: &K) -> u64 {
        match self.algorithm {
            HashAlgorithm::AHash => {
                let mut hasher = self.ahash_state.build_hasher();
                key.hash(&mut hasher);
                hasher.finish()
            }
            HashAlgorithm::XxHash => {
                let mut hasher = twox_hash::XxHash64::with_seed(self.seed);
                key.hash(&mut hasher);
                hasher.finish()
            }
            HashAlgorithm::Default => {
                // SipHash 的默认密钥固定，结果在进程内稳定
                let mut hasher = DefaultHasher::new();
                key.hash(&mut hasher);
                hasher.finish()
            }
        }
    }
}

impl Default for StdHashStrategy {
    fn default() -> Self {
        Self::new(HashAlgorithm::AHash)
    }
}

impl fmt::Debug for StdHashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdHashStrategy")
            .field("algorithm", &self.algorithm)
            .field("seed", &self.seed)
            .finish()
    }
}

impl<K: Hash + ?Sized> HashStrategy<K> for StdHashStrategy {
    fn hash_key(&self, key: &K) -> i64 {
        // 按位重新解释为有符号数，负值由桶索引计算统一处理
        self.hash_u64(key) as i64
    }
}
