//! 拉链哈希表集成测试

use chained_hashtable::{
    batch_get, batch_insert, log_info, types::ByteKey, ChainedMap, ChainedMapConfig,
    ChainedMapError, HashAlgorithm, HashStrategy, Key, StdHashStrategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use test_log::test;

const SEED: u64 = 42;
const ITEM_COUNT: usize = 20_000;
const KEY_SIZE: usize = 16;
const VALUE_SIZE: usize = 64;

/// 生成随机键值对
fn generate_items(count: usize) -> Vec<(ByteKey, Vec<u8>)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count)
        .map(|_| {
            let mut key = vec![0u8; KEY_SIZE];
            let mut value = vec![0u8; VALUE_SIZE];
            rng.fill(&mut key[..]);
            rng.fill(&mut value[..]);
            (ByteKey(key), value)
        })
        .collect()
}

/// 创建测试用哈希表
fn create_test_map(algorithm: HashAlgorithm) -> ChainedMap<ByteKey, Vec<u8>> {
    let config = ChainedMapConfig {
        initial_capacity: 16,
        hash_algorithm: algorithm,
        ..ChainedMapConfig::default()
    };
    ChainedMap::with_config(config).expect("合法配置")
}

#[test]
fn test_basic_functionality() {
    let mut map = create_test_map(HashAlgorithm::AHash);

    // 插入
    let key1 = ByteKey(b"key1".to_vec());
    let value1 = b"value1".to_vec();
    assert_eq!(map.put(key1.clone(), value1.clone()), Ok(None));

    // 查询
    assert_eq!(map.get(&key1), Ok(Some(&value1)));

    // 更新
    let value2 = b"value2".to_vec();
    assert_eq!(map.put(key1.clone(), value2.clone()), Ok(Some(value1)));
    assert_eq!(map.get(&key1), Ok(Some(&value2)));
    assert_eq!(map.size(), 1);

    // 删除
    assert_eq!(map.remove(&key1), Ok(Some(value2)));
    assert_eq!(map.get(&key1), Ok(None));
    assert!(map.is_empty());
}

#[test]
fn test_four_key_scenario() {
    let mut map = ChainedMap::with_capacity(4).expect("容量4合法");
    for (key, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        assert_eq!(map.put(key, value), Ok(None));
    }

    assert_eq!(map.size(), 4);
    for (key, value) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        assert_eq!(map.get(&key), Ok(Some(&value)));
    }
    assert_eq!(map.capacity(), 8);
    assert_eq!(map.stats().resize_count, 1, "容量恰好翻倍一次");
}

#[test]
fn test_error_handling() {
    assert!(matches!(
        ChainedMap::<String, i32>::with_capacity(0),
        Err(ChainedMapError::InvalidArgument { .. })
    ));

    let mut map: ChainedMap<Option<&str>, i32> = ChainedMap::new();
    let err = map.put(None, 1).unwrap_err();
    assert!(matches!(err, ChainedMapError::NullKey { .. }));
    assert!(err.is_programmer_error());
    assert_eq!(map.size(), 0);
}

#[test]
fn test_high_load() {
    let start_time = std::time::Instant::now();
    let items = generate_items(ITEM_COUNT);

    for algorithm in [HashAlgorithm::AHash, HashAlgorithm::XxHash, HashAlgorithm::Default] {
        let mut map = create_test_map(algorithm);

        // 插入所有项
        for (key, value) in &items {
            assert_eq!(map.put(key.clone(), value.clone()), Ok(None));
        }

        // 验证统计信息
        let stats = map.stats();
        log_info!(
            "{:?}: load_factor {}, size={}, bucket count={}, longest chain={}",
            algorithm,
            map.load_factor(),
            stats.size,
            stats.capacity,
            stats.longest_chain
        );
        assert_eq!(stats.size, ITEM_COUNT);
        assert!(stats.load_factor <= map.load_factor_threshold());
        assert!(stats.capacity.is_power_of_two(), "16 的整数次翻倍");
        assert_eq!(stats.resize_count, (stats.capacity / 16).trailing_zeros() as u64);

        // 验证所有项存在
        for (index, (key, value)) in items.iter().enumerate() {
            assert_eq!(
                map.get(key),
                Ok(Some(value)),
                "Assertion failed at index {} for key {:?}",
                index,
                key
            );
        }
    }
    println!("All inserts processed in {:?}", start_time.elapsed());
}

#[test]
fn test_long_running_operations() {
    let mut map = ChainedMap::with_capacity(3).expect("容量3合法");
    let mut model: HashMap<u32, u32> = HashMap::new();
    let mut rng = StdRng::seed_from_u64(SEED);

    // 长时间运行：插入、查询、删除循环
    for i in 0..10_000u32 {
        let key = rng.gen_range(0..2_000u32);
        if rng.gen_bool(0.3) {
            assert_eq!(map.remove(&key), Ok(model.remove(&key)));
        } else {
            assert_eq!(map.put(key, i), Ok(model.insert(key, i)));
        }
        assert_eq!(map.get(&key), Ok(model.get(&key)));
        assert_eq!(map.size(), model.len());
    }

    for (key, value) in &model {
        assert_eq!(map.get(key), Ok(Some(value)));
    }
    assert_eq!(map.iter().count(), model.len());
}

#[test]
fn test_batch_operations() {
    let items = generate_items(1_000);
    let keys: Vec<ByteKey> = items.iter().map(|(k, _)| k.clone()).collect();
    let mut map = create_test_map(HashAlgorithm::XxHash);

    // 批量插入
    assert_eq!(batch_insert(&mut map, items.clone()), items.len());

    // 批量查询
    let values = batch_get(&map, &keys);
    for ((_, expected), actual) in items.iter().zip(values) {
        assert_eq!(actual.as_ref(), Some(expected));
    }

    // 批量删除
    for key in &keys {
        assert!(map.remove(key).expect("非空键").is_some());
    }

    assert_eq!(map.stats().size, 0);
}

#[test]
fn test_stats_and_monitoring() {
    let items = generate_items(500);
    let mut map = create_test_map(HashAlgorithm::AHash);

    for (key, value) in &items {
        map.put(key.clone(), value.clone()).expect("插入成功");
    }

    // 获取统计信息
    let stats = map.stats();
    assert_eq!(stats.size, 500);
    assert_eq!(stats.insert_count, 500);
    assert_eq!(stats.get_count, 0, "尚未执行查询");
    assert!(stats.resize_count > 0);
    assert!(stats.occupied_buckets <= stats.materialized_buckets);

    for (key, _) in &items {
        map.get(key).expect("非空键");
    }
    assert_eq!(map.stats().get_count, 500);

    // 生成Prometheus指标
    let metrics = map.export_prometheus();
    assert!(metrics.contains("chained_operation_insert_count 500"));
    assert!(metrics.contains("chained_resize_count"));
    assert!(metrics.contains("chained_map_size 500"));
}

#[test]
fn test_resize_limit() {
    let config = ChainedMapConfig {
        initial_capacity: 2,
        max_capacity: Some(8),
        ..ChainedMapConfig::default()
    };
    let mut map = ChainedMap::with_config(config).expect("合法配置");

    // 8 * 0.75 = 6，第7个键需要扩到16
    for key in 0u64..6 {
        assert_eq!(map.put(key, key), Ok(None));
    }
    assert_eq!(map.capacity(), 8);

    let err = map.put(6, 6).unwrap_err();
    assert!(matches!(err, ChainedMapError::ResizeFailed { capacity: 8, requested: 16 }));
    assert!(!err.is_recoverable());
    assert_eq!(map.size(), 6);
    assert_eq!(map.get(&6), Ok(None));
    for key in 0u64..6 {
        assert_eq!(map.get(&key), Ok(Some(&key)));
    }

    // 删除后有空间，同一个键可以再次插入
    map.remove(&0).expect("非空键");
    assert_eq!(map.put(6, 6), Ok(None));
    assert_eq!(map.size(), 6);
}

/// 没有实现 `Hash` 的键：忽略大小写比较
#[derive(Debug)]
struct CaseInsensitive(String);

impl PartialEq for CaseInsensitive {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for CaseInsensitive {}

impl Key for CaseInsensitive {}

/// 与忽略大小写的相等关系一致的哈希策略
struct CaseInsensitiveHash(StdHashStrategy);

impl HashStrategy<CaseInsensitive> for CaseInsensitiveHash {
    fn hash_key(&self, key: &CaseInsensitive) -> i64 {
        self.0.hash_key(key.0.to_ascii_lowercase().as_str())
    }
}

#[test]
fn test_custom_hash_strategy() {
    let hasher = CaseInsensitiveHash(StdHashStrategy::new(HashAlgorithm::XxHash));
    let mut map = ChainedMap::with_hasher(8, hasher).expect("容量8合法");

    assert_eq!(map.put(CaseInsensitive("Hello".into()), 1), Ok(None));
    assert_eq!(map.put(CaseInsensitive("HELLO".into()), 2), Ok(Some(1)));
    assert_eq!(map.get(&CaseInsensitive("hello".into())), Ok(Some(&2)));
    assert_eq!(map.size(), 1);

    for i in 0..50 {
        map.put(CaseInsensitive(format!("Key{}", i)), i).expect("插入成功");
    }
    for i in 0..50 {
        assert_eq!(map.get(&CaseInsensitive(format!("KEY{}", i))), Ok(Some(&i)));
    }
}
