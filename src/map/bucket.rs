//! 桶实现 - 保存哈希到同一索引的条目链

use std::{collections::TryReserveError, fmt, mem};

/// 键值条目，键写入后不可变
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    /// 原地替换值并返回旧值
    pub fn replace_value(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    pub fn parts_mut(&mut self) -> (&K, &mut V) {
        (&self.key, &mut self.value)
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn into_parts(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Entry").field(&self.key).field(&self.value).finish()
    }
}

/// 拉链桶：按插入顺序追加的条目序列
///
/// 删除会把末尾条目换到被删位置，桶内顺序没有语义。
pub struct Bucket<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> fmt::Debug for Bucket<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bucket(entries: {})", self.entries.len())
    }
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Bucket<K, V> {
    /// 创建空桶，不分配内存
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// 预先分配恰好 `capacity` 个条目的空间，分配失败时返回错误而不是中止
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity)?;
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加条目，不检查重复
    pub fn push(&mut self, key: K, value: V) {
        self.entries.push(Entry::new(key, value));
    }

    pub fn push_entry(&mut self, entry: Entry<K, V>) {
        self.entries.push(entry);
    }

    /// 移除最后追加的条目
    pub fn pop(&mut self) -> Option<Entry<K, V>> {
        self.entries.pop()
    }

    /// 移除指定位置的条目
    pub fn remove_at(&mut self, index: usize) -> Entry<K, V> {
        self.entries.swap_remove(index)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entry<K, V>> {
        self.entries.iter_mut()
    }

    pub fn into_entries(self) -> std::vec::IntoIter<Entry<K, V>> {
        self.entries.into_iter()
    }
}

impl<K: Eq, V> Bucket<K, V> {
    /// 线性扫描查找相等的键
    pub fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == *key)
    }

    pub fn find(&self, key: &K) -> Option<&Entry<K, V>> {
        self.entries.iter().find(|entry| entry.key == *key)
    }

    pub fn find_mut(&mut self, key: &K) -> Option<&mut Entry<K, V>> {
        self.entries.iter_mut().find(|entry| entry.key == *key)
    }

    /// 删除相等的键并返回其值
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.position(key)
            .map(|index| self.remove_at(index).into_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_find_remove() {
        let mut bucket = Bucket::new();
        assert!(bucket.is_empty());

        bucket.push("a", 1);
        bucket.push("b", 2);
        bucket.push("c", 3);
        assert_eq!(bucket.len(), 3);
        assert_eq!(bucket.find(&"b").map(Entry::value), Some(&2));
        assert_eq!(bucket.position(&"z"), None);

        assert_eq!(bucket.remove(&"a"), Some(1));
        assert_eq!(bucket.len(), 2);
        assert!(bucket.find(&"a").is_none());
        // 剩余条目仍可查找，顺序不做保证
        assert_eq!(bucket.find(&"c").map(Entry::value), Some(&3));
        assert_eq!(bucket.remove(&"a"), None);
    }

    #[test]
    fn test_replace_in_place() {
        let mut bucket = Bucket::new();
        bucket.push(1u32, "old");
        let entry = bucket.find_mut(&1).expect("条目应存在");
        assert_eq!(entry.replace_value("new"), "old");
        assert_eq!(bucket.find(&1).map(Entry::value), Some(&"new"));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_pop_undoes_push() {
        let mut bucket = Bucket::new();
        bucket.push(1u32, 10);
        bucket.push(2u32, 20);
        let popped = bucket.pop().map(Entry::into_parts);
        assert_eq!(popped, Some((2, 20)));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn test_try_with_capacity() {
        let mut bucket: Bucket<u32, u32> = Bucket::try_with_capacity(4).expect("小分配应成功");
        assert!(bucket.is_empty());
        for i in 0..4 {
            bucket.push(i, i);
        }
        assert_eq!(bucket.into_entries().count(), 4);
    }
}
