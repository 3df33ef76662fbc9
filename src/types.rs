//! 核心类型定义 - 键约束、字节键和操作类型

use core::fmt;
use std::fmt::{Debug, Display};

/// 键特征 - 相等关系加上空键判定
///
/// 哈希值由表的 [`HashStrategy`](crate::hash::HashStrategy) 提供，
/// 键本身只需要保证相等关系与哈希策略一致：相等的键必须得到相同的哈希值。
pub trait Key: Eq + Debug {
    /// 是否为空键，空键会被所有操作以 `NullKey` 拒绝
    fn is_absent(&self) -> bool {
        false
    }
}

/// `None` 即空键
impl<T: Key> Key for Option<T> {
    fn is_absent(&self) -> bool {
        match self {
            Some(inner) => inner.is_absent(),
            None => true,
        }
    }
}

impl<T: Key + ?Sized> Key for &T {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl<T: Key + ?Sized> Key for Box<T> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

impl Key for str {}
impl Key for String {}
impl Key for bool {}
impl Key for char {}

macro_rules! impl_key_for_integers {
    ($($ty:ty),* $(,)?) => {
        $(impl Key for $ty {})*
    };
}

impl_key_for_integers!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl<A: Key, B: Key> Key for (A, B) {}

/// 字节键包装类型
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteKey(pub Vec<u8>);

impl ByteKey {
    /// 创建新字节键
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// 获取内部字节
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<&[u8]> for ByteKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for ByteKey {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl Debug for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteKey(")?;
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        write!(f, ")")
    }
}

impl Display for ByteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02X}", byte)?;
        }
        Ok(())
    }
}

impl Key for ByteKey {}

impl PartialOrd for ByteKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// 表操作类型，用于统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    /// 新增条目
    Insert,
    /// 覆盖已有键的值
    Update,
    /// 查找
    Get,
    /// 删除
    Remove,
    /// 清空
    Clear,
}

impl OperationType {
    pub const ALL: [OperationType; 5] = [
        OperationType::Insert,
        OperationType::Update,
        OperationType::Get,
        OperationType::Remove,
        OperationType::Clear,
    ];

    /// 判断是否为读操作
    pub fn is_read(&self) -> bool {
        matches!(self, OperationType::Get)
    }

    /// 判断是否为写操作
    pub fn is_write(&self) -> bool {
        !self.is_read()
    }

    /// 转换为字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Insert => "insert",
            OperationType::Update => "update",
            OperationType::Get => "get",
            OperationType::Remove => "remove",
            OperationType::Clear => "clear",
        }
    }
}

impl Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
