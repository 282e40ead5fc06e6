//! TTL 緩存

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// 有效期緩存
///
/// 由持有者建立並傳遞，不使用全域狀態。過期項目在讀取時移除。
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// 創建新的緩存
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 讀取未過期的值
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// 以指定時間讀取
    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => return None,
            Some(entry) => now.saturating_duration_since(entry.stored_at) > self.ttl,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// 寫入
    pub fn set(&mut self, key: K, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// 以指定時間寫入
    pub fn set_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: now,
            },
        );
    }

    /// 清除單一項目
    pub fn clear(&mut self, key: &K) {
        self.entries.remove(key);
    }

    /// 清除全部
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
