//! 單次呼叫內的查詢快取

use std::collections::HashMap;

use procure_core::Result;

/// 查詢快取
///
/// 只屬於一次分組或批次呼叫，呼叫結束即丟棄；不跨請求共用，
/// 因此物料與供應商映射的變更在下一次呼叫就會生效。
#[derive(Debug)]
pub struct LookupMemo<V> {
    entries: HashMap<String, V>,
    hits: usize,
    misses: usize,
}

impl<V: Clone> LookupMemo<V> {
    /// 創建空的快取
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// 取得快取值，未命中時呼叫 `fetch` 並保存結果
    ///
    /// `fetch` 失敗時不寫入快取，錯誤原樣往上傳。
    pub fn get_or_fetch<F>(&mut self, key: &str, fetch: F) -> Result<V>
    where
        F: FnOnce(&str) -> Result<V>,
    {
        if let Some(value) = self.entries.get(key) {
            self.hits += 1;
            return Ok(value.clone());
        }

        self.misses += 1;
        let value = fetch(key)?;
        self.entries.insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// 檢查是否已快取
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 命中次數
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// 未命中次數
    pub fn misses(&self) -> usize {
        self.misses
    }
}

impl<V: Clone> Default for LookupMemo<V> {
    fn default() -> Self {
        Self::new()
    }
}
