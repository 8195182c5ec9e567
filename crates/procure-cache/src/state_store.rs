//! 一次性狀態碼儲存（記憶體實作）

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use procure_core::{OAuthStateStore, ProcureError, Result};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StateEntry {
    owner_id: String,
    expires_at: DateTime<Utc>,
}

/// 以狀態碼為鍵、帶有效期的儲存
///
/// 由呼叫端持有並以協作者身分傳入，不使用全域狀態。
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    entries: HashMap<String, StateEntry>,
}

impl InMemoryStateStore {
    /// 創建空的儲存
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 以指定時間產生狀態碼
    pub fn issue_at(
        &mut self,
        owner_id: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                ProcureError::InvalidInput(format!("state ttl {ttl:?} out of range"))
            })?;

        let state = Uuid::new_v4().simple().to_string();
        self.entries.insert(
            state.clone(),
            StateEntry {
                owner_id: owner_id.to_string(),
                expires_at,
            },
        );
        Ok(state)
    }

    /// 以指定時間取出狀態碼；無論是否過期都會刪除
    pub fn consume_at(&mut self, state: &str, now: DateTime<Utc>) -> Option<String> {
        self.entries
            .remove(state)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.owner_id)
    }

    /// 清除所有過期的狀態碼，回傳清除筆數
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl OAuthStateStore for InMemoryStateStore {
    fn issue(&mut self, owner_id: &str, ttl: Duration) -> Result<String> {
        self.issue_at(owner_id, ttl, Utc::now())
    }

    fn consume(&mut self, state: &str) -> Result<Option<String>> {
        Ok(self.consume_at(state, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_single_use() {
        let mut store = InMemoryStateStore::new();
        let state = store.issue("owner-1", Duration::from_secs(300)).unwrap();

        assert_eq!(state.len(), 32);
        assert_eq!(store.consume(&state).unwrap().as_deref(), Some("owner-1"));
        assert_eq!(store.consume(&state).unwrap(), None);
    }

    #[test]
    fn test_expired_state_is_rejected() {
        let mut store = InMemoryStateStore::new();
        let issued = Utc::now();
        let state = store
            .issue_at("owner-1", Duration::from_secs(300), issued)
            .unwrap();

        let later = issued + chrono::Duration::seconds(301);
        assert_eq!(store.consume_at(&state, later), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_ttl_past_calendar_range_is_rejected() {
        let mut store = InMemoryStateStore::new();
        let err = store
            .issue_at("owner-1", Duration::from_secs(9_000_000_000_000), Utc::now())
            .unwrap_err();

        assert!(matches!(err, ProcureError::InvalidInput(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_purge_expired() {
        let mut store = InMemoryStateStore::new();
        let now = Utc::now();
        store.issue_at("short", Duration::from_secs(10), now).unwrap();
        store.issue_at("long", Duration::from_secs(600), now).unwrap();

        let purged = store.purge_expired(now + chrono::Duration::seconds(60));
        assert_eq!(purged, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_state() {
        let mut store = InMemoryStateStore::new();
        assert_eq!(store.consume("deadbeef").unwrap(), None);
    }
}
