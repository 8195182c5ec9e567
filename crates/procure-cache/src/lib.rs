//! # Procure Cache
//!
//! 單次呼叫內的查詢快取與一次性狀態碼儲存

pub mod memo;
pub mod state_store;

// Re-export 主要類型
pub use memo::LookupMemo;
pub use state_store::InMemoryStateStore;
