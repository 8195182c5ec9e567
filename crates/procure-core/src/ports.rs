//! 協作者介面
//!
//! 引擎只依賴這些 trait；實際部署由關聯式資料庫與會計平台 API 實作。
//! 所有方法皆為同步阻塞呼叫，單次呼叫的逾時與重試由實作方負責。

use std::time::Duration;

use crate::{ComponentEdge, PurchaseOrderDraft, Result, ShoppingListRecord};

/// BOM 展開所需的物料查詢
pub trait ComponentLookup {
    /// 查詢物料名稱，不存在時回傳 `None`
    fn lookup_item(&self, item_id: &str) -> Result<Option<String>>;

    /// 物料是否有採購來源映射
    fn has_purchase_mapping(&self, item_id: &str) -> Result<bool>;

    /// 直屬子件（依儲存層順序）
    fn components(&self, item_id: &str) -> Result<Vec<ComponentEdge>>;
}

/// 供應商聯絡人查詢
pub trait ContactDirectory {
    /// 物料對應的供應商帳號（多筆時取第一筆，無映射時回傳 `None`）
    fn contact_for_item(&self, item_id: &str) -> Result<Option<String>>;

    /// 由供應商帳號查詢會計平台的聯絡人ID
    fn resolve_contact_id(&self, account_number: &str) -> Result<Option<String>>;
}

/// 物料描述查詢（僅用於採購單明細，失敗時由呼叫端退回物料ID）
pub trait ItemCatalog {
    fn describe_item(&self, item_id: &str) -> Result<Option<String>>;
}

/// 會計平台採購單介面
pub trait PurchaseOrderGateway {
    /// 建立採購單，回傳採購單ID
    fn create_purchase_order(&mut self, draft: &PurchaseOrderDraft) -> Result<String>;
}

/// 採購清單儲存
///
/// 每個寫入動作需為單一原子語句。
pub trait ShoppingListStore {
    /// 新增一筆未下單記錄
    fn insert(&mut self, item_id: &str, quantity: u32) -> Result<ShoppingListRecord>;

    /// 所有尚未下單的記錄
    fn unordered(&self) -> Result<Vec<ShoppingListRecord>>;

    /// 標記為已下單，回傳實際更新筆數
    fn mark_ordered(&mut self, list_ids: &[i64]) -> Result<usize>;
}

/// 一次性狀態碼儲存（OAuth 授權流程用）
pub trait OAuthStateStore {
    /// 為擁有者產生新的狀態碼
    fn issue(&mut self, owner_id: &str, ttl: Duration) -> Result<String>;

    /// 取出並刪除狀態碼；過期或不存在時回傳 `None`
    fn consume(&mut self, state: &str) -> Result<Option<String>>;
}
