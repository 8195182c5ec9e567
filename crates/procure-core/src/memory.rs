//! 記憶體內協作者實作（測試與示例用）

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::ports::{
    ComponentLookup, ContactDirectory, ItemCatalog, PurchaseOrderGateway, ShoppingListStore,
};
use crate::{
    ComponentEdge, Item, ProcureError, PurchaseMapping, PurchaseOrderDraft, Result,
    ShoppingListRecord,
};

/// 物料主檔、BOM 關係、採購映射與聯絡人的記憶體快照
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    items: HashMap<String, String>,
    edges: HashMap<String, Vec<ComponentEdge>>,
    mappings: HashMap<String, Vec<String>>,
    contacts: HashMap<String, String>,
    descriptions: HashMap<String, String>,
    failing: HashSet<String>,
    description_calls: Cell<usize>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由資料表快照建立
    pub fn from_snapshot(
        items: impl IntoIterator<Item = Item>,
        edges: impl IntoIterator<Item = ComponentEdge>,
        mappings: impl IntoIterator<Item = PurchaseMapping>,
    ) -> Self {
        let mut catalog = Self::new();
        for item in items {
            catalog.items.insert(item.item_id, item.name);
        }
        for edge in edges {
            catalog.edges.entry(edge.parent_id.clone()).or_default().push(edge);
        }
        for mapping in mappings {
            catalog
                .mappings
                .entry(mapping.item_id)
                .or_default()
                .push(mapping.contact_account);
        }
        catalog
    }

    /// 建構器模式：添加物料
    pub fn with_item(mut self, item_id: &str, name: &str) -> Self {
        self.items.insert(item_id.to_string(), name.to_string());
        self
    }

    /// 建構器模式：添加可採購物料（含採購映射）
    pub fn with_purchasable(self, item_id: &str, name: &str, account: &str) -> Self {
        self.with_item(item_id, name).with_mapping(item_id, account)
    }

    /// 建構器模式：添加採購映射
    pub fn with_mapping(mut self, item_id: &str, account: &str) -> Self {
        self.mappings
            .entry(item_id.to_string())
            .or_default()
            .push(account.to_string());
        self
    }

    /// 建構器模式：添加 BOM 關係
    pub fn with_component(mut self, parent_id: &str, child_id: &str, quantity: u32) -> Self {
        self.edges
            .entry(parent_id.to_string())
            .or_default()
            .push(ComponentEdge::new(parent_id, child_id, quantity));
        self
    }

    /// 建構器模式：添加供應商帳號 → 聯絡人ID
    pub fn with_contact(mut self, account: &str, contact_id: &str) -> Self {
        self.contacts.insert(account.to_string(), contact_id.to_string());
        self
    }

    /// 建構器模式：添加物料描述
    pub fn with_description(mut self, item_id: &str, description: &str) -> Self {
        self.descriptions
            .insert(item_id.to_string(), description.to_string());
        self
    }

    /// 建構器模式：該物料的所有查詢都回傳基礎設施錯誤
    pub fn with_failure(mut self, item_id: &str) -> Self {
        self.failing.insert(item_id.to_string());
        self
    }

    /// `describe_item` 被呼叫的次數
    pub fn description_calls(&self) -> usize {
        self.description_calls.get()
    }

    fn guard(&self, operation: &'static str, item_id: &str) -> Result<()> {
        if self.failing.contains(item_id) {
            return Err(ProcureError::collaborator(
                operation,
                format!("connection reset while reading {item_id}"),
            ));
        }
        Ok(())
    }
}

impl ComponentLookup for InMemoryCatalog {
    fn lookup_item(&self, item_id: &str) -> Result<Option<String>> {
        self.guard("lookup item", item_id)?;
        Ok(self.items.get(item_id).cloned())
    }

    fn has_purchase_mapping(&self, item_id: &str) -> Result<bool> {
        self.guard("check purchase mapping", item_id)?;
        Ok(self.mappings.get(item_id).is_some_and(|m| !m.is_empty()))
    }

    fn components(&self, item_id: &str) -> Result<Vec<ComponentEdge>> {
        self.guard("fetch components", item_id)?;
        Ok(self.edges.get(item_id).cloned().unwrap_or_default())
    }
}

impl ContactDirectory for InMemoryCatalog {
    fn contact_for_item(&self, item_id: &str) -> Result<Option<String>> {
        self.guard("resolve contact for item", item_id)?;
        Ok(self
            .mappings
            .get(item_id)
            .and_then(|accounts| accounts.first().cloned()))
    }

    fn resolve_contact_id(&self, account_number: &str) -> Result<Option<String>> {
        Ok(self.contacts.get(account_number).cloned())
    }
}

impl ItemCatalog for InMemoryCatalog {
    fn describe_item(&self, item_id: &str) -> Result<Option<String>> {
        self.description_calls.set(self.description_calls.get() + 1);
        self.guard("describe item", item_id)?;
        Ok(self
            .descriptions
            .get(item_id)
            .or_else(|| self.items.get(item_id))
            .cloned())
    }
}

/// 記憶體內採購清單
#[derive(Debug)]
pub struct InMemoryShoppingList {
    records: Vec<ShoppingListRecord>,
    next_id: i64,
    fail_writes: bool,
}

impl InMemoryShoppingList {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
            fail_writes: false,
        }
    }

    /// 建構器模式：預先放入一筆記錄
    pub fn with_record(mut self, item_id: &str, quantity: u32) -> Self {
        let record = ShoppingListRecord::new(self.next_id, item_id, quantity);
        self.next_id += 1;
        self.records.push(record);
        self
    }

    /// 建構器模式：所有寫入都失敗
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn records(&self) -> &[ShoppingListRecord] {
        &self.records
    }

    pub fn ordered_count(&self) -> usize {
        self.records.iter().filter(|r| r.ordered).count()
    }
}

impl Default for InMemoryShoppingList {
    fn default() -> Self {
        Self::new()
    }
}

impl ShoppingListStore for InMemoryShoppingList {
    fn insert(&mut self, item_id: &str, quantity: u32) -> Result<ShoppingListRecord> {
        if self.fail_writes {
            return Err(ProcureError::collaborator(
                "insert shopping_list",
                "database is read-only",
            ));
        }
        let record = ShoppingListRecord::new(self.next_id, item_id, quantity);
        self.next_id += 1;
        self.records.push(record.clone());
        Ok(record)
    }

    fn unordered(&self) -> Result<Vec<ShoppingListRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect())
    }

    fn mark_ordered(&mut self, list_ids: &[i64]) -> Result<usize> {
        if self.fail_writes {
            return Err(ProcureError::collaborator(
                "update shopping_list",
                "database is read-only",
            ));
        }
        let ids: HashSet<i64> = list_ids.iter().copied().collect();
        let mut updated = 0;
        for record in self.records.iter_mut().filter(|r| ids.contains(&r.list_id)) {
            record.ordered = true;
            updated += 1;
        }
        Ok(updated)
    }
}

/// 記錄所有送出採購單的閘道
#[derive(Debug, Default)]
pub struct RecordingGateway {
    orders: Vec<(String, PurchaseOrderDraft)>,
    failing_accounts: HashSet<String>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：該供應商的採購單一律失敗
    pub fn with_failure_for(mut self, account: &str) -> Self {
        self.failing_accounts.insert(account.to_string());
        self
    }

    pub fn orders(&self) -> &[(String, PurchaseOrderDraft)] {
        &self.orders
    }
}

impl PurchaseOrderGateway for RecordingGateway {
    fn create_purchase_order(&mut self, draft: &PurchaseOrderDraft) -> Result<String> {
        if self.failing_accounts.contains(&draft.contact_account) {
            return Err(ProcureError::collaborator(
                "create purchase order",
                format!("status=500 for contact {}", draft.contact_id),
            ));
        }
        // 與真實閘道相同，送出前先確認請求內容可產生
        draft.to_payload()?;
        let order_id = Uuid::new_v4().to_string();
        self.orders.push((order_id.clone(), draft.clone()));
        Ok(order_id)
    }
}
