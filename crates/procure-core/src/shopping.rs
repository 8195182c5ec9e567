//! 採購清單模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 採購清單記錄（持久化）
///
/// 只會將 `ordered` 由 false 改為 true，永不刪除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListRecord {
    /// 清單ID（新增時由儲存層指派）
    pub list_id: i64,

    /// 物料ID
    pub item_id: String,

    /// 採購數量
    pub quantity: u32,

    /// 是否已下採購單
    pub ordered: bool,

    /// 建立時間
    pub created_at: DateTime<Utc>,
}

impl ShoppingListRecord {
    pub fn new(list_id: i64, item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            list_id,
            item_id: item_id.into(),
            quantity,
            ordered: false,
            created_at: Utc::now(),
        }
    }

    /// 建構器模式：設置已下單
    pub fn with_ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn is_pending(&self) -> bool {
        !self.ordered
    }
}

/// 分配到某供應商的物料（同物料多筆記錄合併）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedItem {
    pub item_id: String,

    /// 合併後數量（多筆 u32 相加，以 u64 保存）
    pub quantity: u64,

    /// 來源清單ID（下單後用於標記）
    pub list_ids: Vec<i64>,
}

impl GroupedItem {
    pub fn from_record(record: &ShoppingListRecord) -> Self {
        Self {
            item_id: record.item_id.clone(),
            quantity: u64::from(record.quantity),
            list_ids: vec![record.list_id],
        }
    }

    /// 合併同物料的另一筆記錄
    pub fn absorb(&mut self, record: &ShoppingListRecord) {
        self.quantity += u64::from(record.quantity);
        self.list_ids.push(record.list_id);
    }
}

/// 供應商帳號 → 該供應商的待採購物料
pub type SupplierDemandGroups = BTreeMap<String, Vec<GroupedItem>>;
