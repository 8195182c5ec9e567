//! 物料、BOM 關係與採購來源模型

use serde::{Deserialize, Serialize};

/// 物料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// 物料ID（會計平台的 Item Code）
    pub item_id: String,

    /// 顯示名稱
    pub name: String,
}

impl Item {
    pub fn new(item_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
        }
    }
}

/// BOM 關係：一個父件需要多少個子件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEdge {
    /// 父件ID
    pub parent_id: String,

    /// 子件ID
    pub child_id: String,

    /// 每個父件的子件用量（正整數）
    pub quantity: u32,
}

impl ComponentEdge {
    pub fn new(parent_id: impl Into<String>, child_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
            quantity,
        }
    }

    /// 用量是否有效（必須大於零）
    pub fn is_valid(&self) -> bool {
        self.quantity > 0
    }
}

/// 採購來源映射：物料 → 供應商帳號
///
/// 有映射的物料即為可採購的葉節點，不再展開。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseMapping {
    /// 物料ID
    pub item_id: String,

    /// 供應商帳號（會計平台的 AccountNumber）
    pub contact_account: String,
}

impl PurchaseMapping {
    pub fn new(item_id: impl Into<String>, contact_account: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            contact_account: contact_account.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_validity() {
        assert!(ComponentEdge::new("KIT-01", "BOLT-M6", 4).is_valid());
        assert!(!ComponentEdge::new("KIT-01", "BOLT-M6", 0).is_valid());
    }
}
