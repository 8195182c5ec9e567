//! 採購單模型

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{ProcureError, Result};

/// 採購單明細
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderLine {
    pub item_id: String,
    pub quantity: u64,

    /// 物料描述（查不到時為物料ID）
    pub description: String,
}

/// 待送出的採購單（一個供應商一張）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrderDraft {
    /// 供應商帳號（採購映射表中的值）
    pub contact_account: String,

    /// 會計平台上的聯絡人ID
    pub contact_id: String,

    pub lines: Vec<PurchaseOrderLine>,

    /// 此採購單消耗的清單ID
    pub list_ids: Vec<i64>,
}

impl PurchaseOrderDraft {
    pub fn new(contact_account: impl Into<String>, contact_id: impl Into<String>) -> Self {
        Self {
            contact_account: contact_account.into(),
            contact_id: contact_id.into(),
            lines: Vec::new(),
            list_ids: Vec::new(),
        }
    }

    /// 添加明細
    pub fn add_line(&mut self, line: PurchaseOrderLine, list_ids: &[i64]) {
        self.lines.push(line);
        self.list_ids.extend_from_slice(list_ids);
    }

    /// 總數量
    pub fn total_quantity(&self) -> u64 {
        self.lines
            .iter()
            .fold(0u64, |total, line| total.saturating_add(line.quantity))
    }

    /// 產生會計平台的採購單請求內容
    pub fn to_payload(&self) -> Result<Value> {
        if self.contact_id.trim().is_empty() {
            return Err(ProcureError::InvalidInput(format!(
                "purchase order for account {} has no contact id",
                self.contact_account
            )));
        }

        let line_items: Vec<Value> = self
            .lines
            .iter()
            .map(|line| {
                json!({
                    "ItemCode": line.item_id,
                    "Description": line.description,
                    "Quantity": line.quantity,
                })
            })
            .collect();

        Ok(json!({
            "PurchaseOrders": [{
                "Contact": { "ContactID": self.contact_id },
                "LineItems": line_items,
            }]
        }))
    }
}

/// 批次下單結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// 建立的採購單數
    pub orders_created: usize,

    /// 標記為已下單的清單記錄數
    pub records_marked: usize,

    /// 會計平台回傳的採購單ID
    pub order_ids: Vec<String>,
}

impl BatchReport {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft(contact_id: &str) -> PurchaseOrderDraft {
        let mut draft = PurchaseOrderDraft::new("C-AAA", contact_id);
        draft.add_line(
            PurchaseOrderLine {
                item_id: "C1".to_string(),
                quantity: 2,
                description: "desc".to_string(),
            },
            &[4, 9],
        );
        draft
    }

    #[test]
    fn test_payload_requires_contact_id() {
        let err = sample_draft("").to_payload().unwrap_err();
        assert!(matches!(err, ProcureError::InvalidInput(_)));
    }

    #[test]
    fn test_payload_shape() {
        let payload = sample_draft("contact-123").to_payload().unwrap();

        let orders = payload["PurchaseOrders"].as_array().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["Contact"]["ContactID"], "contact-123");
        assert_eq!(orders[0]["LineItems"][0]["ItemCode"], "C1");
        assert_eq!(orders[0]["LineItems"][0]["Quantity"], 2);
    }

    #[test]
    fn test_draft_tracks_list_ids() {
        let draft = sample_draft("contact-123");
        assert_eq!(draft.list_ids, vec![4, 9]);
        assert_eq!(draft.total_quantity(), 2);
    }
}
