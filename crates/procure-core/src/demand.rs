//! 發票需求模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ProcureError, Result};

/// 根需求（每張發票明細一筆）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootDemandLine {
    /// 物料ID
    pub item_id: String,

    /// 顯示名稱（空字串時改用物料主檔名稱）
    pub name: String,

    /// 需求數量（必須大於零）
    pub quantity: Decimal,
}

impl RootDemandLine {
    /// 創建新的根需求
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
        }
    }

    /// 是否為有效需求
    pub fn is_valid(&self) -> bool {
        !self.item_id.trim().is_empty() && self.quantity > Decimal::ZERO
    }

    /// 由發票明細建立根需求，靜默丟棄無物料代碼或數量不大於零的明細
    pub fn from_invoice_lines(lines: &[InvoiceLine]) -> Vec<RootDemandLine> {
        lines
            .iter()
            .map(|line| {
                RootDemandLine::new(line.item_code.trim(), line.name.clone(), line.quantity)
            })
            .filter(RootDemandLine::is_valid)
            .collect()
    }
}

/// 發票明細（會計平台回傳內容中引擎使用的欄位）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub item_code: String,
    pub name: String,
    pub quantity: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InvoicesEnvelope {
    #[serde(default)]
    invoices: Vec<WireInvoice>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireInvoice {
    #[serde(default)]
    line_items: Vec<WireLineItem>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireLineItem {
    #[serde(default)]
    item_code: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    quantity: Option<Decimal>,
    #[serde(default)]
    item: Option<WireItemRef>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct WireItemRef {
    #[serde(default)]
    name: Option<String>,
}

/// 解析發票 JSON，取出所有明細
///
/// 顯示名稱優先使用 `Item.Name`，為空時改用 `Description`。
pub fn parse_invoice_lines(body: &str) -> Result<Vec<InvoiceLine>> {
    let envelope: InvoicesEnvelope = serde_json::from_str(body)
        .map_err(|e| ProcureError::Malformed(format!("invoice body: {e}")))?;

    let lines = envelope
        .invoices
        .into_iter()
        .flat_map(|invoice| invoice.line_items)
        .map(|line| {
            let item_name = line
                .item
                .and_then(|item| item.name)
                .filter(|name| !name.is_empty());
            InvoiceLine {
                item_code: line.item_code.unwrap_or_default(),
                name: item_name.or(line.description).unwrap_or_default(),
                quantity: line.quantity.unwrap_or(Decimal::ZERO),
            }
        })
        .collect();

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoice_lines_selects_name_or_description() {
        let body = r#"{"Invoices":[{"LineItems":[
            {"ItemCode":"IC1","Description":"desc-only","Quantity":2,"Item":{"Name":""}},
            {"ItemCode":"IC2","Description":"d2","Quantity":1,"Item":{"Name":"Named"}}
        ]}]}"#;

        let lines = parse_invoice_lines(body).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].item_code, "IC1");
        assert_eq!(lines[0].name, "desc-only");
        assert_eq!(lines[0].quantity, Decimal::from(2));
        assert_eq!(lines[1].name, "Named");
    }

    #[test]
    fn test_parse_invoice_lines_rejects_garbage() {
        let err = parse_invoice_lines("not json").unwrap_err();
        assert!(matches!(err, ProcureError::Malformed(_)));
    }

    #[test]
    fn test_from_invoice_lines_discards_invalid() {
        let lines = vec![
            InvoiceLine {
                item_code: "KIT-01".to_string(),
                name: "Kitchen pod".to_string(),
                quantity: Decimal::from(2),
            },
            InvoiceLine {
                item_code: "".to_string(),
                name: "Labour".to_string(),
                quantity: Decimal::from(5),
            },
            InvoiceLine {
                item_code: "KIT-02".to_string(),
                name: "Refund".to_string(),
                quantity: Decimal::from(-1),
            },
            InvoiceLine {
                item_code: "KIT-03".to_string(),
                name: "Zero".to_string(),
                quantity: Decimal::ZERO,
            },
        ];

        let roots = RootDemandLine::from_invoice_lines(&lines);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].item_id, "KIT-01");
        assert_eq!(roots[0].quantity, Decimal::from(2));
    }
}
