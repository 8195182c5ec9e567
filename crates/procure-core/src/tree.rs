//! BOM 樹與彙總結果模型（皆為單次請求內的計算結果，不持久化）

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// BOM 節點（有效數量樹）
///
/// `quantity` 為整張發票所需的總數量：根需求數量乘上自根至此的所有用量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomNode {
    /// 物料ID
    pub item_id: String,

    /// 顯示名稱
    pub name: String,

    /// 有效數量
    pub quantity: Decimal,

    /// 葉節點或組件
    pub kind: BomNodeKind,
}

/// 節點類型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BomNodeKind {
    /// 可採購物料，停止展開
    Leaf,
    /// 組件，依 BOM 關係順序展開
    Assembly { children: Vec<BomNode> },
}

impl BomNode {
    /// 創建葉節點
    pub fn leaf(item_id: impl Into<String>, name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
            kind: BomNodeKind::Leaf,
        }
    }

    /// 創建組件節點
    pub fn assembly(
        item_id: impl Into<String>,
        name: impl Into<String>,
        quantity: Decimal,
        children: Vec<BomNode>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
            kind: BomNodeKind::Assembly { children },
        }
    }

    pub fn is_assembly(&self) -> bool {
        matches!(self.kind, BomNodeKind::Assembly { .. })
    }

    /// 子節點（葉節點為空）
    pub fn children(&self) -> &[BomNode] {
        match &self.kind {
            BomNodeKind::Leaf => &[],
            BomNodeKind::Assembly { children } => children.as_slice(),
        }
    }

    /// 樹的深度（單一葉節點為 1）
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(BomNode::depth).max().unwrap_or(0)
    }
}

/// 每組件用量節點（展示用）
///
/// 根節點為發票數量；其餘節點為「每一個直屬父組件需要幾個」。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerAssemblyNode {
    pub item_id: String,
    pub name: String,
    pub quantity: Decimal,
    pub kind: PerAssemblyKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PerAssemblyKind {
    Leaf,
    Assembly { children: Vec<PerAssemblyNode> },
}

impl PerAssemblyNode {
    pub fn is_assembly(&self) -> bool {
        matches!(self.kind, PerAssemblyKind::Assembly { .. })
    }

    pub fn children(&self) -> &[PerAssemblyNode] {
        match &self.kind {
            PerAssemblyKind::Leaf => &[],
            PerAssemblyKind::Assembly { children } => children.as_slice(),
        }
    }
}

/// 可採購物料的彙總數量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafTotal {
    pub item_id: String,
    pub name: String,

    /// 已四捨五入至整數的建議採購量
    pub quantity: Decimal,
}

impl LeafTotal {
    pub fn new(item_id: impl Into<String>, name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            quantity,
        }
    }
}
