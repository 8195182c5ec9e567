//! 每組件用量換算（展示用）

use procure_core::{BomNode, BomNodeKind, PerAssemblyKind, PerAssemblyNode, RootDemandLine};
use rust_decimal::Decimal;

/// 每組件用量換算器
///
/// 將有效數量樹改寫為「每一個直屬父組件需要幾個」，僅供畫面顯示，
/// 不可作為採購數量的來源。
pub struct PerAssemblyNormalizer;

impl PerAssemblyNormalizer {
    /// 換算所有根樹
    ///
    /// `trees[i]` 與 `roots[i]` 一一對應；根節點顯示發票原始數量。
    pub fn normalize(trees: &[BomNode], roots: &[RootDemandLine]) -> Vec<PerAssemblyNode> {
        if trees.len() != roots.len() {
            tracing::warn!(
                "BOM 樹 {} 棵與根需求 {} 筆數量不符，只換算前 {} 組",
                trees.len(),
                roots.len(),
                trees.len().min(roots.len())
            );
        }

        trees
            .iter()
            .zip(roots)
            .map(|(tree, root)| PerAssemblyNode {
                item_id: tree.item_id.clone(),
                name: tree.name.clone(),
                quantity: root.quantity,
                kind: Self::reframe_children(tree),
            })
            .collect()
    }

    /// 以父節點的有效數量換算子節點
    fn reframe(node: &BomNode, parent_effective: Decimal) -> PerAssemblyNode {
        // 父組件有效數量為零時不做除法，直接沿用自身有效數量
        let quantity = if parent_effective > Decimal::ZERO {
            node.quantity
                .checked_div(parent_effective)
                .unwrap_or(node.quantity)
        } else {
            node.quantity
        };

        PerAssemblyNode {
            item_id: node.item_id.clone(),
            name: node.name.clone(),
            quantity,
            kind: Self::reframe_children(node),
        }
    }

    fn reframe_children(node: &BomNode) -> PerAssemblyKind {
        match &node.kind {
            BomNodeKind::Leaf => PerAssemblyKind::Leaf,
            BomNodeKind::Assembly { children } => PerAssemblyKind::Assembly {
                children: children
                    .iter()
                    .map(|child| Self::reframe(child, node.quantity))
                    .collect(),
            },
        }
    }
}
