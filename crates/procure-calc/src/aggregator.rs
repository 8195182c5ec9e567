//! 葉節點彙總

use std::collections::HashMap;

use procure_core::{BomNode, BomNodeKind, BusinessError, LeafTotal, Outcome};
use rust_decimal::{Decimal, RoundingStrategy};

/// 葉節點彙總器
///
/// 直接走訪有效數量樹：組件只往下走，不累加；葉節點累加其有效數量。
/// 這是唯一的採購總量來源，每組件用量視圖僅供展示。
pub struct LeafAggregator;

impl LeafAggregator {
    /// 彙總所有樹的可採購物料總量
    ///
    /// 總量最後以「四捨五入（.5 進位）」取整，作為畫面上預設的採購數量。
    /// 這是使用介面上的取整決定，不是精度要求；若改用其他取整方式，
    /// 預設採購量會不同。結果依物料ID排序。
    ///
    /// 總量超出數值範圍時拒絕。
    pub fn aggregate(trees: &[BomNode]) -> Outcome<Vec<LeafTotal>> {
        let mut totals: Vec<LeafTotal> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for tree in trees {
            if let Err(err) = Self::walk(tree, &mut totals, &mut index) {
                tracing::info!("葉節點彙總中止：{}", err);
                return Outcome::Rejected(err);
            }
        }

        for total in &mut totals {
            total.quantity = Self::round_for_purchase(total.quantity);
        }
        totals.sort_by(|a, b| a.item_id.cmp(&b.item_id));

        tracing::debug!("葉節點彙總：{} 種物料", totals.len());
        Outcome::Accepted(totals)
    }

    fn walk(
        node: &BomNode,
        totals: &mut Vec<LeafTotal>,
        index: &mut HashMap<String, usize>,
    ) -> Result<(), BusinessError> {
        match &node.kind {
            BomNodeKind::Assembly { children } => {
                for child in children {
                    Self::walk(child, totals, index)?;
                }
            }
            BomNodeKind::Leaf => match index.get(&node.item_id) {
                Some(&position) => {
                    let total = &mut totals[position];
                    total.quantity = total
                        .quantity
                        .checked_add(node.quantity)
                        .ok_or_else(|| BusinessError::QuantityOverflow(node.item_id.clone()))?;
                }
                None => {
                    index.insert(node.item_id.clone(), totals.len());
                    totals.push(LeafTotal::new(
                        node.item_id.clone(),
                        node.name.clone(),
                        node.quantity,
                    ));
                }
            },
        }
        Ok(())
    }

    /// 取整為建議採購量（.5 進位）
    pub fn round_for_purchase(quantity: Decimal) -> Decimal {
        quantity.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }
}
