//! BOM 展開

use std::collections::HashSet;

use procure_core::{
    BomNode, BusinessError, ComponentLookup, Deadline, Outcome, ProcureError, RootDemandLine,
};
use rust_decimal::Decimal;

/// 展開中止原因
///
/// 業務錯誤與基礎設施錯誤分開傳遞，後者絕不轉成使用者訊息。
#[derive(Debug)]
enum Abort {
    Rejected(BusinessError),
    Failed(ProcureError),
}

impl From<BusinessError> for Abort {
    fn from(err: BusinessError) -> Self {
        Abort::Rejected(err)
    }
}

impl From<ProcureError> for Abort {
    fn from(err: ProcureError) -> Self {
        Abort::Failed(err)
    }
}

/// BOM 展開器
///
/// 依深度優先順序逐一展開根需求。任一節點失敗即中止整個展開，
/// 不回傳部分結果（彙總器假設每棵樹都已完整展開）。
pub struct BomResolver<'a, L: ComponentLookup + ?Sized> {
    lookup: &'a L,
    max_depth: usize,
    deadline: Deadline,
}

impl<'a, L: ComponentLookup + ?Sized> BomResolver<'a, L> {
    /// 創建新的展開器
    pub fn new(lookup: &'a L, max_depth: usize) -> Self {
        Self {
            lookup,
            max_depth,
            deadline: Deadline::unbounded(),
        }
    }

    /// 建構器模式：設置時間預算
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// 展開所有根需求
    ///
    /// `trees[i]` 對應 `roots[i]`。
    pub fn resolve(
        &self,
        roots: &[RootDemandLine],
    ) -> procure_core::Result<Outcome<Vec<BomNode>>> {
        if self.max_depth == 0 {
            return Err(ProcureError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        if roots.is_empty() {
            return Ok(Outcome::Rejected(BusinessError::NoValidInvoiceLines));
        }

        tracing::info!(
            "開始 BOM 展開：根需求 {} 筆，最大深度 {}",
            roots.len(),
            self.max_depth
        );

        let mut trees = Vec::with_capacity(roots.len());
        for root in roots {
            // 每次展開自有的路徑集合，不與其他呼叫共用
            let mut visiting = HashSet::new();
            let display_name = Some(root.name.as_str()).filter(|name| !name.is_empty());

            match self.expand(&root.item_id, display_name, root.quantity, 1, &mut visiting) {
                Ok(node) => trees.push(node),
                Err(Abort::Rejected(err)) => {
                    tracing::info!("BOM 展開中止（根 {}）：{}", root.item_id, err);
                    return Ok(Outcome::Rejected(err));
                }
                Err(Abort::Failed(err)) => {
                    tracing::error!("BOM 展開失敗（根 {}）：{}", root.item_id, err);
                    return Err(err);
                }
            }
        }

        tracing::info!(
            "BOM 展開完成，耗時 {:?}，根節點 {} 個",
            self.deadline.elapsed(),
            trees.len()
        );
        Ok(Outcome::Accepted(trees))
    }

    fn expand(
        &self,
        item_id: &str,
        display_name: Option<&str>,
        quantity: Decimal,
        depth: usize,
        visiting: &mut HashSet<String>,
    ) -> Result<BomNode, Abort> {
        self.deadline.check()?;
        let catalog_name = self
            .lookup
            .lookup_item(item_id)?
            .ok_or_else(|| BusinessError::ItemNotFound(item_id.to_string()))?;

        if depth > self.max_depth {
            return Err(BusinessError::MaxDepthExceeded(item_id.to_string()).into());
        }
        if !visiting.insert(item_id.to_string()) {
            return Err(BusinessError::CircularReference(item_id.to_string()).into());
        }

        let name = display_name.map(str::to_string).unwrap_or(catalog_name);
        let result = self.expand_on_path(item_id, name, quantity, depth, visiting);

        // 離開此層即移出路徑，兄弟子樹可重複使用同一物料
        visiting.remove(item_id);
        result
    }

    fn expand_on_path(
        &self,
        item_id: &str,
        name: String,
        quantity: Decimal,
        depth: usize,
        visiting: &mut HashSet<String>,
    ) -> Result<BomNode, Abort> {
        self.deadline.check()?;
        if self.lookup.has_purchase_mapping(item_id)? {
            tracing::debug!("葉節點 {} 數量 {}（深度 {}）", item_id, quantity, depth);
            return Ok(BomNode::leaf(item_id, name, quantity));
        }

        self.deadline.check()?;
        let edges = self.lookup.components(item_id)?;
        if edges.is_empty() {
            return Err(BusinessError::NoSourceNoComponents(item_id.to_string()).into());
        }

        let mut children = Vec::with_capacity(edges.len());
        for edge in &edges {
            if !edge.is_valid() {
                return Err(BusinessError::InvalidMultiplier {
                    parent: item_id.to_string(),
                    child: edge.child_id.clone(),
                }
                .into());
            }

            let child_quantity = quantity
                .checked_mul(Decimal::from(edge.quantity))
                .ok_or_else(|| BusinessError::QuantityOverflow(edge.child_id.clone()))?;
            tracing::debug!(
                "BOM 展開: {} → {} (用量: {}, 有效數量: {})",
                item_id,
                edge.child_id,
                edge.quantity,
                child_quantity
            );
            children.push(self.expand(&edge.child_id, None, child_quantity, depth + 1, visiting)?);
        }

        Ok(BomNode::assembly(item_id, name, quantity, children))
    }
}
