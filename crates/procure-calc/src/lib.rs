//! # Procure Calculation Engine
//!
//! BOM 展開、用量彙總與採購單批次送出

pub mod aggregator;
pub mod emitter;
pub mod grouping;
pub mod intake;
pub mod normalizer;
pub mod resolver;
pub mod service;

// Re-export 主要類型
pub use aggregator::LeafAggregator;
pub use emitter::PurchaseOrderEmitter;
pub use grouping::ShoppingListGrouper;
pub use intake::IntakeEntry;
pub use normalizer::PerAssemblyNormalizer;
pub use resolver::BomResolver;
pub use service::{
    aggregate_leaf_totals, build_per_assembly_view, plan_invoice, record_purchase_intent,
    resolve_invoice_bom, run_purchase_order_batch,
};

use procure_core::{BomNode, LeafTotal, PerAssemblyNode};
use serde::Serialize;

/// 發票展開結果（發票畫面用）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoicePlan {
    /// 有效數量樹（與根需求一一對應）
    pub trees: Vec<BomNode>,

    /// 每組件用量視圖
    pub per_assembly: Vec<PerAssemblyNode>,

    /// 可採購物料總量（已取整）
    pub leaf_totals: Vec<LeafTotal>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl InvoicePlan {
    /// 預設的採購意向（每個葉節點總量一筆）
    pub fn intake_entries(&self) -> Vec<IntakeEntry> {
        self.leaf_totals.iter().map(IntakeEntry::from).collect()
    }
}
