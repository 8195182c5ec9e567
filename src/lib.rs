//! # Procure
//!
//! 發票驅動的 BOM 展開與採購單產生

pub use procure_calc::{
    aggregate_leaf_totals, build_per_assembly_view, plan_invoice, record_purchase_intent,
    resolve_invoice_bom, run_purchase_order_batch, IntakeEntry, InvoicePlan,
};
pub use procure_core::{
    BatchReport, BomNode, BusinessError, EngineConfig, LeafTotal, Outcome, PerAssemblyNode,
    ProcureError, Result, RootDemandLine,
};
