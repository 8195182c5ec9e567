//! 對外操作
//!
//! 每個操作先驗證配置，再以配置的時間預算建立 [`Deadline`]。

use std::time::Instant;

use procure_core::{
    BatchReport, BomNode, ComponentLookup, ContactDirectory, Deadline, EngineConfig, ItemCatalog,
    LeafTotal, Outcome, PerAssemblyNode, PurchaseOrderGateway, Result, RootDemandLine,
    ShoppingListStore,
};

use crate::aggregator::LeafAggregator;
use crate::emitter::PurchaseOrderEmitter;
use crate::intake::{insert_entries, IntakeEntry};
use crate::normalizer::PerAssemblyNormalizer;
use crate::resolver::BomResolver;
use crate::InvoicePlan;

/// 展開發票上的所有根需求
pub fn resolve_invoice_bom<L>(
    lookup: &L,
    roots: &[RootDemandLine],
    config: &EngineConfig,
) -> Result<Outcome<Vec<BomNode>>>
where
    L: ComponentLookup + ?Sized,
{
    config.validate()?;
    BomResolver::new(lookup, config.max_depth)
        .with_deadline(Deadline::after(config.operation_timeout))
        .resolve(roots)
}

/// 每組件用量視圖
pub fn build_per_assembly_view(
    trees: &[BomNode],
    roots: &[RootDemandLine],
) -> Vec<PerAssemblyNode> {
    PerAssemblyNormalizer::normalize(trees, roots)
}

/// 可採購物料總量
pub fn aggregate_leaf_totals(trees: &[BomNode]) -> Outcome<Vec<LeafTotal>> {
    LeafAggregator::aggregate(trees)
}

/// 展開、換算與彙總一次完成
pub fn plan_invoice<L>(
    lookup: &L,
    roots: &[RootDemandLine],
    config: &EngineConfig,
) -> Result<Outcome<InvoicePlan>>
where
    L: ComponentLookup + ?Sized,
{
    let start = Instant::now();

    let trees = match resolve_invoice_bom(lookup, roots, config)? {
        Outcome::Accepted(trees) => trees,
        Outcome::Rejected(err) => return Ok(Outcome::Rejected(err)),
    };
    let leaf_totals = match aggregate_leaf_totals(&trees) {
        Outcome::Accepted(totals) => totals,
        Outcome::Rejected(err) => return Ok(Outcome::Rejected(err)),
    };
    let per_assembly = build_per_assembly_view(&trees, roots);

    Ok(Outcome::Accepted(InvoicePlan {
        trees,
        per_assembly,
        leaf_totals,
        calculation_time_ms: Some(start.elapsed().as_millis()),
    }))
}

/// 將使用者確認的物料加入採購清單，回傳新增筆數
pub fn record_purchase_intent<S>(
    store: &mut S,
    entries: &[IntakeEntry],
    config: &EngineConfig,
) -> Result<Outcome<usize>>
where
    S: ShoppingListStore + ?Sized,
{
    config.validate()?;
    let outcome = insert_entries(store, entries, Deadline::after(config.operation_timeout))?;
    Ok(outcome.map(|records| records.len()))
}

/// 為所有未下單記錄送出採購單
pub fn run_purchase_order_batch<S, D, C, G>(
    store: &mut S,
    directory: &D,
    catalog: &C,
    gateway: &mut G,
    config: &EngineConfig,
) -> Result<Outcome<BatchReport>>
where
    S: ShoppingListStore + ?Sized,
    D: ContactDirectory + ?Sized,
    C: ItemCatalog + ?Sized,
    G: PurchaseOrderGateway + ?Sized,
{
    config.validate()?;
    PurchaseOrderEmitter::new(directory, catalog)
        .with_deadline(Deadline::after(config.operation_timeout))
        .run_batch(store, gateway)
}
