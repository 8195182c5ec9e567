//! 發票到採購單完整範例
//!
//! 流程：解析發票 → 展開 BOM → 彙總葉節點 → 加入採購清單 → 依供應商送出採購單

use anyhow::{bail, Context};
use procure::{
    plan_invoice, record_purchase_intent, run_purchase_order_batch, EngineConfig, Outcome,
};
use procure_cache::InMemoryStateStore;
use procure_core::memory::{InMemoryCatalog, InMemoryShoppingList, RecordingGateway};
use procure_core::{parse_invoice_lines, OAuthStateStore, PerAssemblyNode, RootDemandLine};

const INVOICE: &str = r#"{
  "Invoices": [{
    "LineItems": [
      { "ItemCode": "POD-01", "Description": "Kitchen pod", "Quantity": 4, "Item": { "Name": "Kitchen pod (standard)" } },
      { "ItemCode": "BOLT", "Description": "Spare bolts", "Quantity": 10 },
      { "ItemCode": "", "Description": "Freight", "Quantity": 1 }
    ]
  }]
}"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = EngineConfig::from_env().context("讀取引擎配置")?;
    println!("===== 發票 → 採購單 =====\n");

    // 步驟 0: 授權流程的一次性狀態碼
    let mut states = InMemoryStateStore::new();
    let state = states.issue("user-42", config.state_ttl)?;
    let owner = states.consume(&state)?;
    println!("[0] OAuth state {} → {:?}\n", &state[..8], owner);

    // 步驟 1: 解析發票
    let lines = parse_invoice_lines(INVOICE)?;
    let roots = RootDemandLine::from_invoice_lines(&lines);
    println!("[1] Invoice lines: {} (valid roots: {})", lines.len(), roots.len());

    // 步驟 2: 建立物料主檔
    let catalog = sample_catalog();

    // 步驟 3: 展開與彙總
    let plan = match plan_invoice(&catalog, &roots, &config)? {
        Outcome::Accepted(plan) => plan,
        Outcome::Rejected(err) => bail!("無法展開發票：{err}"),
    };
    println!("[2] Per-assembly view");
    for node in &plan.per_assembly {
        print_tree(node, 1);
    }
    println!("\n[3] Leaf totals");
    for total in &plan.leaf_totals {
        println!("    {:<8} {:<16} {}", total.item_id, total.name, total.quantity);
    }

    // 步驟 4: 加入採購清單
    let mut store = InMemoryShoppingList::new();
    let added = record_purchase_intent(&mut store, &plan.intake_entries(), &config)?;
    println!("\n[4] Shopping list records added: {:?}", added.accepted());

    // 步驟 5: 送出採購單
    let mut gateway = RecordingGateway::new();
    match run_purchase_order_batch(&mut store, &catalog, &catalog, &mut gateway, &config)? {
        Outcome::Accepted(report) => {
            println!(
                "\n[5] Orders created: {}, records marked: {}",
                report.orders_created, report.records_marked
            );
            for (order_id, draft) in gateway.orders() {
                println!(
                    "    {} → {} ({} lines)",
                    draft.contact_account,
                    order_id,
                    draft.lines.len()
                );
            }
        }
        Outcome::Rejected(err) => println!("\n[5] Batch rejected: {err}"),
    }

    Ok(())
}

fn sample_catalog() -> InMemoryCatalog {
    InMemoryCatalog::new()
        .with_item("POD-01", "Kitchen pod")
        .with_item("TAP-KIT", "Tap kit")
        .with_purchasable("SINK", "Steel sink", "SUP-STEEL")
        .with_purchasable("TAP", "Mixer tap", "SUP-PLUMB")
        .with_purchasable("WASHER", "Rubber washer", "SUP-PLUMB")
        .with_purchasable("BOLT", "M8 bolt", "SUP-STEEL")
        .with_component("POD-01", "SINK", 1)
        .with_component("POD-01", "TAP-KIT", 2)
        .with_component("POD-01", "BOLT", 8)
        .with_component("TAP-KIT", "TAP", 1)
        .with_component("TAP-KIT", "WASHER", 3)
        .with_description("WASHER", "Rubber washer 12mm")
        .with_contact("SUP-STEEL", "b1c2d3e4-steel")
        .with_contact("SUP-PLUMB", "f5a6b7c8-plumb")
}

fn print_tree(node: &PerAssemblyNode, level: usize) {
    println!(
        "    {}{} × {} ({})",
        "  ".repeat(level - 1),
        node.item_id,
        node.quantity,
        node.name
    );
    for child in node.children() {
        print_tree(child, level + 1);
    }
}
