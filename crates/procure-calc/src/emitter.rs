//! 採購單批次送出

use procure_cache::LookupMemo;
use procure_core::{
    BatchReport, BusinessError, ContactDirectory, Deadline, ItemCatalog, Outcome,
    PurchaseOrderDraft, PurchaseOrderGateway, PurchaseOrderLine, Result, ShoppingListStore,
    SupplierDemandGroups,
};

use crate::grouping::ShoppingListGrouper;

/// 採購單送出器
///
/// 一個供應商一張採購單。全部送出成功後才一次標記清單記錄為已下單；
/// 任一張失敗即中止，不標記任何記錄。
pub struct PurchaseOrderEmitter<'a, D, C>
where
    D: ContactDirectory + ?Sized,
    C: ItemCatalog + ?Sized,
{
    directory: &'a D,
    catalog: &'a C,
    deadline: Deadline,
}

impl<'a, D, C> PurchaseOrderEmitter<'a, D, C>
where
    D: ContactDirectory + ?Sized,
    C: ItemCatalog + ?Sized,
{
    pub fn new(directory: &'a D, catalog: &'a C) -> Self {
        Self {
            directory,
            catalog,
            deadline: Deadline::unbounded(),
        }
    }

    /// 建構器模式：設置時間預算
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// 將分組結果組成採購單草稿（依供應商帳號排序）
    ///
    /// 所有帳號都必須能對應到聯絡人ID，否則在送出任何採購單前就拒絕。
    pub fn prepare(
        &self,
        groups: &SupplierDemandGroups,
    ) -> Result<Outcome<Vec<PurchaseOrderDraft>>> {
        let mut descriptions: LookupMemo<String> = LookupMemo::new();
        let mut drafts = Vec::with_capacity(groups.len());

        for (account, items) in groups {
            self.deadline.check()?;
            let Some(contact_id) = self.directory.resolve_contact_id(account)? else {
                tracing::info!("供應商帳號 {} 沒有對應的聯絡人", account);
                return Ok(Outcome::Rejected(BusinessError::UnknownContactAccount(
                    account.clone(),
                )));
            };

            let mut draft = PurchaseOrderDraft::new(account.clone(), contact_id);
            for item in items {
                let description = descriptions.get_or_fetch(&item.item_id, |item_id| {
                    self.deadline.check()?;
                    Ok(self.describe_or_fallback(item_id))
                })?;
                draft.add_line(
                    PurchaseOrderLine {
                        item_id: item.item_id.clone(),
                        quantity: item.quantity,
                        description,
                    },
                    &item.list_ids,
                );
            }
            drafts.push(draft);
        }

        Ok(Outcome::Accepted(drafts))
    }

    /// 讀取未下單記錄、分組、送出採購單並標記
    pub fn run_batch<S, G>(&self, store: &mut S, gateway: &mut G) -> Result<Outcome<BatchReport>>
    where
        S: ShoppingListStore + ?Sized,
        G: PurchaseOrderGateway + ?Sized,
    {
        self.deadline.check()?;
        let records = store.unordered()?;
        if records.is_empty() {
            tracing::info!("沒有未下單的採購清單記錄");
            return Ok(Outcome::Accepted(BatchReport::empty()));
        }

        let groups = match ShoppingListGrouper::new(self.directory)
            .with_deadline(self.deadline)
            .group(&records)?
        {
            Outcome::Accepted(groups) => groups,
            Outcome::Rejected(err) => return Ok(Outcome::Rejected(err)),
        };

        let drafts = match self.prepare(&groups)? {
            Outcome::Accepted(drafts) => drafts,
            Outcome::Rejected(err) => return Ok(Outcome::Rejected(err)),
        };

        tracing::info!(
            "開始送出採購單：{} 個供應商，{} 筆清單記錄",
            drafts.len(),
            records.len()
        );

        let mut report = BatchReport::empty();
        for draft in &drafts {
            self.deadline.check()?;
            let order_id = gateway.create_purchase_order(draft).map_err(|err| {
                tracing::error!(
                    "供應商 {} 的採購單建立失敗（已建立 {} 張），本批次不標記任何記錄：{}",
                    draft.contact_account,
                    report.orders_created,
                    err
                );
                err
            })?;
            tracing::debug!(
                "採購單 {} 已建立：供應商 {}，明細 {} 筆，總數量 {}",
                order_id,
                draft.contact_account,
                draft.lines.len(),
                draft.total_quantity()
            );
            report.orders_created += 1;
            report.order_ids.push(order_id);
        }

        let list_ids: Vec<i64> = drafts
            .iter()
            .flat_map(|draft| draft.list_ids.iter().copied())
            .collect();
        self.deadline.check()?;
        report.records_marked = store.mark_ordered(&list_ids)?;

        tracing::info!(
            "採購單批次完成：建立 {} 張，標記 {} 筆記錄，耗時 {:?}",
            report.orders_created,
            report.records_marked,
            self.deadline.elapsed()
        );
        Ok(Outcome::Accepted(report))
    }

    /// 查詢物料描述，失敗或空白時退回物料ID
    fn describe_or_fallback(&self, item_id: &str) -> String {
        match self.catalog.describe_item(item_id) {
            Ok(Some(description)) if !description.trim().is_empty() => description,
            Ok(_) => item_id.to_string(),
            Err(err) => {
                tracing::warn!("物料 {} 描述查詢失敗，改用物料ID：{}", item_id, err);
                item_id.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procure_core::memory::{InMemoryCatalog, InMemoryShoppingList, RecordingGateway};
    use procure_core::ProcureError;

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_purchasable("P-001", "Bolt", "C-AAA")
            .with_purchasable("P-002", "Nut", "C-AAA")
            .with_purchasable("P-003", "Tube", "C-BBB")
            .with_description("P-001", "M8 hex bolt")
            .with_contact("C-AAA", "contact-aaa")
            .with_contact("C-BBB", "contact-bbb")
    }

    fn store() -> InMemoryShoppingList {
        InMemoryShoppingList::new()
            .with_record("P-001", 2)
            .with_record("P-002", 1)
            .with_record("P-001", 3)
            .with_record("P-003", 5)
    }

    #[test]
    fn test_batch_creates_one_order_per_supplier() {
        let catalog = catalog();
        let mut store = store();
        let mut gateway = RecordingGateway::new();

        let report = PurchaseOrderEmitter::new(&catalog, &catalog)
            .run_batch(&mut store, &mut gateway)
            .unwrap()
            .accepted()
            .unwrap();

        assert_eq!(report.orders_created, 2);
        assert_eq!(report.records_marked, 4);
        assert_eq!(report.order_ids.len(), 2);
        assert_eq!(store.ordered_count(), 4);

        let orders = gateway.orders();
        let (_, aaa) = &orders[0];
        assert_eq!(aaa.contact_id, "contact-aaa");
        assert_eq!(aaa.lines.len(), 2);
        assert_eq!(aaa.lines[0].quantity, 5);
        assert_eq!(aaa.lines[0].description, "M8 hex bolt");
        assert_eq!(aaa.lines[1].description, "Nut");

        let (_, bbb) = &orders[1];
        assert_eq!(bbb.contact_id, "contact-bbb");
        assert_eq!(bbb.total_quantity(), 5);
    }

    #[test]
    fn test_gateway_failure_marks_nothing() {
        let catalog = catalog();
        let mut store = store();
        let mut gateway = RecordingGateway::new().with_failure_for("C-BBB");

        let err = PurchaseOrderEmitter::new(&catalog, &catalog)
            .run_batch(&mut store, &mut gateway)
            .unwrap_err();

        assert!(matches!(err, ProcureError::Collaborator { .. }));
        assert_eq!(store.ordered_count(), 0);
        // C-AAA 已在平台上建立，但清單記錄仍維持未下單
        assert_eq!(gateway.orders().len(), 1);
    }

    #[test]
    fn test_description_failure_falls_back_to_item_id() {
        let catalog = catalog().with_failure("P-003");
        let groups: SupplierDemandGroups = [(
            "C-BBB".to_string(),
            vec![procure_core::GroupedItem {
                item_id: "P-003".to_string(),
                quantity: 5,
                list_ids: vec![4],
            }],
        )]
        .into_iter()
        .collect();

        let drafts = PurchaseOrderEmitter::new(&catalog, &catalog)
            .prepare(&groups)
            .unwrap()
            .accepted()
            .unwrap();

        assert_eq!(drafts[0].lines[0].description, "P-003");
    }

    #[test]
    fn test_descriptions_are_fetched_once_per_item() {
        let catalog = catalog().with_mapping("P-001", "C-BBB");
        let groups: SupplierDemandGroups = [
            (
                "C-AAA".to_string(),
                vec![procure_core::GroupedItem {
                    item_id: "P-001".to_string(),
                    quantity: 1,
                    list_ids: vec![1],
                }],
            ),
            (
                "C-BBB".to_string(),
                vec![procure_core::GroupedItem {
                    item_id: "P-001".to_string(),
                    quantity: 2,
                    list_ids: vec![2],
                }],
            ),
        ]
        .into_iter()
        .collect();

        let outcome = PurchaseOrderEmitter::new(&catalog, &catalog)
            .prepare(&groups)
            .unwrap();
        assert!(outcome.is_accepted());
        assert_eq!(catalog.description_calls(), 1);
    }

    #[test]
    fn test_unknown_account_rejects_before_sending() {
        let catalog = InMemoryCatalog::new()
            .with_purchasable("P-001", "Bolt", "C-AAA")
            .with_purchasable("P-009", "Gasket", "C-ZZZ")
            .with_contact("C-AAA", "contact-aaa");
        let mut store = InMemoryShoppingList::new()
            .with_record("P-001", 1)
            .with_record("P-009", 1);
        let mut gateway = RecordingGateway::new();

        let outcome = PurchaseOrderEmitter::new(&catalog, &catalog)
            .run_batch(&mut store, &mut gateway)
            .unwrap();

        assert_eq!(
            outcome.message().as_deref(),
            Some("no supplier contact found for account number C-ZZZ")
        );
        assert!(gateway.orders().is_empty());
        assert_eq!(store.ordered_count(), 0);
    }

    #[test]
    fn test_missing_mapping_rejects_batch() {
        let catalog = catalog().with_item("P-404", "Orphan");
        let mut store = store().with_record("P-404", 1);
        let mut gateway = RecordingGateway::new();

        let outcome = PurchaseOrderEmitter::new(&catalog, &catalog)
            .run_batch(&mut store, &mut gateway)
            .unwrap();

        assert!(matches!(
            outcome.rejection(),
            Some(BusinessError::MissingContactMapping(item)) if item == "P-404"
        ));
        assert!(gateway.orders().is_empty());
    }

    #[test]
    fn test_empty_batch() {
        let catalog = catalog();
        let mut store = InMemoryShoppingList::new();
        let mut gateway = RecordingGateway::new();

        let report = PurchaseOrderEmitter::new(&catalog, &catalog)
            .run_batch(&mut store, &mut gateway)
            .unwrap()
            .accepted()
            .unwrap();

        assert_eq!(report, BatchReport::empty());
        assert!(gateway.orders().is_empty());
    }

    #[test]
    fn test_second_run_has_nothing_to_do() {
        let catalog = catalog();
        let mut store = store();
        let mut gateway = RecordingGateway::new();
        let emitter = PurchaseOrderEmitter::new(&catalog, &catalog);

        emitter.run_batch(&mut store, &mut gateway).unwrap();
        let report = emitter
            .run_batch(&mut store, &mut gateway)
            .unwrap()
            .accepted()
            .unwrap();

        assert_eq!(report.orders_created, 0);
        assert_eq!(gateway.orders().len(), 2);
    }
}
