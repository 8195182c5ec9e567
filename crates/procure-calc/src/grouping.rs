//! 採購清單依供應商分組

use std::collections::HashMap;

use procure_cache::LookupMemo;
use procure_core::{
    BusinessError, ContactDirectory, Deadline, GroupedItem, Outcome, Result, ShoppingListRecord,
    SupplierDemandGroups,
};

/// 採購清單分組器
///
/// 只處理未下單記錄。同一物料的多筆記錄合併為一項（數量相加、清單ID依序保留），
/// 每個物料的供應商帳號在單次呼叫內只查詢一次。
pub struct ShoppingListGrouper<'a, D: ContactDirectory + ?Sized> {
    directory: &'a D,
    deadline: Deadline,
}

impl<'a, D: ContactDirectory + ?Sized> ShoppingListGrouper<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            deadline: Deadline::unbounded(),
        }
    }

    /// 建構器模式：設置時間預算
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// 依供應商帳號分組
    ///
    /// 任一物料查無映射即拒絕整批，不回傳部分分組。
    pub fn group(&self, records: &[ShoppingListRecord]) -> Result<Outcome<SupplierDemandGroups>> {
        let mut memo: LookupMemo<Option<String>> = LookupMemo::new();
        let mut groups = SupplierDemandGroups::new();
        // (帳號, 物料) → 該帳號清單中的位置
        let mut positions: HashMap<(String, String), usize> = HashMap::new();

        for record in records.iter().filter(|r| r.is_pending()) {
            let account = memo.get_or_fetch(&record.item_id, |item_id| {
                self.deadline.check()?;
                self.directory.contact_for_item(item_id)
            })?;

            let Some(account) = account else {
                tracing::info!("物料 {} 沒有供應商映射，拒絕分組", record.item_id);
                return Ok(Outcome::Rejected(BusinessError::MissingContactMapping(
                    record.item_id.clone(),
                )));
            };

            let items = groups.entry(account.clone()).or_default();
            let key = (account, record.item_id.clone());
            match positions.get(&key) {
                Some(&position) => items[position].absorb(record),
                None => {
                    positions.insert(key, items.len());
                    items.push(GroupedItem::from_record(record));
                }
            }
        }

        tracing::debug!(
            "採購清單分組完成：{} 個供應商，聯絡人查詢 {} 次（快取命中 {} 次）",
            groups.len(),
            memo.misses(),
            memo.hits()
        );
        Ok(Outcome::Accepted(groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use procure_core::memory::InMemoryCatalog;
    use procure_core::ProcureError;
    use std::time::Duration;

    fn directory() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_purchasable("P-001", "Bolt", "C-AAA")
            .with_purchasable("P-002", "Nut", "C-AAA")
            .with_purchasable("P-003", "Tube", "C-BBB")
    }

    fn records() -> Vec<ShoppingListRecord> {
        vec![
            ShoppingListRecord::new(1, "P-001", 2),
            ShoppingListRecord::new(2, "P-002", 1),
            ShoppingListRecord::new(3, "P-001", 3),
            ShoppingListRecord::new(4, "P-003", 5),
        ]
    }

    #[test]
    fn test_group_by_supplier() {
        let directory = directory();
        let groups = ShoppingListGrouper::new(&directory)
            .group(&records())
            .unwrap()
            .accepted()
            .unwrap();

        assert_eq!(groups.len(), 2);

        let aaa = &groups["C-AAA"];
        assert_eq!(aaa.len(), 2);
        assert_eq!(aaa[0].item_id, "P-001");
        assert_eq!(aaa[0].quantity, 5);
        assert_eq!(aaa[0].list_ids, vec![1, 3]);
        assert_eq!(aaa[1].item_id, "P-002");
        assert_eq!(aaa[1].list_ids, vec![2]);

        let bbb = &groups["C-BBB"];
        assert_eq!(bbb, &vec![GroupedItem {
            item_id: "P-003".to_string(),
            quantity: 5,
            list_ids: vec![4],
        }]);
    }

    #[test]
    fn test_ordered_records_are_skipped() {
        let directory = directory();
        let records = vec![
            ShoppingListRecord::new(1, "P-001", 2).with_ordered(true),
            ShoppingListRecord::new(2, "P-003", 1),
        ];

        let groups = ShoppingListGrouper::new(&directory)
            .group(&records)
            .unwrap()
            .accepted()
            .unwrap();

        assert!(!groups.contains_key("C-AAA"));
        assert_eq!(groups["C-BBB"][0].list_ids, vec![2]);
    }

    #[test]
    fn test_missing_mapping_rejects_batch() {
        let directory = directory().with_item("P-404", "Orphan");
        let mut records = records();
        records.push(ShoppingListRecord::new(5, "P-404", 1));

        let outcome = ShoppingListGrouper::new(&directory).group(&records).unwrap();
        assert_eq!(
            outcome.message().as_deref(),
            Some("no contact mapping found for item P-404")
        );
    }

    #[test]
    fn test_every_list_id_appears_once() {
        let directory = directory();
        let groups = ShoppingListGrouper::new(&directory)
            .group(&records())
            .unwrap()
            .accepted()
            .unwrap();

        let mut ids: Vec<i64> = groups
            .values()
            .flatten()
            .flat_map(|item| item.list_ids.iter().copied())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_merged_quantity_exceeds_u32() {
        let directory = directory();
        let records = vec![
            ShoppingListRecord::new(1, "P-001", 3_000_000_000),
            ShoppingListRecord::new(2, "P-001", 3_000_000_000),
        ];

        let groups = ShoppingListGrouper::new(&directory)
            .group(&records)
            .unwrap()
            .accepted()
            .unwrap();

        assert_eq!(groups["C-AAA"][0].quantity, 6_000_000_000);
        assert_eq!(groups["C-AAA"][0].list_ids, vec![1, 2]);
    }

    #[test]
    fn test_empty_input_gives_empty_groups() {
        let directory = directory();
        let groups = ShoppingListGrouper::new(&directory)
            .group(&[])
            .unwrap()
            .accepted()
            .unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn test_directory_failure_propagates() {
        let directory = directory().with_failure("P-002");
        let err = ShoppingListGrouper::new(&directory)
            .group(&records())
            .unwrap_err();
        assert!(matches!(err, ProcureError::Collaborator { .. }));
    }

    #[test]
    fn test_expired_deadline() {
        let directory = directory();
        let err = ShoppingListGrouper::new(&directory)
            .with_deadline(Deadline::after(Some(Duration::ZERO)))
            .group(&records())
            .unwrap_err();
        assert!(matches!(err, ProcureError::Timeout { .. }));
    }
}
