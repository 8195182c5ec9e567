//! 採購意向登錄

use procure_core::{
    BusinessError, Deadline, LeafTotal, Outcome, ProcureError, Result, ShoppingListRecord,
    ShoppingListStore,
};
use rust_decimal::prelude::ToPrimitive;

/// 使用者確認後要加入採購清單的一筆物料
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeEntry {
    pub item_id: String,
    pub quantity: i64,
}

impl IntakeEntry {
    pub fn new(item_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
        }
    }
}

impl From<&LeafTotal> for IntakeEntry {
    /// 以彙總後（已取整）的數量作為預設採購量
    ///
    /// 超出 i64 範圍時以 `i64::MAX` 表示，寫入時會被拒絕而不是變成零。
    fn from(total: &LeafTotal) -> Self {
        let quantity = total.quantity.trunc().to_i64().unwrap_or_else(|| {
            tracing::warn!("物料 {} 總量 {} 超出範圍", total.item_id, total.quantity);
            i64::MAX
        });
        Self {
            item_id: total.item_id.clone(),
            quantity,
        }
    }
}

/// 將採購意向逐筆寫入採購清單
///
/// 同一物料的數量先相加；空白物料ID或非正數量的項目略過。
/// 一筆都不剩時拒絕，不寫入任何記錄。數量超過單筆記錄上限（u32）時回傳
/// `InvalidInput`，同樣不寫入任何記錄。
pub fn insert_entries<S>(
    store: &mut S,
    entries: &[IntakeEntry],
    deadline: Deadline,
) -> Result<Outcome<Vec<ShoppingListRecord>>>
where
    S: ShoppingListStore + ?Sized,
{
    let mut merged: Vec<(String, u32)> = Vec::new();
    for entry in entries {
        let item_id = entry.item_id.trim();
        if item_id.is_empty() {
            continue;
        }
        if entry.quantity <= 0 {
            tracing::debug!("略過數量無效的項目 {}：{}", item_id, entry.quantity);
            continue;
        }
        let quantity = u32::try_from(entry.quantity).map_err(|_| too_large(item_id))?;

        match merged.iter_mut().find(|(id, _)| id == item_id) {
            Some((_, total)) => {
                *total = total
                    .checked_add(quantity)
                    .ok_or_else(|| too_large(item_id))?;
            }
            None => merged.push((item_id.to_string(), quantity)),
        }
    }

    if merged.is_empty() {
        return Ok(Outcome::Rejected(BusinessError::NoValidShoppingEntries));
    }

    let mut records = Vec::with_capacity(merged.len());
    for (item_id, quantity) in &merged {
        deadline.check()?;
        records.push(store.insert(item_id, *quantity)?);
    }

    tracing::info!("已加入採購清單 {} 筆", records.len());
    Ok(Outcome::Accepted(records))
}

fn too_large(item_id: &str) -> ProcureError {
    tracing::warn!("物料 {} 的採購數量超過單筆記錄上限", item_id);
    ProcureError::InvalidInput(format!(
        "quantity of item {item_id} exceeds the shopping list limit"
    ))
}
